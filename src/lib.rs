// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! ferro-annotate: functional annotation of genomic variants
//!
//! Part of the ferro bioinformatics toolkit. Given a genomic variant and the
//! transcripts it overlaps, predicts the consequence on each transcript and
//! describes it in HGVS nomenclature (`c.1988G>A`, `p.(Arg663His)`).
//!
//! # Example
//!
//! ```
//! use ferro_annotate::{AnnotateConfig, Annotator, RawVariant, Strand, TranscriptDb, TranscriptModel};
//!
//! let transcript = TranscriptModel::builder("NM_TEST.1")
//!     .gene_symbol("TEST")
//!     .contig("1")
//!     .strand(Strand::Plus)
//!     .exon(1000, 1020)
//!     .cds(2, 17)
//!     .sequence("GGATGAAACCCGGGTAACCC")
//!     .build()
//!     .unwrap();
//!
//! let mut db = TranscriptDb::new();
//! db.add(transcript).unwrap();
//!
//! let annotator = Annotator::new(&db, AnnotateConfig::default());
//! let result = annotator
//!     .annotate_all(&RawVariant::new("1", 1008, "A", "C"))
//!     .unwrap();
//!
//! let top = result.annotations.highest().unwrap();
//! assert_eq!(top.cds_change.as_deref(), Some("c.6A>C"));
//! assert_eq!(top.protein_change.as_deref(), Some("p.(Lys2Asn)"));
//! ```

pub mod annotation;
pub mod annotator;
pub mod builders;
pub mod config;
pub mod coords;
pub mod dispatch;
pub mod effect;
pub mod error;
pub mod hgvs;
#[cfg(feature = "parallel")]
pub mod parallel;
pub mod reference;
pub mod sequence;
pub mod translate;
pub mod variant;

// Re-export commonly used types
pub use annotation::{Annotation, AnnotationList, AnnotationMessage};
pub use annotator::{Annotator, BatchOutcome, BatchStats, TranscriptFailure, VariantAnnotations};
pub use config::{AnnotateConfig, ErrorMode};
pub use coords::{GenomeInterval, GenomePosition, OneBasedPos, Strand, ZeroBasedPos};
pub use dispatch::{Builder, DispatchState, Dispatcher, Region};
pub use effect::{Impact, VariantEffect};
pub use error::{AnnotateError, ErrorCode};
pub use reference::{
    GenomeBuild, ReferenceDictionary, TranscriptDb, TranscriptIndex, TranscriptModel,
    TranscriptRecord,
};
pub use variant::{NormalizedVariant, Normalizer, RawVariant, ShuffleDirection, VariantKind};

/// Result type alias for ferro-annotate operations
pub type Result<T> = std::result::Result<T, AnnotateError>;
