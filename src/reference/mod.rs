//! Reference data: contig dictionaries and transcript models
//!
//! Transcript models are validated when built or loaded and are read-only
//! afterwards, so a loaded [`TranscriptDb`] can be shared across threads.

pub mod db;
pub mod dict;
pub mod projection;
pub mod transcript;

pub use db::{TranscriptDb, TranscriptIndex};
pub use dict::{GenomeBuild, ReferenceDictionary};
pub use projection::{CdsProjection, SpliceSite, SpliceWindow, TxProjection};
pub use transcript::{Exon, TranscriptModel, TranscriptModelBuilder, TranscriptRecord};
