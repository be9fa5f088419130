//! HGVS-style change descriptors
//!
//! Positions, nucleotide edits and predicted protein changes as they appear in
//! annotation output. These types only describe and format changes; the
//! builders decide which change a variant produces.

pub mod nucleotide;
pub mod position;
pub mod protein;

pub use nucleotide::{genomic_change, genomic_description, genomic_edit, NaChange, NaEdit};
pub use position::{PosAnchor, TxPos};
pub use protein::{first_divergence, format_inframe, minimal_diff, ProteinChange, ProteinDiff, ProteinPos};
