//! Translation of nucleotide sequences with the standard genetic code.

pub mod amino_acid;
pub mod codon;

pub use amino_acid::AminoAcid;
pub use codon::{Base, Codon, CodonTable};
