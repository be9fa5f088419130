//! Transcript-relative positions as written in `c.` / `n.` descriptions
//!
//! | Anchor | Written | Counted from |
//! |--------|---------|--------------|
//! | 5'UTR | `-15` | first CDS base, backward |
//! | CDS | `76` | first CDS base |
//! | 3'UTR | `*5` | last CDS base (the stop codon) |
//! | noncoding | `12` | first transcript base |
//!
//! An intronic offset is appended as `+d` / `-d`, e.g. `88+1`, `-15+3`, `*5-1`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The landmark a transcript position is counted from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PosAnchor {
    /// Upstream of the CDS (5'UTR), written with a leading `-`
    FivePrimeUtr,
    /// Inside the CDS
    Cds,
    /// Downstream of the CDS (3'UTR), written with a leading `*`
    ThreePrimeUtr,
    /// Noncoding transcript, 1-based from the transcript start
    Transcript,
}

/// A position in a `c.` or `n.` description
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxPos {
    pub anchor: PosAnchor,
    /// Distance from the anchor, always >= 1
    pub base: u64,
    /// Intronic offset from the anchoring exon base (0 for exonic)
    pub offset: i64,
}

impl TxPos {
    pub fn new(anchor: PosAnchor, base: u64, offset: i64) -> Self {
        Self {
            anchor,
            base,
            offset,
        }
    }

    pub fn is_intronic(&self) -> bool {
        self.offset != 0
    }

    /// Same position with a different intronic offset
    pub fn with_offset(self, offset: i64) -> Self {
        Self { offset, ..self }
    }
}

impl fmt::Display for TxPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.anchor {
            PosAnchor::FivePrimeUtr => write!(f, "-{}", self.base)?,
            PosAnchor::ThreePrimeUtr => write!(f, "*{}", self.base)?,
            PosAnchor::Cds | PosAnchor::Transcript => write!(f, "{}", self.base)?,
        }
        match self.offset {
            0 => Ok(()),
            o if o > 0 => write!(f, "+{}", o),
            o => write!(f, "-{}", o.unsigned_abs()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(PosAnchor::Cds, 76, 0, "76")]
    #[case(PosAnchor::Cds, 88, 1, "88+1")]
    #[case(PosAnchor::Cds, 89, -2, "89-2")]
    #[case(PosAnchor::FivePrimeUtr, 15, 3, "-15+3")]
    #[case(PosAnchor::FivePrimeUtr, 1, 0, "-1")]
    #[case(PosAnchor::ThreePrimeUtr, 5, -1, "*5-1")]
    #[case(PosAnchor::Transcript, 12, 0, "12")]
    fn test_display(
        #[case] anchor: PosAnchor,
        #[case] base: u64,
        #[case] offset: i64,
        #[case] expected: &str,
    ) {
        assert_eq!(TxPos::new(anchor, base, offset).to_string(), expected);
    }

    #[test]
    fn test_with_offset() {
        let pos = TxPos::new(PosAnchor::Cds, 100, 0);
        assert!(!pos.is_intronic());
        assert!(pos.with_offset(1).is_intronic());
        assert_eq!(pos.with_offset(-1).to_string(), "100-1");
    }
}
