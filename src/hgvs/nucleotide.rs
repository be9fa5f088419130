//! Nucleotide change descriptors (`g.`, `c.`, `n.`)
//!
//! | Edit | Example |
//! |------|---------|
//! | substitution | `c.76A>T` |
//! | deletion | `c.76del`, `c.76_78del` |
//! | insertion | `c.76_77insTG` |
//! | duplication | `c.76dup`, `c.76_78dup` |
//! | deletion-insertion | `c.76delinsTT`, `c.76_77delinsTTG` |

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::variant::{NormalizedVariant, VariantKind};

/// Edit applied at a nucleotide location
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NaEdit {
    Substitution { reference: String, alternate: String },
    Deletion,
    Insertion { inserted: String },
    Duplication,
    Delins { inserted: String },
}

/// A located nucleotide edit; `P` is the position type of the coordinate system
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NaChange<P> {
    /// Coordinate system letter: `g`, `c` or `n`
    pub prefix: char,
    pub start: P,
    /// Last position of a range; for insertions, the base after the insertion
    pub end: Option<P>,
    pub edit: NaEdit,
}

impl<P> NaChange<P> {
    pub fn new(prefix: char, start: P, end: Option<P>, edit: NaEdit) -> Self {
        Self {
            prefix,
            start,
            end,
            edit,
        }
    }

    pub fn is_duplication(&self) -> bool {
        matches!(self.edit, NaEdit::Duplication)
    }
}

impl<P: fmt::Display> fmt::Display for NaChange<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.prefix, self.start)?;
        if let Some(end) = &self.end {
            write!(f, "_{}", end)?;
        }
        match &self.edit {
            NaEdit::Substitution {
                reference,
                alternate,
            } => write!(f, "{}>{}", reference, alternate),
            NaEdit::Deletion => write!(f, "del"),
            NaEdit::Insertion { inserted } => write!(f, "ins{}", inserted),
            NaEdit::Duplication => write!(f, "dup"),
            NaEdit::Delins { inserted } => write!(f, "delins{}", inserted),
        }
    }
}

/// Genomic change of a normalized variant, 1-based, as trimmed
pub fn genomic_change(variant: &NormalizedVariant) -> NaChange<u64> {
    genomic_edit(
        variant.kind(),
        variant.start(),
        variant.end(),
        variant.reference(),
        variant.alternate(),
    )
}

/// Genomic change for the 0-based half-open interval `[start, end)` with
/// forward-strand alleles
pub fn genomic_edit(
    kind: VariantKind,
    start: u64,
    end: u64,
    reference: &str,
    alternate: &str,
) -> NaChange<u64> {
    let range = |s: u64, e: u64| if e > s { Some(e) } else { None };
    match kind {
        VariantKind::Snv => NaChange::new(
            'g',
            start + 1,
            None,
            NaEdit::Substitution {
                reference: reference.to_string(),
                alternate: alternate.to_string(),
            },
        ),
        VariantKind::Deletion => NaChange::new('g', start + 1, range(start + 1, end), NaEdit::Deletion),
        // the inserted bases go between 1-based positions `start` and `start + 1`
        VariantKind::Insertion => NaChange::new(
            'g',
            start,
            Some(start + 1),
            NaEdit::Insertion {
                inserted: alternate.to_string(),
            },
        ),
        VariantKind::Mnv | VariantKind::Indel => NaChange::new(
            'g',
            start + 1,
            range(start + 1, end),
            NaEdit::Delins {
                inserted: alternate.to_string(),
            },
        ),
    }
}

/// `contig:g.` description, e.g. `14:g.23896042C>T`
pub fn genomic_description(variant: &NormalizedVariant) -> String {
    format!("{}:{}", variant.contig(), genomic_change(variant))
}
