//! Predicted protein changes and the minimal-range formatter
//!
//! Every predicted change is parenthesized: `p.(Arg663His)`, `p.(=)`,
//! `p.(Glu1501*)`. The only unparenthesized form is the unknown effect `p.?`.
//!
//! [`minimal_diff`] reduces two full-length peptides to the smallest changed
//! range so that a short internal change is never reported as a full-length
//! difference.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::translate::AminoAcid;

/// An amino acid at a 1-based protein position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProteinPos {
    pub aa: AminoAcid,
    pub pos: u64,
}

impl ProteinPos {
    pub fn new(aa: AminoAcid, pos: u64) -> Self {
        Self { aa, pos }
    }
}

impl fmt::Display for ProteinPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.aa.hgvs_code(), self.pos)
    }
}

/// A predicted protein-level change
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProteinChange {
    /// No amino acid change: `p.(=)`
    Unchanged,
    /// Consequence cannot be predicted: `p.?`
    Unknown,
    /// Initiation codon affected: `p.(Met1?)`
    StartLoss,
    /// One amino acid replaced; a `Ter` alternate is a nonsense change
    Substitution { at: ProteinPos, alternate: AminoAcid },
    Deletion { start: ProteinPos, end: Option<ProteinPos> },
    Duplication { start: ProteinPos, end: Option<ProteinPos> },
    /// Insertion between two adjacent residues
    Insertion {
        left: ProteinPos,
        right: ProteinPos,
        inserted: Vec<AminoAcid>,
    },
    Delins {
        start: ProteinPos,
        end: Option<ProteinPos>,
        inserted: Vec<AminoAcid>,
    },
    /// `p.(Arg97Profs*23)`; `stop` is None when no new stop was found
    Frameshift {
        at: ProteinPos,
        alternate: AminoAcid,
        stop: Option<u64>,
    },
    /// `p.(*1936Glnext*17)`; `stop` is None when no new stop was found
    Extension {
        at: ProteinPos,
        alternate: AminoAcid,
        stop: Option<u64>,
    },
}

fn write_range(f: &mut fmt::Formatter<'_>, start: &ProteinPos, end: &Option<ProteinPos>) -> fmt::Result {
    write!(f, "{}", start)?;
    if let Some(end) = end {
        write!(f, "_{}", end)?;
    }
    Ok(())
}

fn write_peptide(f: &mut fmt::Formatter<'_>, peptide: &[AminoAcid]) -> fmt::Result {
    for aa in peptide {
        write!(f, "{}", aa.hgvs_code())?;
    }
    Ok(())
}

fn write_stop(f: &mut fmt::Formatter<'_>, stop: Option<u64>) -> fmt::Result {
    match stop {
        Some(n) => write!(f, "*{}", n),
        None => write!(f, "*?"),
    }
}

impl fmt::Display for ProteinChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProteinChange::Unknown => return write!(f, "p.?"),
            ProteinChange::Unchanged => return write!(f, "p.(=)"),
            _ => {}
        }
        write!(f, "p.(")?;
        match self {
            ProteinChange::Unknown | ProteinChange::Unchanged => {}
            ProteinChange::StartLoss => write!(f, "Met1?")?,
            ProteinChange::Substitution { at, alternate } => {
                write!(f, "{}{}", at, alternate.hgvs_code())?
            }
            ProteinChange::Deletion { start, end } => {
                write_range(f, start, end)?;
                write!(f, "del")?
            }
            ProteinChange::Duplication { start, end } => {
                write_range(f, start, end)?;
                write!(f, "dup")?
            }
            ProteinChange::Insertion {
                left,
                right,
                inserted,
            } => {
                write!(f, "{}_{}ins", left, right)?;
                write_peptide(f, inserted)?
            }
            ProteinChange::Delins {
                start,
                end,
                inserted,
            } => {
                write_range(f, start, end)?;
                write!(f, "delins")?;
                write_peptide(f, inserted)?
            }
            ProteinChange::Frameshift {
                at,
                alternate,
                stop,
            } => {
                write!(f, "{}{}fs", at, alternate.hgvs_code())?;
                write_stop(f, *stop)?
            }
            ProteinChange::Extension {
                at,
                alternate,
                stop,
            } => {
                write!(f, "{}{}ext", at, alternate.hgvs_code())?;
                write_stop(f, *stop)?
            }
        }
        write!(f, ")")
    }
}

/// Minimal changed range between two peptides: `reference[start..ref_end]`
/// became `alternate[start..alt_end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProteinDiff {
    pub start: usize,
    pub ref_end: usize,
    pub alt_end: usize,
}

impl ProteinDiff {
    pub fn ref_len(&self) -> usize {
        self.ref_end - self.start
    }

    pub fn alt_len(&self) -> usize {
        self.alt_end - self.start
    }
}

/// Index of the first differing residue, or the shorter length if one is a
/// prefix of the other; None when identical
pub fn first_divergence(reference: &[AminoAcid], alternate: &[AminoAcid]) -> Option<usize> {
    let shared = reference
        .iter()
        .zip(alternate)
        .take_while(|(r, a)| r == a)
        .count();
    if shared == reference.len() && shared == alternate.len() {
        None
    } else {
        Some(shared)
    }
}

/// Trim identical residues from the front, then from the back
pub fn minimal_diff(reference: &[AminoAcid], alternate: &[AminoAcid]) -> Option<ProteinDiff> {
    let start = first_divergence(reference, alternate)?;
    let suffix = reference[start..]
        .iter()
        .rev()
        .zip(alternate[start..].iter().rev())
        .take_while(|(r, a)| r == a)
        .count();
    Some(ProteinDiff {
        start,
        ref_end: reference.len() - suffix,
        alt_end: alternate.len() - suffix,
    })
}

fn pos_at(peptide: &[AminoAcid], idx: usize) -> ProteinPos {
    ProteinPos::new(
        peptide.get(idx).copied().unwrap_or(AminoAcid::Xaa),
        idx as u64 + 1,
    )
}

/// Format an in-frame change from its minimal range
///
/// A pure insertion that repeats the residues immediately before it is a
/// duplication.
pub fn format_inframe(reference: &[AminoAcid], alternate: &[AminoAcid], diff: ProteinDiff) -> ProteinChange {
    let ProteinDiff { start, ref_end, .. } = diff;
    let inserted = alternate[start..diff.alt_end].to_vec();
    let range_end = |end: usize| (end > start + 1).then(|| pos_at(reference, end - 1));

    match (diff.ref_len(), diff.alt_len()) {
        (0, 0) => ProteinChange::Unchanged,
        (1, 1) => ProteinChange::Substitution {
            at: pos_at(reference, start),
            alternate: inserted[0],
        },
        (0, n) => {
            if start >= n && reference[start - n..start] == inserted[..] {
                let first = start - n;
                ProteinChange::Duplication {
                    start: pos_at(reference, first),
                    end: (n > 1).then(|| pos_at(reference, start - 1)),
                }
            } else if start == 0 {
                ProteinChange::Unknown
            } else {
                ProteinChange::Insertion {
                    left: pos_at(reference, start - 1),
                    right: pos_at(reference, start),
                    inserted,
                }
            }
        }
        (_, 0) => ProteinChange::Deletion {
            start: pos_at(reference, start),
            end: range_end(ref_end),
        },
        _ => ProteinChange::Delins {
            start: pos_at(reference, start),
            end: range_end(ref_end),
            inserted,
        },
    }
}
