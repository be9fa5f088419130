//! 3'/5' shuffling of indels along a sequence
//!
//! # Coordinate System
//!
//! This module uses **0-based half-open intervals**:
//!
//! | Parameter | Basis | Notes |
//! |-----------|-------|-------|
//! | `start` | 0-based | Inclusive start position |
//! | `end` | 0-based | Exclusive end position (`== start` for insertions) |
//! | `boundaries.left` | 0-based | Inclusive left limit |
//! | `boundaries.right` | 0-based | Exclusive right limit |
//!
//! Positions are relative to whatever sequence is passed in; the annotator
//! shuffles in transcript space, where "3'" means toward the transcript end.

use serde::{Deserialize, Serialize};

/// Direction to shuffle ambiguous indels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ShuffleDirection {
    /// Shuffle towards the 3' end (nomenclature convention)
    #[default]
    ThreePrime,
    /// Shuffle towards the 5' end
    FivePrime,
}

impl std::fmt::Display for ShuffleDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShuffleDirection::ThreePrime => write!(f, "3prime"),
            ShuffleDirection::FivePrime => write!(f, "5prime"),
        }
    }
}

impl std::str::FromStr for ShuffleDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "3prime" | "3'" | "three_prime" => Ok(ShuffleDirection::ThreePrime),
            "5prime" | "5'" | "five_prime" => Ok(ShuffleDirection::FivePrime),
            _ => Err(format!("Invalid shuffle direction: {}", s)),
        }
    }
}

/// Limits a variant may not be shuffled across
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boundaries {
    pub left: u64,
    pub right: u64,
}

impl Boundaries {
    pub fn new(left: u64, right: u64) -> Self {
        Self { left, right }
    }
}

/// Result of a shuffle operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShuffleResult {
    /// New start position (0-based, inclusive)
    pub start: u64,
    /// New end position (0-based, exclusive)
    pub end: u64,
    /// Inserted bases rotated to match the new position (empty for deletions)
    pub inserted: Vec<u8>,
    /// Whether the variant was moved
    pub shifted: bool,
}

/// Shuffle a pure insertion or deletion towards the 3' or 5' end
///
/// `alt_seq` is empty for deletions (`[start, end)` deleted) and holds the
/// inserted bases for insertions (`start == end`). A deletion slides while the
/// base leaving one side equals the base entering the other; an insertion
/// slides while the next reference base equals the inserted base that would
/// rotate past it.
pub fn shuffle(
    ref_seq: &[u8],
    alt_seq: &[u8],
    start: u64,
    end: u64,
    boundaries: &Boundaries,
    direction: ShuffleDirection,
) -> ShuffleResult {
    let right = boundaries.right.min(ref_seq.len() as u64);
    let mut new_start = start;
    let mut new_end = end;
    let mut steps = 0usize;

    match direction {
        ShuffleDirection::ThreePrime => {
            while new_end < right {
                let next = ref_seq[new_end as usize];
                let leaving = if alt_seq.is_empty() {
                    ref_seq[new_start as usize]
                } else {
                    alt_seq[steps % alt_seq.len()]
                };
                if next != leaving {
                    break;
                }
                new_start += 1;
                new_end += 1;
                steps += 1;
            }
        }
        ShuffleDirection::FivePrime => {
            while new_start > boundaries.left {
                let prev = ref_seq[(new_start - 1) as usize];
                let leaving = if alt_seq.is_empty() {
                    ref_seq[(new_end - 1) as usize]
                } else {
                    alt_seq[alt_seq.len() - 1 - steps % alt_seq.len()]
                };
                if prev != leaving {
                    break;
                }
                new_start -= 1;
                new_end -= 1;
                steps += 1;
            }
        }
    }

    let mut inserted = alt_seq.to_vec();
    if !inserted.is_empty() {
        let k = steps % inserted.len();
        match direction {
            ShuffleDirection::ThreePrime => inserted.rotate_left(k),
            ShuffleDirection::FivePrime => inserted.rotate_right(k),
        }
    }

    ShuffleResult {
        start: new_start,
        end: new_end,
        inserted,
        shifted: steps > 0,
    }
}

/// The span an insertion of `inserted` at `point` duplicates, if any.
///
/// After a 3' shift the copy sits immediately before the point; after a 5'
/// shift immediately after it.
pub fn duplicated_span(
    ref_seq: &[u8],
    inserted: &[u8],
    point: u64,
    direction: ShuffleDirection,
) -> Option<(u64, u64)> {
    let n = inserted.len() as u64;
    if n == 0 {
        return None;
    }
    let (s, e) = match direction {
        ShuffleDirection::ThreePrime => (point.checked_sub(n)?, point),
        ShuffleDirection::FivePrime => (point, point + n),
    };
    let flank = ref_seq.get(s as usize..e as usize)?;
    (flank == inserted).then_some((s, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shuffle_deletion_3prime() {
        // ATGGGGGCAT: delete one G at 3, shifts to the last G at 6
        let result = shuffle(
            b"ATGGGGGCAT",
            &[],
            3,
            4,
            &Boundaries::new(0, 10),
            ShuffleDirection::ThreePrime,
        );
        assert!(result.shifted);
        assert_eq!((result.start, result.end), (6, 7));
    }

    #[test]
    fn test_shuffle_deletion_5prime() {
        let result = shuffle(
            b"ATGGGGGCAT",
            &[],
            6,
            7,
            &Boundaries::new(0, 10),
            ShuffleDirection::FivePrime,
        );
        assert_eq!((result.start, result.end), (2, 3));
    }

    #[test]
    fn test_no_shuffle_needed() {
        let result = shuffle(
            b"ATGCATGCAT",
            &[],
            2,
            3,
            &Boundaries::new(0, 10),
            ShuffleDirection::ThreePrime,
        );
        assert!(!result.shifted);
        assert_eq!((result.start, result.end), (2, 3));
    }

    #[test]
    fn test_shuffle_respects_boundary() {
        let result = shuffle(
            b"ATGGGGGCAT",
            &[],
            3,
            4,
            &Boundaries::new(0, 5),
            ShuffleDirection::ThreePrime,
        );
        assert_eq!((result.start, result.end), (4, 5));
    }

    #[test]
    fn test_shuffle_insertion_rotates_bases() {
        // insert "CA" between 1 and 2 in TACACAG: slides to 6 with bases "CA"
        let result = shuffle(
            b"TACACAG",
            b"AC",
            1,
            1,
            &Boundaries::new(0, 7),
            ShuffleDirection::ThreePrime,
        );
        // A C A C A matches A C A C A: five steps
        assert_eq!((result.start, result.end), (6, 6));
        assert_eq!(result.inserted, b"CA".to_vec());
    }

    #[test]
    fn test_shuffle_insertion_5prime() {
        let result = shuffle(
            b"TGGGC",
            b"G",
            4,
            4,
            &Boundaries::new(0, 5),
            ShuffleDirection::FivePrime,
        );
        assert_eq!((result.start, result.end), (1, 1));
        assert_eq!(result.inserted, b"G".to_vec());
    }

    #[test]
    fn test_duplicated_span() {
        assert_eq!(
            duplicated_span(b"TACACAG", b"CA", 6, ShuffleDirection::ThreePrime),
            Some((4, 6))
        );
        assert_eq!(
            duplicated_span(b"TGGGC", b"G", 1, ShuffleDirection::FivePrime),
            Some((1, 2))
        );
        assert_eq!(
            duplicated_span(b"TACACAG", b"GG", 7, ShuffleDirection::ThreePrime),
            None
        );
        assert_eq!(duplicated_span(b"AC", b"ACG", 2, ShuffleDirection::ThreePrime), None);
    }

    #[test]
    fn test_direction_from_str() {
        assert_eq!("3prime".parse::<ShuffleDirection>().unwrap(), ShuffleDirection::ThreePrime);
        assert_eq!("five_prime".parse::<ShuffleDirection>().unwrap(), ShuffleDirection::FivePrime);
        assert!("left".parse::<ShuffleDirection>().is_err());
        assert_eq!(ShuffleDirection::FivePrime.to_string(), "5prime");
    }
}
