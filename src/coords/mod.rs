//! Strand-aware genomic coordinates
//!
//! Newtype wrappers make the coordinate basis (0-based vs 1-based) explicit
//! at the type level, and [`GenomePosition`] / [`GenomeInterval`] attach a
//! contig and strand to them.
//!
//! # Coordinate Systems
//!
//! | Type | Basis | Use Cases |
//! |------|-------|-----------|
//! | [`ZeroBasedPos`] | 0-based | Array indexing, internal arithmetic, half-open intervals |
//! | [`OneBasedPos`] | 1-based | VCF POS, `g.`/`c.` nomenclature |
//!
//! # Strand flips
//!
//! Flipping between strands is only defined relative to the length of the
//! enclosing contig (or interval). A base at 0-based offset `p` on a contig of
//! length `L` is at `L - 1 - p` on the other strand; a half-open interval
//! `[s, e)` becomes `[L - e, L - s)`, i.e. every boundary `b` maps to `L - b`.
//!
//! ```
//! use ferro_annotate::coords::{GenomeInterval, Strand};
//!
//! let iv = GenomeInterval::new("14", Strand::Plus, 10, 20).unwrap();
//! let flipped = iv.with_strand(Strand::Minus, 100);
//! assert_eq!(flipped.start().value(), 80);
//! assert_eq!(flipped.end().value(), 90);
//! assert_eq!(flipped.len(), iv.len());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::AnnotateError;

/// A 0-based position (array-style indexing)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ZeroBasedPos(u64);

/// A 1-based position (human-readable indexing)
///
/// # Invariant
///
/// Position must be >= 1. Position 0 is invalid in 1-based systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OneBasedPos(u64);

impl ZeroBasedPos {
    /// Create a new 0-based position
    #[inline]
    pub const fn new(pos: u64) -> Self {
        Self(pos)
    }

    /// Get the raw value
    #[inline]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Convert to 1-based position
    #[inline]
    pub const fn to_one_based(self) -> OneBasedPos {
        OneBasedPos(self.0 + 1)
    }

    /// Use as array index
    #[inline]
    pub const fn as_index(self) -> usize {
        self.0 as usize
    }

    /// Add a signed offset, returning None on underflow or overflow
    #[inline]
    pub fn checked_offset(self, delta: i64) -> Option<Self> {
        self.0.checked_add_signed(delta).map(Self)
    }
}

impl OneBasedPos {
    /// Create a new 1-based position
    ///
    /// # Panics
    ///
    /// Panics if pos is 0, which is invalid in 1-based coordinate systems.
    #[inline]
    pub fn new(pos: u64) -> Self {
        assert!(pos > 0, "1-based position cannot be 0");
        Self(pos)
    }

    /// Try to create a 1-based position, returning None if invalid
    ///
    /// ```
    /// use ferro_annotate::coords::OneBasedPos;
    ///
    /// assert!(OneBasedPos::try_new(1).is_some());
    /// assert!(OneBasedPos::try_new(0).is_none());
    /// ```
    #[inline]
    pub const fn try_new(pos: u64) -> Option<Self> {
        if pos > 0 {
            Some(Self(pos))
        } else {
            None
        }
    }

    /// Get the raw value
    #[inline]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Convert to 0-based position
    #[inline]
    pub const fn to_zero_based(self) -> ZeroBasedPos {
        ZeroBasedPos(self.0 - 1)
    }
}

impl fmt::Display for ZeroBasedPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for OneBasedPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which convention a raw integer coordinate is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PositionType {
    /// 0-based, half-open intervals
    #[default]
    ZeroBased,
    /// 1-based, fully-closed intervals
    OneBased,
}

/// Strand orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Strand {
    #[serde(rename = "+")]
    #[default]
    Plus,
    #[serde(rename = "-")]
    Minus,
}

impl Strand {
    /// The opposite strand
    pub fn opposite(self) -> Self {
        match self {
            Strand::Plus => Strand::Minus,
            Strand::Minus => Strand::Plus,
        }
    }

    pub fn is_reverse(self) -> bool {
        self == Strand::Minus
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strand::Plus => write!(f, "+"),
            Strand::Minus => write!(f, "-"),
        }
    }
}

/// A single base on a contig and strand, stored 0-based
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenomePosition {
    contig: String,
    strand: Strand,
    pos: ZeroBasedPos,
}

impl GenomePosition {
    /// Create a position from a raw value in the given convention
    pub fn new(
        contig: impl Into<String>,
        strand: Strand,
        value: u64,
        position_type: PositionType,
    ) -> Result<Self, AnnotateError> {
        let pos = match position_type {
            PositionType::ZeroBased => ZeroBasedPos::new(value),
            PositionType::OneBased => OneBasedPos::try_new(value)
                .ok_or_else(|| AnnotateError::coordinate("1-based position cannot be 0"))?
                .to_zero_based(),
        };
        Ok(Self {
            contig: contig.into(),
            strand,
            pos,
        })
    }

    pub fn contig(&self) -> &str {
        &self.contig
    }

    pub fn strand(&self) -> Strand {
        self.strand
    }

    /// The 0-based offset on this position's strand
    pub fn pos(&self) -> ZeroBasedPos {
        self.pos
    }

    /// Raw value in the requested convention
    pub fn value(&self, position_type: PositionType) -> u64 {
        match position_type {
            PositionType::ZeroBased => self.pos.value(),
            PositionType::OneBased => self.pos.to_one_based().value(),
        }
    }

    /// Express this position on `strand`, given the contig length
    ///
    /// # Panics
    ///
    /// Panics in debug builds if the position lies beyond `contig_len`.
    pub fn with_strand(&self, strand: Strand, contig_len: u64) -> Self {
        if strand == self.strand {
            return self.clone();
        }
        debug_assert!(self.pos.value() < contig_len);
        Self {
            contig: self.contig.clone(),
            strand,
            pos: ZeroBasedPos::new(contig_len - 1 - self.pos.value()),
        }
    }

    /// Shift by a signed number of bases on the same strand
    pub fn shifted(&self, delta: i64) -> Result<Self, AnnotateError> {
        let pos = self.pos.checked_offset(delta).ok_or_else(|| {
            AnnotateError::coordinate(format!("cannot shift {} by {}", self.pos, delta))
        })?;
        Ok(Self {
            contig: self.contig.clone(),
            strand: self.strand,
            pos,
        })
    }
}

impl fmt::Display for GenomePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.contig, self.pos.to_one_based())
    }
}

/// A half-open interval `[start, end)` on a contig and strand
///
/// # Invariant
///
/// `start <= end`; an empty interval (`start == end`) denotes the point
/// between bases `start - 1` and `start`, which is how insertion sites are
/// represented.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenomeInterval {
    contig: String,
    strand: Strand,
    start: ZeroBasedPos,
    end: ZeroBasedPos,
}

impl GenomeInterval {
    /// Create a 0-based half-open interval
    pub fn new(
        contig: impl Into<String>,
        strand: Strand,
        start: u64,
        end: u64,
    ) -> Result<Self, AnnotateError> {
        if start > end {
            return Err(AnnotateError::coordinate(format!(
                "interval start {} is after end {}",
                start, end
            )));
        }
        Ok(Self {
            contig: contig.into(),
            strand,
            start: ZeroBasedPos::new(start),
            end: ZeroBasedPos::new(end),
        })
    }

    /// Create from a 1-based fully-closed `[start, end]`
    pub fn from_one_based_closed(
        contig: impl Into<String>,
        strand: Strand,
        start: u64,
        end: u64,
    ) -> Result<Self, AnnotateError> {
        let start = OneBasedPos::try_new(start)
            .ok_or_else(|| AnnotateError::coordinate("1-based position cannot be 0"))?;
        Self::new(contig, strand, start.to_zero_based().value(), end)
    }

    pub fn contig(&self) -> &str {
        &self.contig
    }

    pub fn strand(&self) -> Strand {
        self.strand
    }

    pub fn start(&self) -> ZeroBasedPos {
        self.start
    }

    /// Exclusive end
    pub fn end(&self) -> ZeroBasedPos {
        self.end
    }

    #[inline]
    pub fn len(&self) -> u64 {
        self.end.value() - self.start.value()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// 1-based closed `(start, end)`; None for empty intervals
    pub fn to_one_based_closed(&self) -> Option<(OneBasedPos, OneBasedPos)> {
        if self.is_empty() {
            return None;
        }
        Some((self.start.to_one_based(), OneBasedPos::new(self.end.value())))
    }

    fn same_frame(&self, other: &GenomeInterval) -> bool {
        self.contig == other.contig && self.strand == other.strand
    }

    /// Whether the base at 0-based `pos` lies inside
    pub fn contains_pos(&self, pos: u64) -> bool {
        pos >= self.start.value() && pos < self.end.value()
    }

    /// Whether `other` lies completely within this interval
    pub fn contains(&self, other: &GenomeInterval) -> bool {
        self.same_frame(other) && other.start >= self.start && other.end <= self.end
    }

    /// Whether the two intervals share at least one base
    pub fn overlaps(&self, other: &GenomeInterval) -> bool {
        self.same_frame(other) && self.start < other.end && other.start < self.end
    }

    /// The shared bases, if any
    pub fn intersection(&self, other: &GenomeInterval) -> Option<GenomeInterval> {
        if !self.overlaps(other) {
            return None;
        }
        Some(GenomeInterval {
            contig: self.contig.clone(),
            strand: self.strand,
            start: self.start.max(other.start),
            end: self.end.min(other.end),
        })
    }

    /// Offset of the base at `pos` relative to this interval's start
    pub fn relative_offset(&self, pos: u64) -> Result<u64, AnnotateError> {
        if !self.contains_pos(pos) {
            return Err(AnnotateError::coordinate(format!(
                "position {} outside {}",
                pos, self
            )));
        }
        Ok(pos - self.start.value())
    }

    /// Express this interval on `strand`, given the contig length
    pub fn with_strand(&self, strand: Strand, contig_len: u64) -> Self {
        if strand == self.strand {
            return self.clone();
        }
        debug_assert!(self.end.value() <= contig_len);
        Self {
            contig: self.contig.clone(),
            strand,
            start: ZeroBasedPos::new(contig_len - self.end.value()),
            end: ZeroBasedPos::new(contig_len - self.start.value()),
        }
    }
}

impl fmt::Display for GenomeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}-{}({})",
            self.contig,
            self.start.to_one_based(),
            self.end,
            self.strand
        )
    }
}

/// Flip a boundary offset within a span of `len` bases: `len - offset`
///
/// Used for half-open boundaries; the base at `p` flips to `len - 1 - p`.
#[inline]
pub fn flip_boundary(len: u64, offset: u64) -> u64 {
    len - offset
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_to_one_based_conversion() {
        assert_eq!(ZeroBasedPos::new(0).to_one_based().value(), 1);
        assert_eq!(ZeroBasedPos::new(99).to_one_based().value(), 100);
        assert_eq!(OneBasedPos::new(100).to_zero_based().value(), 99);
    }

    #[test]
    #[should_panic(expected = "1-based position cannot be 0")]
    fn test_one_based_rejects_zero() {
        let _ = OneBasedPos::new(0);
    }

    #[test]
    fn test_genome_position_roundtrip() {
        let pos = GenomePosition::new("14", Strand::Plus, 23896042, PositionType::OneBased).unwrap();
        assert_eq!(pos.value(PositionType::ZeroBased), 23896041);
        assert_eq!(pos.value(PositionType::OneBased), 23896042);
        assert_eq!(pos.to_string(), "14:23896042");
    }

    #[test]
    fn test_genome_position_rejects_one_based_zero() {
        assert!(GenomePosition::new("1", Strand::Plus, 0, PositionType::OneBased).is_err());
    }

    #[test]
    fn test_position_strand_flip() {
        let pos = GenomePosition::new("1", Strand::Plus, 0, PositionType::ZeroBased).unwrap();
        let flipped = pos.with_strand(Strand::Minus, 10);
        assert_eq!(flipped.pos().value(), 9);
        assert_eq!(flipped.with_strand(Strand::Plus, 10), pos);
    }

    #[test]
    fn test_interval_rejects_inverted() {
        assert!(GenomeInterval::new("1", Strand::Plus, 10, 5).is_err());
        assert!(GenomeInterval::new("1", Strand::Plus, 5, 5).unwrap().is_empty());
    }

    #[test]
    fn test_interval_one_based_closed() {
        let iv = GenomeInterval::from_one_based_closed("1", Strand::Plus, 1, 10).unwrap();
        assert_eq!(iv.start().value(), 0);
        assert_eq!(iv.end().value(), 10);
        assert_eq!(iv.len(), 10);
        let (s, e) = iv.to_one_based_closed().unwrap();
        assert_eq!((s.value(), e.value()), (1, 10));
    }

    #[test]
    fn test_interval_overlap_and_intersection() {
        let a = GenomeInterval::new("1", Strand::Plus, 10, 20).unwrap();
        let b = GenomeInterval::new("1", Strand::Plus, 15, 30).unwrap();
        let c = GenomeInterval::new("1", Strand::Plus, 20, 30).unwrap();
        let other_contig = GenomeInterval::new("2", Strand::Plus, 10, 20).unwrap();

        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c), "half-open intervals that touch do not overlap");
        assert!(!a.overlaps(&other_contig));

        let ix = a.intersection(&b).unwrap();
        assert_eq!((ix.start().value(), ix.end().value()), (15, 20));
        assert!(a.intersection(&c).is_none());
    }

    #[test]
    fn test_interval_containment() {
        let outer = GenomeInterval::new("1", Strand::Plus, 0, 100).unwrap();
        let inner = GenomeInterval::new("1", Strand::Plus, 10, 20).unwrap();
        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));
        assert!(outer.contains_pos(99));
        assert!(!outer.contains_pos(100));
    }

    #[test]
    fn test_relative_offset_outside_fails() {
        let iv = GenomeInterval::new("1", Strand::Plus, 10, 20).unwrap();
        assert_eq!(iv.relative_offset(12).unwrap(), 2);
        assert!(matches!(
            iv.relative_offset(20),
            Err(AnnotateError::Coordinate { .. })
        ));
    }

    #[test]
    fn test_interval_flip_preserves_length() {
        let iv = GenomeInterval::new("1", Strand::Plus, 0, 3).unwrap();
        let flipped = iv.with_strand(Strand::Minus, 10);
        assert_eq!((flipped.start().value(), flipped.end().value()), (7, 10));
        assert_eq!(flipped.with_strand(Strand::Plus, 10), iv);
    }

    #[test]
    fn test_flip_boundary() {
        assert_eq!(flip_boundary(10, 0), 10);
        assert_eq!(flip_boundary(10, 10), 0);
        assert_eq!(flip_boundary(10, 4), 6);
    }
}
