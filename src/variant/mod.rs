//! Genomic variants: raw input, normalized representation, kind
//!
//! | Type | Coordinates | Notes |
//! |------|-------------|-------|
//! | [`RawVariant`] | 1-based `position` | Alleles as supplied, possibly padded |
//! | [`GenomeVariant`] | 0-based half-open interval | Interval spans the reference allele |
//! | [`NormalizedVariant`] | same as `GenomeVariant` | Trimmed, with a [`VariantKind`] |
//!
//! An insertion has an empty reference allele and an empty interval; the
//! inserted bases go between `start - 1` and `start`. In raw form an empty
//! reference allele means the insertion lies immediately before base
//! `position`.

pub mod normalize;
pub mod shuffle;

pub use normalize::{trim_alleles, Normalizer};
pub use shuffle::{duplicated_span, shuffle, Boundaries, ShuffleDirection, ShuffleResult};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::coords::{GenomeInterval, Strand};
use crate::error::AnnotateError;
use crate::sequence::normalize_allele;

/// A variant as supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawVariant {
    pub contig: String,
    /// 1-based position of the first reference base
    pub position: i64,
    pub reference: String,
    pub alternate: String,
}

impl RawVariant {
    pub fn new(
        contig: impl Into<String>,
        position: i64,
        reference: impl Into<String>,
        alternate: impl Into<String>,
    ) -> Self {
        Self {
            contig: contig.into(),
            position,
            reference: reference.into(),
            alternate: alternate.into(),
        }
    }

    /// Parse a whitespace-separated `contig pos ref alt` line (VCF-like columns)
    /// or a single `contig-pos-ref-alt` token
    pub fn parse_line(line: &str) -> Result<Self, AnnotateError> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        match fields.len() {
            1 => fields[0].parse(),
            n if n >= 4 => Self::from_fields(fields[0], fields[1], fields[2], fields[3]),
            _ => Err(AnnotateError::invalid_variant(format!(
                "expected 'contig pos ref alt' but got '{}'",
                line.trim()
            ))),
        }
    }

    fn from_fields(contig: &str, pos: &str, reference: &str, alternate: &str) -> Result<Self, AnnotateError> {
        let position = pos.parse::<i64>().map_err(|_| {
            AnnotateError::invalid_variant(format!("invalid position '{}'", pos))
        })?;
        Ok(Self::new(
            contig,
            position,
            normalize_allele(reference),
            normalize_allele(alternate),
        ))
    }
}

impl FromStr for RawVariant {
    type Err = AnnotateError;

    /// Parse `14-23896042-C-T`; `-` or `.` as an allele denotes an empty allele
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        // allele fields may themselves be "-", so split from the left only three times
        let mut parts = s.splitn(3, '-');
        let contig = parts.next().unwrap_or_default();
        let pos = parts.next().unwrap_or_default();
        let rest = parts.next().unwrap_or_default();
        let (reference, alternate) = split_alleles(rest).ok_or_else(|| {
            AnnotateError::invalid_variant(format!("expected 'contig-pos-ref-alt' but got '{}'", s))
        })?;
        if contig.is_empty() || pos.is_empty() {
            return Err(AnnotateError::invalid_variant(format!(
                "expected 'contig-pos-ref-alt' but got '{}'",
                s
            )));
        }
        Self::from_fields(contig, pos, reference, alternate)
    }
}

/// Split `ref-alt` where either side may be the empty-allele marker `-`
fn split_alleles(s: &str) -> Option<(&str, &str)> {
    if let Some(alt) = s.strip_prefix("--") {
        return Some(("-", alt));
    }
    let (reference, alternate) = s.split_once('-')?;
    if reference.is_empty() || alternate.is_empty() {
        return None;
    }
    Some((reference, alternate))
}

impl fmt::Display for RawVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |a: &str| if a.is_empty() { "-".to_string() } else { a.to_string() };
        write!(
            f,
            "{}-{}-{}-{}",
            self.contig,
            self.position,
            show(&self.reference),
            show(&self.alternate)
        )
    }
}

/// Kind of a normalized variant, from the trimmed allele lengths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariantKind {
    /// One base replaced by one base
    Snv,
    /// Block substitution of equal, longer lengths
    Mnv,
    Insertion,
    Deletion,
    /// Replacement with a different number of bases
    Indel,
}

impl VariantKind {
    /// Classify trimmed allele lengths; None when both are empty
    pub fn classify(ref_len: usize, alt_len: usize) -> Option<Self> {
        match (ref_len, alt_len) {
            (0, 0) => None,
            (1, 1) => Some(VariantKind::Snv),
            (0, _) => Some(VariantKind::Insertion),
            (_, 0) => Some(VariantKind::Deletion),
            (r, a) if r == a => Some(VariantKind::Mnv),
            _ => Some(VariantKind::Indel),
        }
    }

    /// Whether the net length change shifts the reading frame
    pub fn changes_length(&self) -> bool {
        matches!(
            self,
            VariantKind::Insertion | VariantKind::Deletion | VariantKind::Indel
        )
    }
}

impl fmt::Display for VariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariantKind::Snv => write!(f, "SNV"),
            VariantKind::Mnv => write!(f, "MNV"),
            VariantKind::Insertion => write!(f, "insertion"),
            VariantKind::Deletion => write!(f, "deletion"),
            VariantKind::Indel => write!(f, "indel"),
        }
    }
}

/// A located change of reference bases to alternate bases
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenomeVariant {
    interval: GenomeInterval,
    reference: String,
    alternate: String,
}

impl GenomeVariant {
    /// Create a variant; the interval must span exactly the reference allele
    pub fn new(
        interval: GenomeInterval,
        reference: impl Into<String>,
        alternate: impl Into<String>,
    ) -> Result<Self, AnnotateError> {
        let reference = reference.into();
        let alternate = alternate.into();
        if interval.len() != reference.len() as u64 {
            return Err(AnnotateError::invalid_variant(format!(
                "interval {} does not span reference allele '{}'",
                interval, reference
            )));
        }
        if reference == alternate {
            return Err(AnnotateError::invalid_variant(
                "reference and alternate alleles are identical",
            ));
        }
        Ok(Self {
            interval,
            reference,
            alternate,
        })
    }

    pub fn interval(&self) -> &GenomeInterval {
        &self.interval
    }

    pub fn contig(&self) -> &str {
        self.interval.contig()
    }

    pub fn strand(&self) -> Strand {
        self.interval.strand()
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn alternate(&self) -> &str {
        &self.alternate
    }
}

/// A trimmed variant tagged with its kind
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NormalizedVariant {
    variant: GenomeVariant,
    kind: VariantKind,
}

impl NormalizedVariant {
    /// Wrap an already-trimmed variant
    pub fn new(variant: GenomeVariant) -> Result<Self, AnnotateError> {
        let kind = VariantKind::classify(variant.reference.len(), variant.alternate.len())
            .ok_or_else(|| AnnotateError::invalid_variant("variant has no alleles"))?;
        Ok(Self { variant, kind })
    }

    pub fn kind(&self) -> VariantKind {
        self.kind
    }

    pub fn variant(&self) -> &GenomeVariant {
        &self.variant
    }

    pub fn interval(&self) -> &GenomeInterval {
        self.variant.interval()
    }

    pub fn contig(&self) -> &str {
        self.variant.contig()
    }

    /// 0-based start (the insertion point for insertions)
    pub fn start(&self) -> u64 {
        self.variant.interval.start().value()
    }

    /// 0-based exclusive end
    pub fn end(&self) -> u64 {
        self.variant.interval.end().value()
    }

    pub fn reference(&self) -> &str {
        self.variant.reference()
    }

    pub fn alternate(&self) -> &str {
        self.variant.alternate()
    }

    /// Back to caller form; normalizing the result is a no-op
    pub fn to_raw(&self) -> RawVariant {
        RawVariant::new(
            self.contig(),
            self.start() as i64 + 1,
            self.reference(),
            self.alternate(),
        )
    }

    /// Genomic description, e.g. `14:g.23896042C>T`
    pub fn genomic_change(&self) -> String {
        crate::hgvs::nucleotide::genomic_description(self)
    }
}

impl fmt::Display for NormalizedVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_raw())
    }
}
