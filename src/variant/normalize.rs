//! Variant normalization: validation, allele trimming and classification

use crate::coords::{GenomeInterval, Strand};
use crate::error::{AnnotateError, ErrorCode};
use crate::reference::dict::ReferenceDictionary;
use crate::sequence::{is_valid_dna, normalize_allele};
use crate::variant::{GenomeVariant, NormalizedVariant, RawVariant};

/// Remove the shared prefix, then the shared suffix, of two alleles.
///
/// Returns the number of prefix bases removed and the trimmed alleles.
/// Prefix-first trimming leaves the right-most representation possible within
/// the supplied padding. Trimming a trimmed pair is a no-op.
///
/// ```
/// use ferro_annotate::variant::trim_alleles;
///
/// assert_eq!(trim_alleles("CAG", "CTG"), (1, "A", "T"));
/// assert_eq!(trim_alleles("GAA", "GA"), (2, "A", ""));
/// ```
pub fn trim_alleles<'a>(reference: &'a str, alternate: &'a str) -> (usize, &'a str, &'a str) {
    let prefix = reference
        .bytes()
        .zip(alternate.bytes())
        .take_while(|(r, a)| r == a)
        .count();
    let (r, a) = (&reference[prefix..], &alternate[prefix..]);
    let suffix = r
        .bytes()
        .rev()
        .zip(a.bytes().rev())
        .take_while(|(x, y)| x == y)
        .count();
    (prefix, &r[..r.len() - suffix], &a[..a.len() - suffix])
}

/// Validates raw variants against a reference dictionary and normalizes them
#[derive(Debug, Clone)]
pub struct Normalizer {
    dictionary: ReferenceDictionary,
}

impl Normalizer {
    pub fn new(dictionary: ReferenceDictionary) -> Self {
        Self { dictionary }
    }

    pub fn dictionary(&self) -> &ReferenceDictionary {
        &self.dictionary
    }

    /// Validate, trim and classify a raw variant
    ///
    /// # Errors
    ///
    /// `InvalidVariant` for a non-positive position, an unrecognized contig, a
    /// position beyond the contig end, bases other than `ACGTN`, or alleles
    /// that are identical.
    pub fn normalize(&self, raw: &RawVariant) -> Result<NormalizedVariant, AnnotateError> {
        if raw.position <= 0 {
            return Err(AnnotateError::invalid_variant(format!(
                "position must be positive, got {}",
                raw.position
            )));
        }
        let (contig, length) = self.dictionary.lookup(&raw.contig)?;

        let reference = normalize_allele(&raw.reference);
        let alternate = normalize_allele(&raw.alternate);
        for allele in [&reference, &alternate] {
            if !is_valid_dna(allele) {
                return Err(AnnotateError::InvalidVariant {
                    msg: format!("allele '{}' contains invalid bases", allele),
                    code: ErrorCode::InvalidBase,
                });
            }
        }
        if reference == alternate {
            return Err(AnnotateError::invalid_variant(format!(
                "reference and alternate are identical ('{}')",
                reference
            )));
        }

        let start = (raw.position - 1) as u64;
        let end = start + reference.len() as u64;
        if end > length || start > length {
            return Err(AnnotateError::invalid_variant(format!(
                "{}:{} is beyond the end of contig {} (length {})",
                raw.contig, raw.position, contig, length
            )));
        }

        let (prefix, r, a) = trim_alleles(&reference, &alternate);
        let trimmed_start = start + prefix as u64;
        let interval = GenomeInterval::new(
            contig,
            Strand::Plus,
            trimmed_start,
            trimmed_start + r.len() as u64,
        )?;
        let normalized = NormalizedVariant::new(GenomeVariant::new(interval, r, a)?)?;
        log::trace!("normalized {} to {}", raw, normalized);
        Ok(normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::dict::GenomeBuild;
    use crate::variant::VariantKind;
    use rstest::rstest;

    fn normalizer() -> Normalizer {
        Normalizer::new(ReferenceDictionary::for_build(GenomeBuild::GRCh37))
    }

    #[rstest]
    #[case("C", "T", 0, "C", "T")]
    #[case("CAG", "CTG", 1, "A", "T")]
    #[case("GAA", "GA", 2, "A", "")]
    #[case("G", "GTT", 1, "", "TT")]
    #[case("ACGT", "AT", 1, "CG", "")]
    #[case("TTT", "TT", 2, "T", "")]
    fn test_trim_alleles(
        #[case] r: &str,
        #[case] a: &str,
        #[case] prefix: usize,
        #[case] tr: &str,
        #[case] ta: &str,
    ) {
        assert_eq!(trim_alleles(r, a), (prefix, tr, ta));
    }

    #[test]
    fn test_normalize_snv() {
        let v = normalizer()
            .normalize(&RawVariant::new("chr14", 23896042, "C", "T"))
            .unwrap();
        assert_eq!(v.kind(), VariantKind::Snv);
        assert_eq!(v.contig(), "14");
        assert_eq!((v.start(), v.end()), (23896041, 23896042));
    }

    #[test]
    fn test_normalize_padded_deletion() {
        let v = normalizer()
            .normalize(&RawVariant::new("1", 100, "GAA", "G"))
            .unwrap();
        assert_eq!(v.kind(), VariantKind::Deletion);
        // shared prefix GA is removed, leaving the last A
        assert_eq!((v.start(), v.end()), (101, 102));
        assert_eq!(v.reference(), "A");
    }

    #[test]
    fn test_normalize_insertion() {
        let v = normalizer()
            .normalize(&RawVariant::new("1", 100, "G", "GTT"))
            .unwrap();
        assert_eq!(v.kind(), VariantKind::Insertion);
        assert_eq!((v.start(), v.end()), (100, 100));
        assert_eq!(v.alternate(), "TT");
    }

    #[rstest]
    #[case(RawVariant::new("1", 0, "A", "T"), ErrorCode::InvalidVariant)]
    #[case(RawVariant::new("1", -5, "A", "T"), ErrorCode::InvalidVariant)]
    #[case(RawVariant::new("chrQ", 10, "A", "T"), ErrorCode::UnknownContig)]
    #[case(RawVariant::new("1", 10, "A", "A"), ErrorCode::InvalidVariant)]
    #[case(RawVariant::new("1", 10, "A", "U"), ErrorCode::InvalidBase)]
    #[case(RawVariant::new("MT", 16572, "A", "T"), ErrorCode::InvalidVariant)]
    #[case(RawVariant::new("1", 10, "", ""), ErrorCode::InvalidVariant)]
    fn test_normalize_rejects(#[case] raw: RawVariant, #[case] code: ErrorCode) {
        let err = normalizer().normalize(&raw).unwrap_err();
        assert_eq!(err.code(), code);
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let n = normalizer();
        for raw in [
            RawVariant::new("1", 100, "GAA", "G"),
            RawVariant::new("1", 100, "CAGT", "CTTGT"),
            RawVariant::new("X", 5, "", "ACG"),
        ] {
            let once = n.normalize(&raw).unwrap();
            let twice = n.normalize(&once.to_raw()).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_lowercase_and_markers_accepted() {
        let v = normalizer()
            .normalize(&RawVariant::new("1", 100, "a", "-"))
            .unwrap();
        assert_eq!(v.kind(), VariantKind::Deletion);
    }
}
