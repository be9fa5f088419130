//! Builders that report a position but no codon-level consequence
//!
//! Intronic and splice variants are described from genomic coordinates
//! (`c.88+1G>A`, `c.89-2_89-1del`) and are never shuffled, since the core has
//! no intronic sequence to shift them along.

use crate::coords::Strand;
use crate::error::AnnotateError;
use crate::hgvs::{NaChange, NaEdit, TxPos};
use crate::reference::TranscriptModel;
use crate::variant::{NormalizedVariant, VariantKind};

use super::oriented_alleles;

fn locate(
    variant: &NormalizedVariant,
    transcript: &TranscriptModel,
    pos: Option<u64>,
) -> Result<TxPos, AnnotateError> {
    pos.and_then(|p| transcript.genomic_tx_pos(p)).ok_or_else(|| {
        AnnotateError::coordinate(format!(
            "{} is not within the span of {}",
            variant,
            transcript.accession()
        ))
    })
}

/// `c.`/`n.` change of a variant from its genomic bases, in transcript order
pub fn span_change(
    variant: &NormalizedVariant,
    transcript: &TranscriptModel,
) -> Result<NaChange<TxPos>, AnnotateError> {
    let (start, end) = (variant.start(), variant.end());
    let reverse = transcript.strand() == Strand::Minus;
    let prefix = transcript.coordinate_prefix();
    let (reference, alternate) = oriented_alleles(variant, transcript.strand());

    if variant.kind() == VariantKind::Insertion {
        let left = locate(variant, transcript, start.checked_sub(1))?;
        let right = locate(variant, transcript, Some(start))?;
        let (left, right) = if reverse { (right, left) } else { (left, right) };
        return Ok(NaChange::new(
            prefix,
            left,
            Some(right),
            NaEdit::Insertion { inserted: alternate },
        ));
    }

    let first = locate(variant, transcript, Some(start))?;
    let last = locate(variant, transcript, end.checked_sub(1))?;
    let (first, last) = if reverse { (last, first) } else { (first, last) };
    let last = (end - start > 1).then_some(last);
    let edit = match variant.kind() {
        VariantKind::Snv => NaEdit::Substitution {
            reference,
            alternate,
        },
        VariantKind::Deletion => NaEdit::Deletion,
        _ => NaEdit::Delins { inserted: alternate },
    };
    Ok(NaChange::new(prefix, first, last, edit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::dict::ReferenceDictionary;
    use crate::variant::{Normalizer, RawVariant};
    use rstest::rstest;

    fn transcript(strand: Strand) -> TranscriptModel {
        TranscriptModel::builder("NM_SPAN.1")
            .contig("1")
            .strand(strand)
            .exon(100, 110)
            .exon(200, 210)
            .cds(2, 17)
            .sequence("GGATGAAACCCGGGTAACCC")
            .build()
            .unwrap()
    }

    fn normalize(pos: i64, r: &str, a: &str) -> NormalizedVariant {
        let mut dict = ReferenceDictionary::new();
        dict.add_contig("1", 1000);
        Normalizer::new(dict)
            .normalize(&RawVariant::new("1", pos, r, a))
            .unwrap()
    }

    #[rstest]
    // first intronic base after exon 1 (c.8)
    #[case(Strand::Plus, 111, "G", "A", "c.8+1G>A")]
    #[case(Strand::Plus, 200, "A", "G", "c.9-1A>G")]
    #[case(Strand::Plus, 111, "GTA", "G", "c.8+2_8+3del")]
    #[case(Strand::Plus, 120, "A", "AT", "c.8+10_8+11insT")]
    // minus strand: genomic 200 (0-based 199) follows transcript c.8 on the 5' side
    #[case(Strand::Minus, 200, "C", "T", "c.8+1G>A")]
    #[case(Strand::Minus, 111, "G", "C", "c.9-1C>G")]
    #[case(Strand::Minus, 197, "GCA", "G", "c.8+2_8+3del")]
    #[case(Strand::Minus, 190, "A", "AT", "c.8+10_8+11insA")]
    fn test_span_change(
        #[case] strand: Strand,
        #[case] pos: i64,
        #[case] r: &str,
        #[case] a: &str,
        #[case] expected: &str,
    ) {
        let change = span_change(&normalize(pos, r, a), &transcript(strand)).unwrap();
        assert_eq!(change.to_string(), expected);
    }

    #[test]
    fn test_outside_span_is_error() {
        let err = span_change(&normalize(50, "A", "G"), &transcript(Strand::Plus)).unwrap_err();
        assert!(matches!(err, AnnotateError::Coordinate { .. }));
    }
}
