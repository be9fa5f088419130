//! Transcript-space view of a variant lying within a single exon
//!
//! Alleles are oriented to the transcript (reverse-complemented on the minus
//! strand) and pure indels are shuffled along the spliced sequence, bounded by
//! the exon they fall in. A stated reference that disagrees with the
//! transcript is recorded and the variant is left where it is.

use crate::annotation::AnnotationMessage;
use crate::coords::Strand;
use crate::hgvs::{genomic_edit, NaChange, NaEdit, TxPos};
use crate::reference::TranscriptModel;
use crate::sequence::reverse_complement;
use crate::variant::{duplicated_span, shuffle, Boundaries, NormalizedVariant, ShuffleDirection, VariantKind};

use super::oriented_alleles;

/// A variant projected into transcript coordinates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExonicVariant {
    /// Transcript offset of the first affected base (the insertion point for insertions)
    pub start: u64,
    /// Exclusive transcript end; equal to `start` for insertions
    pub end: u64,
    /// Transcript-oriented reference allele
    pub reference: String,
    /// Transcript-oriented alternate allele
    pub alternate: String,
    pub kind: VariantKind,
    /// Genomic index of the containing exon
    pub exon_index: usize,
    /// Transcript-space bounds of the containing exon
    pub exon: (u64, u64),
    /// Span duplicated by an insertion, if the inserted bases repeat their flank
    pub duplication: Option<(u64, u64)>,
    pub mismatch: Option<AnnotationMessage>,
}

impl ExonicVariant {
    /// Project `variant` onto `transcript`; None unless it lies within one exon
    pub fn project(
        variant: &NormalizedVariant,
        transcript: &TranscriptModel,
        direction: ShuffleDirection,
    ) -> Option<Self> {
        let (gs, ge) = (variant.start(), variant.end());
        let (start, end) = transcript.interval_to_tx(gs, ge)?;
        let idx = transcript
            .exons()
            .iter()
            .position(|e| e.touches_boundary(gs) && e.touches_boundary(ge))?;
        let exon = transcript.exon_tx_bounds(idx)?;
        let (reference, alternate) = oriented_alleles(variant, transcript.strand());

        let mut projected = Self {
            start,
            end,
            reference,
            alternate,
            kind: variant.kind(),
            exon_index: idx,
            exon,
            duplication: None,
            mismatch: None,
        };

        let found = transcript.subsequence(start, end)?;
        if found != projected.reference {
            projected.mismatch = Some(AnnotationMessage::SequenceMismatch {
                location: projected.location(transcript),
                expected: found.to_string(),
                found: projected.reference.clone(),
            });
            return Some(projected);
        }

        if matches!(projected.kind, VariantKind::Insertion | VariantKind::Deletion) {
            projected.shuffle(transcript, direction);
        }
        Some(projected)
    }

    fn shuffle(&mut self, transcript: &TranscriptModel, direction: ShuffleDirection) {
        let seq = transcript.sequence().as_bytes();
        let result = shuffle(
            seq,
            self.alternate.as_bytes(),
            self.start,
            self.end,
            &Boundaries::new(self.exon.0, self.exon.1),
            direction,
        );
        if result.shifted {
            log::trace!(
                "{}: shifted {} from {}..{} to {}..{}",
                transcript.accession(),
                self.kind,
                self.start,
                self.end,
                result.start,
                result.end
            );
        }
        self.start = result.start;
        self.end = result.end;
        match self.kind {
            VariantKind::Deletion => {
                self.reference = String::from_utf8_lossy(&seq[result.start as usize..result.end as usize])
                    .into_owned();
            }
            _ => {
                self.alternate = String::from_utf8_lossy(&result.inserted).into_owned();
                self.duplication = duplicated_span(seq, &result.inserted, result.start, direction);
            }
        }
    }

    /// Whether this is a pure insertion point
    pub fn is_insertion(&self) -> bool {
        self.start == self.end
    }

    /// Net change in transcript length
    pub fn net_length(&self) -> i64 {
        self.alternate.len() as i64 - (self.end - self.start) as i64
    }

    /// Transcript sequence with the alternate allele applied
    pub fn apply(&self, transcript: &TranscriptModel) -> Vec<u8> {
        let seq = transcript.sequence().as_bytes();
        let mut mutated = Vec::with_capacity(seq.len() + self.alternate.len());
        mutated.extend_from_slice(&seq[..self.start as usize]);
        mutated.extend_from_slice(self.alternate.as_bytes());
        mutated.extend_from_slice(&seq[self.end as usize..]);
        mutated
    }

    /// Positions flanking an insertion point. At an exon edge the flank on the
    /// intron side is written as an intronic offset from the exon base.
    fn insertion_flanks(&self, transcript: &TranscriptModel) -> (TxPos, TxPos) {
        let b = self.start;
        if b == self.exon.1 {
            let last = transcript.tx_pos(b - 1, 0);
            (last, last.with_offset(1))
        } else if b == self.exon.0 {
            let first = transcript.tx_pos(b, 0);
            (first.with_offset(-1), first)
        } else {
            (transcript.tx_pos(b - 1, 0), transcript.tx_pos(b, 0))
        }
    }

    fn span_positions(&self, transcript: &TranscriptModel, start: u64, end: u64) -> (TxPos, Option<TxPos>) {
        let first = transcript.tx_pos(start, 0);
        let last = (end > start + 1).then(|| transcript.tx_pos(end - 1, 0));
        (first, last)
    }

    /// `c.`/`n.` change describing this variant
    pub fn change(&self, transcript: &TranscriptModel) -> NaChange<TxPos> {
        let prefix = transcript.coordinate_prefix();
        if let Some((s, e)) = self.duplication {
            let (first, last) = self.span_positions(transcript, s, e);
            return NaChange::new(prefix, first, last, NaEdit::Duplication);
        }
        let (first, last) = self.span_positions(transcript, self.start, self.end);
        match self.kind {
            VariantKind::Snv => NaChange::new(
                prefix,
                first,
                None,
                NaEdit::Substitution {
                    reference: self.reference.clone(),
                    alternate: self.alternate.clone(),
                },
            ),
            VariantKind::Deletion => NaChange::new(prefix, first, last, NaEdit::Deletion),
            VariantKind::Insertion => {
                let (left, right) = self.insertion_flanks(transcript);
                NaChange::new(
                    prefix,
                    left,
                    Some(right),
                    NaEdit::Insertion {
                        inserted: self.alternate.clone(),
                    },
                )
            }
            VariantKind::Mnv | VariantKind::Indel => NaChange::new(
                prefix,
                first,
                last,
                NaEdit::Delins {
                    inserted: self.alternate.clone(),
                },
            ),
        }
    }

    /// Genomic change of a shifted indel, mapped back from transcript space.
    ///
    /// None for substitutions and for variants left in place after a
    /// reference mismatch; their trimmed genomic form already applies.
    pub fn genomic_change(&self, transcript: &TranscriptModel) -> Option<NaChange<u64>> {
        if self.mismatch.is_some()
            || !matches!(self.kind, VariantKind::Insertion | VariantKind::Deletion)
        {
            return None;
        }
        let to_genomic = |ts: u64, te: u64| -> Option<(u64, u64)> {
            let a = transcript.tx_boundary_to_genomic(self.exon_index, ts)?;
            let b = transcript.tx_boundary_to_genomic(self.exon_index, te)?;
            Some((a.min(b), a.max(b)))
        };
        if let Some((s, e)) = self.duplication {
            let (start, end) = to_genomic(s, e)?;
            let last = (end > start + 1).then_some(end);
            return Some(NaChange::new('g', start + 1, last, NaEdit::Duplication));
        }
        let (start, end) = to_genomic(self.start, self.end)?;
        let forward = |s: &str| match transcript.strand() {
            Strand::Plus => s.to_string(),
            Strand::Minus => reverse_complement(s),
        };
        Some(genomic_edit(
            self.kind,
            start,
            end,
            &forward(&self.reference),
            &forward(&self.alternate),
        ))
    }

    /// Location of the affected bases, e.g. `c.10_12`
    fn location(&self, transcript: &TranscriptModel) -> String {
        let prefix = transcript.coordinate_prefix();
        let (first, last) = self.span_positions(transcript, self.start, self.end);
        match last {
            Some(last) => format!("{}.{}_{}", prefix, first, last),
            None => format!("{}.{}", prefix, first),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::dict::ReferenceDictionary;
    use crate::variant::{Normalizer, RawVariant};
    use rstest::rstest;

    /// exon 1: [100,110), exon 2: [200,210); CDS ATG AAA CCC GGG TAA at offsets 2..17
    fn transcript(strand: Strand) -> TranscriptModel {
        TranscriptModel::builder("NM_TEST.1")
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

    fn project(strand: Strand, pos: i64, r: &str, a: &str) -> ExonicVariant {
        ExonicVariant::project(
            &normalize(pos, r, a),
            &transcript(strand),
            ShuffleDirection::ThreePrime,
        )
        .unwrap()
    }

    #[test]
    fn test_snv_plus() {
        // genomic 104 (1-based 105) is transcript offset 4: the G of ATG
        let v = project(Strand::Plus, 105, "G", "C");
        assert_eq!((v.start, v.end), (4, 5));
        assert!(v.mismatch.is_none());
        assert_eq!(v.change(&transcript(Strand::Plus)).to_string(), "c.3G>C");
    }

    #[test]
    fn test_snv_minus_reverse_complements() {
        // genomic 209 (1-based 210) is transcript offset 0 on the minus strand
        let v = project(Strand::Minus, 210, "C", "T");
        assert_eq!((v.start, v.end), (0, 1));
        assert_eq!((v.reference.as_str(), v.alternate.as_str()), ("G", "A"));
        assert_eq!(v.change(&transcript(Strand::Minus)).to_string(), "c.-2G>A");
    }

    #[test]
    fn test_mismatch_recorded_without_shuffling() {
        let v = project(Strand::Plus, 105, "T", "C");
        assert_eq!(
            v.mismatch,
            Some(AnnotationMessage::SequenceMismatch {
                location: "c.3".to_string(),
                expected: "G".to_string(),
                found: "T".to_string(),
            })
        );
        // stated reference is kept
        assert_eq!(v.change(&transcript(Strand::Plus)).to_string(), "c.3T>C");
    }

    #[test]
    fn test_deletion_shifts_three_prime_within_exon() {
        // delete the first A of AAA (genomic 105..108) -> last A
        let v = project(Strand::Plus, 105, "GA", "G");
        assert_eq!((v.start, v.end), (7, 8));
        assert_eq!(v.change(&transcript(Strand::Plus)).to_string(), "c.6del");
    }

    #[test]
    fn test_insertion_duplication() {
        // insert A after the G of ATG: slides to the end of AAA and duplicates it
        let v = project(Strand::Plus, 105, "G", "GA");
        assert_eq!(v.duplication, Some((7, 8)));
        assert_eq!(v.change(&transcript(Strand::Plus)).to_string(), "c.6dup");
        assert_eq!(v.net_length(), 1);
    }

    #[test]
    fn test_insertion_plain() {
        let v = project(Strand::Plus, 105, "G", "GTT");
        assert!(v.duplication.is_none());
        assert_eq!(v.change(&transcript(Strand::Plus)).to_string(), "c.3_4insTT");
        let mutated = v.apply(&transcript(Strand::Plus));
        assert_eq!(&mutated[..8], b"GGATGTTA");
    }

    #[test]
    fn test_insertion_at_exon_edge() {
        // between the last base of exon 1 (genomic 109) and the intron
        let v = project(Strand::Plus, 110, "C", "CTT");
        assert_eq!((v.start, v.exon), (10, (0, 10)));
        assert_eq!(v.change(&transcript(Strand::Plus)).to_string(), "c.8_8+1insTT");
    }

    #[rstest]
    // AAA at transcript 5..8 is genomic TTT at 202..205 on the minus strand
    #[case(202, "GT", "G")]
    #[case(204, "TT", "T")]
    #[case(205, "TC", "C")]
    fn test_minus_deletion_genomic_change_ignores_padding(
        #[case] pos: i64,
        #[case] r: &str,
        #[case] a: &str,
    ) {
        let tx = transcript(Strand::Minus);
        let v = project(Strand::Minus, pos, r, a);
        assert_eq!((v.start, v.end), (7, 8));
        assert_eq!(v.change(&tx).to_string(), "c.6del");
        assert_eq!(v.genomic_change(&tx).unwrap().to_string(), "g.203del");
    }

    #[test]
    fn test_plus_genomic_change_follows_shift() {
        let tx = transcript(Strand::Plus);
        let v = project(Strand::Plus, 105, "GA", "G");
        assert_eq!(v.genomic_change(&tx).unwrap().to_string(), "g.108del");

        let v = project(Strand::Plus, 105, "G", "GA");
        assert_eq!(v.genomic_change(&tx).unwrap().to_string(), "g.108dup");

        let v = project(Strand::Plus, 105, "G", "GTT");
        assert_eq!(v.genomic_change(&tx).unwrap().to_string(), "g.105_106insTT");

        // substitutions keep the trimmed genomic form
        assert!(project(Strand::Plus, 105, "G", "C").genomic_change(&tx).is_none());
    }

    #[test]
    fn test_minus_insertion_genomic_change_is_forward_strand() {
        let tx = transcript(Strand::Minus);
        // insert T (transcript A) next to genomic TTT: a duplication of the last A
        let v = project(Strand::Minus, 205, "T", "TT");
        assert_eq!(v.change(&tx).to_string(), "c.6dup");
        assert_eq!(v.genomic_change(&tx).unwrap().to_string(), "g.203dup");

        // insert GG after genomic A at 1-based 207: transcript CC between c.1 and c.2
        let v = project(Strand::Minus, 207, "A", "AGG");
        assert_eq!(v.change(&tx).to_string(), "c.1_2insCC");
        assert_eq!(v.genomic_change(&tx).unwrap().to_string(), "g.207_208insGG");
    }

    #[test]
    fn test_not_exonic() {
        let v = normalize(150, "A", "G");
        assert!(ExonicVariant::project(&v, &transcript(Strand::Plus), ShuffleDirection::ThreePrime).is_none());
    }
}
