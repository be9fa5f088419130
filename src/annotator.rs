//! The annotation entry point: a transcript context plus settings
//!
//! An [`Annotator`] owns nothing mutable. It normalizes raw input, asks the
//! [`TranscriptIndex`] for candidate transcripts and runs one
//! [`Dispatcher`](crate::dispatch::Dispatcher) per candidate. A failure on
//! one transcript is recorded next to the other transcripts' annotations and
//! never discards them.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::annotation::{Annotation, AnnotationList};
use crate::config::{AnnotateConfig, ErrorMode};
use crate::dispatch::Dispatcher;
use crate::error::AnnotateError;
use crate::reference::dict::ReferenceDictionary;
use crate::reference::{TranscriptIndex, TranscriptModel};
use crate::variant::{NormalizedVariant, Normalizer, RawVariant};

/// A failed (variant, transcript) pair
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptFailure {
    pub transcript: String,
    pub error: AnnotateError,
}

/// Every annotation of one input variant
#[derive(Debug, Clone, PartialEq)]
pub struct VariantAnnotations {
    pub input: RawVariant,
    pub variant: NormalizedVariant,
    /// Most severe first
    pub annotations: AnnotationList,
    pub failures: Vec<TranscriptFailure>,
}

impl VariantAnnotations {
    /// Whether any transcript failed
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Result of one input of a batch
#[derive(Debug, Clone, PartialEq)]
pub enum BatchOutcome {
    Annotated(VariantAnnotations),
    /// The variant itself was rejected before any transcript was tried
    Failed { input: RawVariant, error: AnnotateError },
    /// Not started because the batch was cancelled
    Cancelled { input: RawVariant },
}

impl BatchOutcome {
    pub fn input(&self) -> &RawVariant {
        match self {
            BatchOutcome::Annotated(result) => &result.input,
            BatchOutcome::Failed { input, .. } | BatchOutcome::Cancelled { input } => input,
        }
    }

    pub fn is_annotated(&self) -> bool {
        matches!(self, BatchOutcome::Annotated(_))
    }

    pub fn annotations(&self) -> Option<&VariantAnnotations> {
        match self {
            BatchOutcome::Annotated(result) => Some(result),
            _ => None,
        }
    }
}

/// Counts over a batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub total: usize,
    pub annotated: usize,
    pub failed: usize,
    pub cancelled: usize,
}

impl BatchStats {
    pub fn from_outcomes(outcomes: &[BatchOutcome]) -> Self {
        outcomes.iter().fold(
            Self {
                total: outcomes.len(),
                ..Self::default()
            },
            |mut stats, outcome| {
                match outcome {
                    BatchOutcome::Annotated(_) => stats.annotated += 1,
                    BatchOutcome::Failed { .. } => stats.failed += 1,
                    BatchOutcome::Cancelled { .. } => stats.cancelled += 1,
                }
                stats
            },
        )
    }

    /// Annotated share of the batch as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            (self.annotated as f64 / self.total as f64) * 100.0
        }
    }
}

/// Annotates variants against a transcript context
#[derive(Debug, Clone)]
pub struct Annotator<I> {
    index: I,
    config: AnnotateConfig,
    normalizer: Normalizer,
}

impl<I: TranscriptIndex> Annotator<I> {
    /// Input is validated against the built-in dictionary of the configured build
    pub fn new(index: I, config: AnnotateConfig) -> Self {
        let dictionary = ReferenceDictionary::for_build(config.genome_build);
        Self::with_dictionary(index, config, dictionary)
    }

    pub fn with_dictionary(index: I, config: AnnotateConfig, dictionary: ReferenceDictionary) -> Self {
        Self {
            index,
            config,
            normalizer: Normalizer::new(dictionary),
        }
    }

    pub fn config(&self) -> &AnnotateConfig {
        &self.config
    }

    pub fn index(&self) -> &I {
        &self.index
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Annotate one normalized variant against one transcript
    ///
    /// # Errors
    ///
    /// `UnsupportedVariantType` when no builder covers the variant's kind and
    /// region. In strict mode a sequence mismatch or an incomplete
    /// translation is returned as an error instead of an annotation.
    pub fn annotate(
        &self,
        variant: &NormalizedVariant,
        transcript: &TranscriptModel,
    ) -> Result<Annotation, AnnotateError> {
        let annotation = Dispatcher::new(variant, transcript, &self.config).run()?;
        self.apply_error_mode(annotation)
    }

    fn apply_error_mode(&self, annotation: Annotation) -> Result<Annotation, AnnotateError> {
        match self.config.error_mode {
            ErrorMode::Strict => {
                if let Some(message) = annotation.messages.first() {
                    return Err(message.to_error(&annotation.transcript));
                }
            }
            ErrorMode::Lenient => {
                for message in &annotation.messages {
                    log::warn!("{} {}: {}", annotation.genomic_change, annotation.transcript, message);
                }
            }
            ErrorMode::Silent => {}
        }
        Ok(annotation)
    }

    /// Annotate a normalized variant against every overlapping transcript
    pub fn annotate_normalized(&self, input: RawVariant, variant: NormalizedVariant) -> VariantAnnotations {
        let candidates = self
            .index
            .overlapping(variant.contig(), variant.start(), variant.end());
        log::debug!("{}: {} candidate transcript(s)", variant, candidates.len());

        let mut annotations = Vec::with_capacity(candidates.len());
        let mut failures = Vec::new();
        for transcript in candidates {
            match self.annotate(&variant, transcript) {
                Ok(annotation) => annotations.push(annotation),
                Err(error) => {
                    log::debug!("{} on {}: {}", variant, transcript.accession(), error);
                    failures.push(TranscriptFailure {
                        transcript: transcript.accession().to_string(),
                        error,
                    });
                }
            }
        }
        if annotations.is_empty() && failures.is_empty() {
            annotations.push(Annotation::intergenic(variant.genomic_change()));
        }

        VariantAnnotations {
            input,
            variant,
            annotations: AnnotationList::new(annotations),
            failures,
        }
    }

    /// Normalize a raw variant and annotate it against every overlapping transcript
    ///
    /// # Errors
    ///
    /// `InvalidVariant` when the input fails validation; per-transcript
    /// failures are reported in [`VariantAnnotations::failures`].
    pub fn annotate_all(&self, raw: &RawVariant) -> Result<VariantAnnotations, AnnotateError> {
        let variant = self.normalizer.normalize(raw)?;
        Ok(self.annotate_normalized(raw.clone(), variant))
    }

    /// Outcome for a single batch input
    pub fn outcome(&self, raw: &RawVariant) -> BatchOutcome {
        match self.annotate_all(raw) {
            Ok(result) => BatchOutcome::Annotated(result),
            Err(error) => {
                log::debug!("{}: {}", raw, error);
                BatchOutcome::Failed {
                    input: raw.clone(),
                    error,
                }
            }
        }
    }

    /// Annotate a batch in input order
    ///
    /// `cancel` is checked before each variant starts; once it is set the
    /// remaining inputs are reported as cancelled.
    pub fn annotate_batch(
        &self,
        variants: &[RawVariant],
        cancel: Option<&AtomicBool>,
    ) -> (Vec<BatchOutcome>, BatchStats) {
        let outcomes: Vec<BatchOutcome> = variants
            .iter()
            .map(|raw| {
                if is_cancelled(cancel) {
                    BatchOutcome::Cancelled { input: raw.clone() }
                } else {
                    self.outcome(raw)
                }
            })
            .collect();
        let stats = BatchStats::from_outcomes(&outcomes);
        log::info!(
            "Annotated {}/{} variants ({} failed, {} cancelled)",
            stats.annotated,
            stats.total,
            stats.failed,
            stats.cancelled
        );
        (outcomes, stats)
    }
}

pub(crate) fn is_cancelled(cancel: Option<&AtomicBool>) -> bool {
    cancel.is_some_and(|flag| flag.load(Ordering::Relaxed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::AnnotationMessage;
    use crate::coords::Strand;
    use crate::effect::VariantEffect;
    use crate::error::ErrorCode;
    use crate::reference::TranscriptDb;

    /// exon 1: [100,110), exon 2: [200,210); CDS ATG AAA CCC GGG TAA at offsets 2..17
    fn db() -> TranscriptDb {
        let mut db = TranscriptDb::new();
        for (accession, strand) in [("NM_PLUS.1", Strand::Plus), ("NM_MINUS.1", Strand::Minus)] {
            db.add(
                TranscriptModel::builder(accession)
                    .gene_symbol("GENE")
                    .contig("1")
                    .strand(strand)
                    .exon(100, 110)
                    .exon(200, 210)
                    .cds(2, 17)
                    .sequence("GGATGAAACCCGGGTAACCC")
                    .build()
                    .unwrap(),
            )
            .unwrap();
        }
        db
    }

    fn annotator(mode: ErrorMode) -> Annotator<TranscriptDb> {
        let mut dict = ReferenceDictionary::new();
        dict.add_contig("1", 1000);
        Annotator::with_dictionary(db(), AnnotateConfig::new().with_error_mode(mode), dict)
    }

    fn raw(pos: i64, r: &str, a: &str) -> RawVariant {
        RawVariant::new("1", pos, r, a)
    }

    #[test]
    fn test_annotate_all_overlapping() {
        let result = annotator(ErrorMode::Lenient).annotate_all(&raw(104, "T", "C")).unwrap();
        assert_eq!(result.annotations.len(), 2);
        assert!(result.failures.is_empty());
        let plus = result
            .annotations
            .iter()
            .find(|a| a.transcript == "NM_PLUS.1")
            .unwrap();
        assert_eq!(plus.cds_change.as_deref(), Some("c.2T>C"));
        assert_eq!(plus.effect, VariantEffect::StartLost);
        // most severe first
        assert_eq!(result.annotations.highest().unwrap().effect, VariantEffect::StartLost);
    }

    #[test]
    fn test_no_overlap_is_intergenic() {
        let result = annotator(ErrorMode::Lenient).annotate_all(&raw(500, "A", "G")).unwrap();
        let only = result.annotations.as_slice();
        assert_eq!(only.len(), 1);
        assert_eq!(only[0].effect, VariantEffect::Intergenic);
        assert!(only[0].transcript.is_empty());
        assert_eq!(only[0].genomic_change, "1:g.500A>G");
    }

    #[test]
    fn test_invalid_variant_is_error() {
        let err = annotator(ErrorMode::Lenient)
            .annotate_all(&raw(0, "A", "G"))
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidVariant);
        let err = annotator(ErrorMode::Lenient)
            .annotate_all(&RawVariant::new("chrUn", 5, "A", "G"))
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::UnknownContig);
    }

    #[test]
    fn test_span_boundary_failure_is_isolated() {
        // deletion from the intergenic region into exon 1 of both transcripts
        let result = annotator(ErrorMode::Lenient).annotate_all(&raw(99, "AGG", "A")).unwrap();
        assert_eq!(result.failures.len(), 2);
        assert!(result
            .failures
            .iter()
            .all(|f| f.error.code() == ErrorCode::UnsupportedVariantType));
        assert!(result.annotations.is_empty());
    }

    #[test]
    fn test_error_modes_on_mismatch() {
        // stated T where the plus transcript has G
        let variant = raw(105, "T", "C");

        let lenient = annotator(ErrorMode::Lenient).annotate_all(&variant).unwrap();
        let plus = lenient
            .annotations
            .iter()
            .find(|a| a.transcript == "NM_PLUS.1")
            .unwrap();
        assert!(plus.is_uncertain());
        assert!(matches!(
            plus.messages[0],
            AnnotationMessage::SequenceMismatch { .. }
        ));
        assert_eq!(plus.cds_change.as_deref(), Some("c.3T>C"));

        let silent = annotator(ErrorMode::Silent).annotate_all(&variant).unwrap();
        assert_eq!(silent.annotations, lenient.annotations);

        let strict = annotator(ErrorMode::Strict).annotate_all(&variant).unwrap();
        assert!(strict
            .failures
            .iter()
            .any(|f| f.transcript == "NM_PLUS.1" && f.error.code() == ErrorCode::SequenceMismatch));
    }

    #[test]
    fn test_batch_preserves_order_and_counts() {
        let inputs = vec![raw(104, "T", "C"), raw(0, "A", "G"), raw(500, "A", "G")];
        let (outcomes, stats) = annotator(ErrorMode::Lenient).annotate_batch(&inputs, None);
        assert_eq!(outcomes.len(), 3);
        for (outcome, input) in outcomes.iter().zip(&inputs) {
            assert_eq!(outcome.input(), input);
        }
        assert_eq!(
            stats,
            BatchStats {
                total: 3,
                annotated: 2,
                failed: 1,
                cancelled: 0
            }
        );
    }

    #[test]
    fn test_batch_cancelled_before_start() {
        let cancel = AtomicBool::new(true);
        let inputs = vec![raw(104, "T", "C"), raw(500, "A", "G")];
        let (outcomes, stats) = annotator(ErrorMode::Lenient).annotate_batch(&inputs, Some(&cancel));
        assert!(outcomes
            .iter()
            .all(|o| matches!(o, BatchOutcome::Cancelled { .. })));
        assert_eq!(stats.cancelled, 2);
        assert_eq!(stats.annotated, 0);
    }

    #[test]
    fn test_stats_success_rate() {
        let stats = BatchStats {
            total: 4,
            annotated: 3,
            failed: 1,
            cancelled: 0,
        };
        assert!((stats.success_rate() - 75.0).abs() < f64::EPSILON);
        assert!((BatchStats::default().success_rate() - 100.0).abs() < f64::EPSILON);
    }
}
