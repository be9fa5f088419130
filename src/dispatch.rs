//! Region classification and builder selection
//!
//! A [`Dispatcher`] handles exactly one (variant, transcript) pair and moves
//! through `Unclassified -> RegionDetermined -> BuilderSelected -> Complete`,
//! or ends in `Failed`. Regions are checked in this order:
//!
//! 1. outside the transcript span: intergenic
//! 2. crossing the transcript start or end: unsupported
//! 3. inside a splice window, or across an exon/intron junction: splice
//! 4. inside an intron: intronic
//! 5. inside one exon: noncoding exon, 5'UTR, 3'UTR or CDS, decided after the
//!    variant has been shuffled along the transcript
//!
//! A splice classification wins over whatever the variant does to the codons.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::annotation::Annotation;
use crate::builders::{self, BuildInput, ExonicVariant};
use crate::config::AnnotateConfig;
use crate::coords::Strand;
use crate::error::{AnnotateError, ErrorCode};
use crate::reference::{SpliceSite, TranscriptModel};
use crate::variant::{NormalizedVariant, VariantKind};

/// Which untranslated region an exonic variant falls in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UtrSide {
    FivePrime,
    ThreePrime,
}

/// Where a variant lies relative to a transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    Intergenic,
    /// Partly inside and partly outside the transcript span
    SpanBoundary,
    Splice(SpliceSite),
    Intronic,
    Utr(UtrSide),
    Cds,
    NoncodingExon,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::Intergenic => write!(f, "intergenic region"),
            Region::SpanBoundary => write!(f, "transcript boundary"),
            Region::Splice(SpliceSite::Donor) => write!(f, "splice donor"),
            Region::Splice(SpliceSite::Acceptor) => write!(f, "splice acceptor"),
            Region::Intronic => write!(f, "intron"),
            Region::Utr(UtrSide::FivePrime) => write!(f, "5' UTR"),
            Region::Utr(UtrSide::ThreePrime) => write!(f, "3' UTR"),
            Region::Cds => write!(f, "CDS"),
            Region::NoncodingExon => write!(f, "noncoding exon"),
        }
    }
}

/// The builder chosen for a (kind, region) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Builder {
    Snv,
    Insertion,
    Deletion,
    /// Block substitutions and indels
    Delins,
    Splice(SpliceSite),
    Utr(UtrSide),
    Intronic,
    Noncoding,
    Intergenic,
}

/// Builder for a variant kind in a region; None when no builder applies
pub fn select_builder(kind: VariantKind, region: Region) -> Option<Builder> {
    let builder = match region {
        Region::SpanBoundary => return None,
        Region::Intergenic => Builder::Intergenic,
        Region::Splice(site) => Builder::Splice(site),
        Region::Intronic => Builder::Intronic,
        Region::Utr(side) => Builder::Utr(side),
        Region::NoncodingExon => Builder::Noncoding,
        Region::Cds => match kind {
            VariantKind::Snv => Builder::Snv,
            VariantKind::Insertion => Builder::Insertion,
            VariantKind::Deletion => Builder::Deletion,
            VariantKind::Mnv | VariantKind::Indel => Builder::Delins,
        },
    };
    Some(builder)
}

/// Region of a variant plus its transcript-space projection when exonic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub region: Region,
    pub exonic: Option<ExonicVariant>,
}

impl Location {
    fn region(region: Region) -> Self {
        Self {
            region,
            exonic: None,
        }
    }
}

/// Classify where `variant` lies on `transcript`
pub fn locate(variant: &NormalizedVariant, transcript: &TranscriptModel, config: &AnnotateConfig) -> Location {
    let (start, end) = (variant.start(), variant.end());
    let span = transcript.span();
    let (lo, hi) = (span.start().value(), span.end().value());

    let outside = if start == end {
        start <= lo || start >= hi
    } else {
        end <= lo || start >= hi
    };
    if outside {
        return Location::region(Region::Intergenic);
    }
    if start < lo || end > hi {
        return Location::region(Region::SpanBoundary);
    }

    let windows = transcript.splice_windows(config.splice_window);
    let mut hits = windows.iter().filter(|w| w.intersects(start, end));
    // first window in transcript order
    let window = match transcript.strand() {
        Strand::Plus => hits.next(),
        Strand::Minus => hits.last(),
    };
    if let Some(window) = window {
        return Location::region(Region::Splice(window.site));
    }
    if let Some(site) = transcript.crossed_boundary(start, end) {
        return Location::region(Region::Splice(site));
    }

    let Some(exonic) = ExonicVariant::project(variant, transcript, config.shuffle_direction) else {
        return Location::region(Region::Intronic);
    };
    let region = if !transcript.is_coding() {
        Region::NoncodingExon
    } else {
        let (cs, ce) = (transcript.cds_start(), transcript.cds_end());
        let (ts, te) = (exonic.start, exonic.end);
        let (before, after) = if exonic.is_insertion() {
            (ts <= cs, ts >= ce)
        } else {
            (te <= cs, ts >= ce)
        };
        if before {
            Region::Utr(UtrSide::FivePrime)
        } else if after {
            Region::Utr(UtrSide::ThreePrime)
        } else {
            Region::Cds
        }
    };
    Location {
        region,
        exonic: Some(exonic),
    }
}

/// Progress of a single dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    Unclassified,
    RegionDetermined(Region),
    BuilderSelected(Builder),
    Complete,
    Failed(ErrorCode),
}

/// Annotates one variant against one transcript
#[derive(Debug)]
pub struct Dispatcher<'a> {
    variant: &'a NormalizedVariant,
    transcript: &'a TranscriptModel,
    config: &'a AnnotateConfig,
    state: DispatchState,
    location: Option<Location>,
}

impl<'a> Dispatcher<'a> {
    pub fn new(
        variant: &'a NormalizedVariant,
        transcript: &'a TranscriptModel,
        config: &'a AnnotateConfig,
    ) -> Self {
        Self {
            variant,
            transcript,
            config,
            state: DispatchState::Unclassified,
            location: None,
        }
    }

    pub fn state(&self) -> DispatchState {
        self.state
    }

    fn transition(&mut self, next: DispatchState) {
        log::debug!(
            "{} on {}: {:?} -> {:?}",
            self.variant,
            self.transcript.accession(),
            self.state,
            next
        );
        self.state = next;
    }

    /// Determine the region the variant occupies
    pub fn region(&mut self) -> Region {
        if let Some(location) = &self.location {
            return location.region;
        }
        let location = locate(self.variant, self.transcript, self.config);
        let region = location.region;
        self.location = Some(location);
        self.transition(DispatchState::RegionDetermined(region));
        region
    }

    /// Select the builder for the variant's kind and region
    pub fn builder(&mut self) -> Result<Builder, AnnotateError> {
        if let DispatchState::BuilderSelected(builder) = self.state {
            return Ok(builder);
        }
        let region = self.region();
        match select_builder(self.variant.kind(), region) {
            Some(builder) => {
                self.transition(DispatchState::BuilderSelected(builder));
                Ok(builder)
            }
            None => {
                let err = AnnotateError::UnsupportedVariantType {
                    transcript: self.transcript.accession().to_string(),
                    kind: self.variant.kind().to_string(),
                    region: region.to_string(),
                };
                self.transition(DispatchState::Failed(err.code()));
                Err(err)
            }
        }
    }

    /// Build the annotation; the dispatcher is consumed
    pub fn run(mut self) -> Result<Annotation, AnnotateError> {
        let builder = self.builder()?;
        let input = BuildInput {
            variant: self.variant,
            transcript: self.transcript,
            exonic: self.location.as_ref().and_then(|l| l.exonic.as_ref()),
        };
        match builders::build(builder, &input) {
            Ok(annotation) => {
                self.transition(DispatchState::Complete);
                Ok(annotation)
            }
            Err(err) => {
                self.transition(DispatchState::Failed(err.code()));
                Err(err)
            }
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
        TranscriptModel::builder("NM_DISPATCH.1")
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

    fn region(strand: Strand, pos: i64, r: &str, a: &str) -> Region {
        locate(&normalize(pos, r, a), &transcript(strand), &AnnotateConfig::default()).region
    }

    #[rstest]
    #[case(50, "A", "G", Region::Intergenic)]
    #[case(300, "A", "G", Region::Intergenic)]
    // insertion right before the first exon base
    #[case(100, "A", "AT", Region::Intergenic)]
    #[case(99, "AGG", "A", Region::SpanBoundary)]
    #[case(101, "G", "A", Region::Utr(UtrSide::FivePrime))]
    #[case(103, "A", "G", Region::Cds)]
    #[case(208, "C", "G", Region::Utr(UtrSide::ThreePrime))]
    // last exon base, touching the donor window
    #[case(110, "C", "T", Region::Cds)]
    // first and second intronic bases
    #[case(111, "G", "A", Region::Splice(SpliceSite::Donor))]
    #[case(112, "G", "A", Region::Splice(SpliceSite::Donor))]
    #[case(113, "G", "A", Region::Intronic)]
    #[case(199, "G", "A", Region::Splice(SpliceSite::Acceptor))]
    #[case(150, "G", "A", Region::Intronic)]
    // deletion of the last exon base and the first intronic base
    #[case(109, "CCG", "C", Region::Splice(SpliceSite::Donor))]
    fn test_locate_plus(#[case] pos: i64, #[case] r: &str, #[case] a: &str, #[case] expected: Region) {
        assert_eq!(region(Strand::Plus, pos, r, a), expected);
    }

    #[test]
    fn test_locate_minus_swaps_sites() {
        assert_eq!(
            region(Strand::Minus, 111, "G", "A"),
            Region::Splice(SpliceSite::Acceptor)
        );
        assert_eq!(
            region(Strand::Minus, 199, "G", "A"),
            Region::Splice(SpliceSite::Donor)
        );
        // genomic 209 (0-based) is transcript offset 0, in the 5'UTR
        assert_eq!(region(Strand::Minus, 210, "C", "T"), Region::Utr(UtrSide::FivePrime));
    }

    #[test]
    fn test_splice_window_width_is_configurable() {
        let config = AnnotateConfig::default().with_splice_window(5);
        let located = locate(&normalize(115, "G", "A"), &transcript(Strand::Plus), &config);
        assert_eq!(located.region, Region::Splice(SpliceSite::Donor));

        let config = AnnotateConfig::default().with_splice_window(0);
        let located = locate(&normalize(111, "G", "A"), &transcript(Strand::Plus), &config);
        assert_eq!(located.region, Region::Intronic);
    }

    #[test]
    fn test_select_builder() {
        assert_eq!(select_builder(VariantKind::Snv, Region::Cds), Some(Builder::Snv));
        assert_eq!(select_builder(VariantKind::Mnv, Region::Cds), Some(Builder::Delins));
        assert_eq!(select_builder(VariantKind::Indel, Region::Cds), Some(Builder::Delins));
        assert_eq!(
            select_builder(VariantKind::Deletion, Region::Splice(SpliceSite::Donor)),
            Some(Builder::Splice(SpliceSite::Donor))
        );
        assert_eq!(select_builder(VariantKind::Snv, Region::SpanBoundary), None);
    }

    #[test]
    fn test_dispatcher_states() {
        let tx = transcript(Strand::Plus);
        let variant = normalize(103, "A", "G");
        let config = AnnotateConfig::default();
        let mut dispatcher = Dispatcher::new(&variant, &tx, &config);
        assert_eq!(dispatcher.state(), DispatchState::Unclassified);
        assert_eq!(dispatcher.region(), Region::Cds);
        assert_eq!(dispatcher.state(), DispatchState::RegionDetermined(Region::Cds));
        assert_eq!(dispatcher.builder().unwrap(), Builder::Snv);
        assert_eq!(dispatcher.state(), DispatchState::BuilderSelected(Builder::Snv));

        let annotation = dispatcher.run().unwrap();
        assert_eq!(annotation.cds_change.as_deref(), Some("c.1A>G"));
        assert_eq!(annotation.protein_change.as_deref(), Some("p.(Met1?)"));
    }

    #[test]
    fn test_dispatcher_unsupported() {
        let tx = transcript(Strand::Plus);
        let variant = normalize(99, "AGG", "A");
        let config = AnnotateConfig::default();
        let mut dispatcher = Dispatcher::new(&variant, &tx, &config);
        let err = dispatcher.builder().unwrap_err();
        assert_eq!(err.code(), ErrorCode::UnsupportedVariantType);
        assert_eq!(
            dispatcher.state(),
            DispatchState::Failed(ErrorCode::UnsupportedVariantType)
        );
        assert!(!err.is_fatal());
    }
}
