//! Transcript and exon models
//!
//! # Coordinate System
//!
//! | Field | Basis | Notes |
//! |-------|-------|-------|
//! | `Exon.start`, `Exon.end` | 0-based half-open | Genomic, forward strand |
//! | `TranscriptModel.cds_start`, `cds_end` | 0-based half-open | Transcript offsets, 5'→3' |
//! | `TranscriptModel.sequence` | - | Spliced transcript, 5'→3' (reverse-complemented for `-`) |
//!
//! Exons are always stored in increasing genomic order, whatever the strand.
//! A transcript whose `cds_start == cds_end` is noncoding.
//!
//! Models are validated once when constructed (builder or JSON); a model that
//! violates its structural invariants is rejected with
//! [`AnnotateError::Configuration`] and never reaches annotation.

use serde::{Deserialize, Serialize};

use crate::coords::{GenomeInterval, Strand};
use crate::error::AnnotateError;
use crate::sequence::is_valid_dna;

/// An exon in genomic coordinates (0-based, half-open, forward strand)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Exon {
    pub start: u64,
    pub end: u64,
}

impl Exon {
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    /// Length of the exon
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the base at 0-based `pos` is in this exon
    pub fn contains(&self, pos: u64) -> bool {
        pos >= self.start && pos < self.end
    }

    /// Whether the boundary `b` (point between bases) touches this exon, edges included
    pub fn touches_boundary(&self, b: u64) -> bool {
        b >= self.start && b <= self.end
    }
}

/// Serialized form of a transcript, as found in transcript JSON files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptRecord {
    pub accession: String,
    #[serde(default)]
    pub gene_symbol: String,
    pub contig: String,
    pub strand: Strand,
    pub exons: Vec<Exon>,
    pub cds_start: u64,
    pub cds_end: u64,
    pub sequence: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xref: Option<String>,
}

/// A validated transcript model
///
/// Immutable once built; shared read-only across annotation workers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TranscriptRecord", into = "TranscriptRecord")]
pub struct TranscriptModel {
    accession: String,
    gene_symbol: String,
    contig: String,
    strand: Strand,
    exons: Vec<Exon>,
    cds_start: u64,
    cds_end: u64,
    sequence: String,
    xref: Option<String>,
    /// Forward-strand cumulative offset of each exon's first base
    exon_offsets: Vec<u64>,
    span: GenomeInterval,
}

impl TranscriptModel {
    /// Start building a transcript model
    pub fn builder(accession: impl Into<String>) -> TranscriptModelBuilder {
        TranscriptModelBuilder::new(accession)
    }

    /// Validate a record and build the model
    pub fn from_record(record: TranscriptRecord) -> Result<Self, AnnotateError> {
        let TranscriptRecord {
            accession,
            gene_symbol,
            contig,
            strand,
            exons,
            cds_start,
            cds_end,
            sequence,
            xref,
        } = record;
        let sequence = sequence.to_ascii_uppercase();
        let fail = |msg: String| AnnotateError::configuration(accession.as_str(), msg);

        if exons.is_empty() {
            return Err(fail("transcript has no exons".to_string()));
        }
        for (i, exon) in exons.iter().enumerate() {
            if exon.start >= exon.end {
                return Err(fail(format!(
                    "exon {} is empty or inverted ({}-{})",
                    i + 1,
                    exon.start,
                    exon.end
                )));
            }
        }
        for (i, pair) in exons.windows(2).enumerate() {
            if pair[1].start < pair[0].end {
                return Err(fail(format!(
                    "exons {} and {} are unsorted or overlapping",
                    i + 1,
                    i + 2
                )));
            }
        }

        let mut exon_offsets = Vec::with_capacity(exons.len());
        let mut total = 0u64;
        for exon in &exons {
            exon_offsets.push(total);
            total += exon.len();
        }

        if sequence.len() as u64 != total {
            return Err(fail(format!(
                "sequence length {} does not match exon length {}",
                sequence.len(),
                total
            )));
        }
        if !is_valid_dna(&sequence) {
            return Err(fail("sequence contains characters other than ACGTN".to_string()));
        }
        if cds_start > cds_end || cds_end > total {
            return Err(fail(format!(
                "CDS {}-{} lies outside the transcript (length {})",
                cds_start, cds_end, total
            )));
        }

        let first = exons[0].start;
        let last = exons[exons.len() - 1].end;
        let span = GenomeInterval::new(contig.as_str(), Strand::Plus, first, last)
            .map_err(|e| fail(e.to_string()))?;

        Ok(Self {
            accession,
            gene_symbol,
            contig,
            strand,
            exons,
            cds_start,
            cds_end,
            sequence,
            xref,
            exon_offsets,
            span,
        })
    }

    pub fn accession(&self) -> &str {
        &self.accession
    }

    pub fn gene_symbol(&self) -> &str {
        &self.gene_symbol
    }

    pub fn contig(&self) -> &str {
        &self.contig
    }

    pub fn strand(&self) -> Strand {
        self.strand
    }

    /// Exons in increasing genomic order
    pub fn exons(&self) -> &[Exon] {
        &self.exons
    }

    /// 0-based CDS start in transcript coordinates
    pub fn cds_start(&self) -> u64 {
        self.cds_start
    }

    /// Exclusive CDS end in transcript coordinates (includes the stop codon)
    pub fn cds_end(&self) -> u64 {
        self.cds_end
    }

    /// Spliced transcript sequence, 5'→3'
    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    pub fn xref(&self) -> Option<&str> {
        self.xref.as_deref()
    }

    pub fn is_coding(&self) -> bool {
        self.cds_end > self.cds_start
    }

    /// Transcript length (sum of exon lengths)
    pub fn len(&self) -> u64 {
        self.sequence.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Forward cumulative offsets of each exon's first base
    pub(crate) fn exon_offsets(&self) -> &[u64] {
        &self.exon_offsets
    }

    /// Genomic span from the first exon start to the last exon end
    pub fn span(&self) -> &GenomeInterval {
        &self.span
    }

    /// Introns as genomic `(start, end)` half-open pairs, in genomic order
    pub fn introns(&self) -> Vec<(u64, u64)> {
        self.exons
            .windows(2)
            .filter(|pair| pair[1].start > pair[0].end)
            .map(|pair| (pair[0].end, pair[1].start))
            .collect()
    }

    /// Transcript sequence slice `[start, end)`, if in range
    pub fn subsequence(&self, start: u64, end: u64) -> Option<&str> {
        self.sequence.get(start as usize..end as usize)
    }
}

impl TryFrom<TranscriptRecord> for TranscriptModel {
    type Error = AnnotateError;

    fn try_from(record: TranscriptRecord) -> Result<Self, Self::Error> {
        Self::from_record(record)
    }
}

impl From<TranscriptModel> for TranscriptRecord {
    fn from(model: TranscriptModel) -> Self {
        TranscriptRecord {
            accession: model.accession,
            gene_symbol: model.gene_symbol,
            contig: model.contig,
            strand: model.strand,
            exons: model.exons,
            cds_start: model.cds_start,
            cds_end: model.cds_end,
            sequence: model.sequence,
            xref: model.xref,
        }
    }
}

/// Builder for [`TranscriptModel`]
#[derive(Debug, Clone)]
pub struct TranscriptModelBuilder {
    record: TranscriptRecord,
}

impl TranscriptModelBuilder {
    pub fn new(accession: impl Into<String>) -> Self {
        Self {
            record: TranscriptRecord {
                accession: accession.into(),
                gene_symbol: String::new(),
                contig: String::new(),
                strand: Strand::Plus,
                exons: Vec::new(),
                cds_start: 0,
                cds_end: 0,
                sequence: String::new(),
                xref: None,
            },
        }
    }

    pub fn gene_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.record.gene_symbol = symbol.into();
        self
    }

    pub fn contig(mut self, contig: impl Into<String>) -> Self {
        self.record.contig = contig.into();
        self
    }

    pub fn strand(mut self, strand: Strand) -> Self {
        self.record.strand = strand;
        self
    }

    /// Add an exon (0-based, half-open genomic)
    pub fn exon(mut self, start: u64, end: u64) -> Self {
        self.record.exons.push(Exon::new(start, end));
        self
    }

    /// Set the CDS (0-based, half-open transcript offsets)
    pub fn cds(mut self, start: u64, end: u64) -> Self {
        self.record.cds_start = start;
        self.record.cds_end = end;
        self
    }

    pub fn sequence(mut self, sequence: impl Into<String>) -> Self {
        self.record.sequence = sequence.into();
        self
    }

    pub fn xref(mut self, xref: impl Into<String>) -> Self {
        self.record.xref = Some(xref.into());
        self
    }

    /// Validate and build
    pub fn build(self) -> Result<TranscriptModel, AnnotateError> {
        TranscriptModel::from_record(self.record)
    }
}
