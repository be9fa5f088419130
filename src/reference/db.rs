//! Transcript database: the immutable context shared by every annotation call
//!
//! Transcripts are loaded and validated once, then only read. Overlap queries
//! go through the [`TranscriptIndex`] trait so callers can plug in their own
//! interval index.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;

use crate::error::AnnotateError;
use crate::reference::dict::ReferenceDictionary;
use crate::reference::transcript::{TranscriptModel, TranscriptRecord};

/// Candidate selection: which transcripts overlap a genomic interval
pub trait TranscriptIndex {
    /// Transcripts on `contig` whose span overlaps `[start, end)`.
    ///
    /// An empty interval (insertion point) overlaps a span only when it falls
    /// strictly inside it.
    fn overlapping(&self, contig: &str, start: u64, end: u64) -> Vec<&TranscriptModel>;

    /// Look up a transcript by accession
    fn get(&self, accession: &str) -> Option<&TranscriptModel>;
}

impl<T: TranscriptIndex + ?Sized> TranscriptIndex for &T {
    fn overlapping(&self, contig: &str, start: u64, end: u64) -> Vec<&TranscriptModel> {
        (**self).overlapping(contig, start, end)
    }

    fn get(&self, accession: &str) -> Option<&TranscriptModel> {
        (**self).get(accession)
    }
}

impl<T: TranscriptIndex + ?Sized> TranscriptIndex for Arc<T> {
    fn overlapping(&self, contig: &str, start: u64, end: u64) -> Vec<&TranscriptModel> {
        (**self).overlapping(contig, start, end)
    }

    fn get(&self, accession: &str) -> Option<&TranscriptModel> {
        (**self).get(accession)
    }
}

/// In-memory transcript database
#[derive(Debug, Clone, Default)]
pub struct TranscriptDb {
    /// Transcripts in load order
    transcripts: Vec<TranscriptModel>,
    /// Accession -> position in `transcripts`
    by_accession: HashMap<String, usize>,
    /// Gene symbol -> positions in `transcripts`
    gene_index: HashMap<String, Vec<usize>>,
    /// Canonical contig -> (span start, span end, position), sorted by start
    region_index: HashMap<String, Vec<(u64, u64, usize)>>,
    /// Used to canonicalize contig names, if set
    dictionary: Option<ReferenceDictionary>,
}

impl TranscriptDb {
    /// Create a new empty transcript database
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty database that indexes contigs by their canonical name
    pub fn with_dictionary(dictionary: ReferenceDictionary) -> Self {
        Self {
            dictionary: Some(dictionary),
            ..Self::default()
        }
    }

    fn canonical<'a>(&'a self, contig: &'a str) -> &'a str {
        self.dictionary
            .as_ref()
            .and_then(|d| d.resolve(contig))
            .unwrap_or(contig)
    }

    /// Add a validated transcript
    ///
    /// A second transcript with an existing accession is a configuration error.
    pub fn add(&mut self, transcript: TranscriptModel) -> Result<(), AnnotateError> {
        if self.by_accession.contains_key(transcript.accession()) {
            return Err(AnnotateError::configuration(
                transcript.accession(),
                "duplicate accession",
            ));
        }
        let idx = self.transcripts.len();
        let contig = self.canonical(transcript.contig()).to_string();
        let span = transcript.span();

        self.by_accession
            .insert(transcript.accession().to_string(), idx);
        if !transcript.gene_symbol().is_empty() {
            self.gene_index
                .entry(transcript.gene_symbol().to_string())
                .or_default()
                .push(idx);
        }
        let regions = self.region_index.entry(contig).or_default();
        let at = regions.partition_point(|&(s, _, _)| s <= span.start().value());
        regions.insert(at, (span.start().value(), span.end().value(), idx));

        self.transcripts.push(transcript);
        Ok(())
    }

    /// Validate and add every record; the first invalid record aborts the load
    pub fn extend_records(
        &mut self,
        records: impl IntoIterator<Item = TranscriptRecord>,
    ) -> Result<(), AnnotateError> {
        for record in records {
            self.add(TranscriptModel::from_record(record)?)?;
        }
        Ok(())
    }

    /// Parse a JSON array of transcript records
    pub fn from_json_str(json: &str) -> Result<Self, AnnotateError> {
        let mut db = Self::new();
        db.load_json_str(json)?;
        Ok(db)
    }

    /// Parse a JSON array of transcript records into this database
    pub fn load_json_str(&mut self, json: &str) -> Result<(), AnnotateError> {
        let records: Vec<TranscriptRecord> = serde_json::from_str(json)?;
        self.extend_records(records)
    }

    /// Read a JSON array of transcript records
    pub fn load_json_reader<R: Read>(&mut self, reader: R) -> Result<(), AnnotateError> {
        let records: Vec<TranscriptRecord> = serde_json::from_reader(reader)?;
        self.extend_records(records)
    }

    /// Load a JSON transcript file into this database
    pub fn load_json_path<P: AsRef<Path>>(&mut self, path: P) -> Result<(), AnnotateError> {
        let file = File::open(path.as_ref()).map_err(|e| AnnotateError::Io {
            msg: format!(
                "Failed to open transcript file {}: {}",
                path.as_ref().display(),
                e
            ),
        })?;
        self.load_json_reader(BufReader::new(file))?;
        log::info!(
            "Loaded {} transcripts from {}",
            self.len(),
            path.as_ref().display()
        );
        Ok(())
    }

    /// Look up a transcript, failing with `TranscriptNotFound`
    pub fn transcript(&self, accession: &str) -> Result<&TranscriptModel, AnnotateError> {
        self.get(accession)
            .ok_or_else(|| AnnotateError::TranscriptNotFound {
                accession: accession.to_string(),
            })
    }

    /// Transcripts of a gene, in load order
    pub fn by_gene(&self, gene_symbol: &str) -> Vec<&TranscriptModel> {
        self.gene_index
            .get(gene_symbol)
            .map(|ids| ids.iter().map(|&i| &self.transcripts[i]).collect())
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TranscriptModel> {
        self.transcripts.iter()
    }

    pub fn len(&self) -> usize {
        self.transcripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transcripts.is_empty()
    }
}

impl TranscriptIndex for TranscriptDb {
    fn overlapping(&self, contig: &str, start: u64, end: u64) -> Vec<&TranscriptModel> {
        let Some(regions) = self.region_index.get(self.canonical(contig)) else {
            return Vec::new();
        };
        regions
            .iter()
            .take_while(|&&(s, _, _)| s <= end)
            .filter(|&&(s, e, _)| {
                if start == end {
                    s < start && start < e
                } else {
                    s < end && start < e
                }
            })
            .map(|&(_, _, i)| &self.transcripts[i])
            .collect()
    }

    fn get(&self, accession: &str) -> Option<&TranscriptModel> {
        self.by_accession
            .get(accession)
            .map(|&i| &self.transcripts[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Strand;
    use crate::reference::dict::GenomeBuild;

    fn tx(accession: &str, gene: &str, contig: &str, start: u64, end: u64) -> TranscriptModel {
        TranscriptModel::builder(accession)
            .gene_symbol(gene)
            .contig(contig)
            .strand(Strand::Plus)
            .exon(start, end)
            .sequence("A".repeat((end - start) as usize))
            .build()
            .unwrap()
    }

    #[test]
    fn test_overlapping() {
        let mut db = TranscriptDb::new();
        db.add(tx("NR_1.1", "A", "1", 100, 200)).unwrap();
        db.add(tx("NR_2.1", "B", "1", 150, 300)).unwrap();
        db.add(tx("NR_3.1", "C", "2", 100, 200)).unwrap();

        let hits: Vec<_> = db
            .overlapping("1", 160, 161)
            .iter()
            .map(|t| t.accession())
            .collect();
        assert_eq!(hits, vec!["NR_1.1", "NR_2.1"]);
        assert_eq!(db.overlapping("1", 250, 251).len(), 1);
        assert!(db.overlapping("1", 300, 301).is_empty());
        assert!(db.overlapping("3", 100, 200).is_empty());
    }

    #[test]
    fn test_insertion_point_at_span_edge_is_outside() {
        let mut db = TranscriptDb::new();
        db.add(tx("NR_1.1", "A", "1", 100, 200)).unwrap();
        assert!(db.overlapping("1", 100, 100).is_empty());
        assert!(db.overlapping("1", 200, 200).is_empty());
        assert_eq!(db.overlapping("1", 101, 101).len(), 1);
    }

    #[test]
    fn test_duplicate_accession_rejected() {
        let mut db = TranscriptDb::new();
        db.add(tx("NR_1.1", "A", "1", 100, 200)).unwrap();
        let err = db.add(tx("NR_1.1", "A", "1", 100, 200)).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_lookup() {
        let mut db = TranscriptDb::new();
        db.add(tx("NR_1.1", "A", "1", 100, 200)).unwrap();
        db.add(tx("NR_2.1", "A", "1", 300, 400)).unwrap();
        assert!(db.get("NR_1.1").is_some());
        assert!(matches!(
            db.transcript("NR_9.1"),
            Err(AnnotateError::TranscriptNotFound { .. })
        ));
        assert_eq!(db.by_gene("A").len(), 2);
        assert!(db.by_gene("Z").is_empty());
    }

    #[test]
    fn test_dictionary_canonicalizes_contigs() {
        let mut db = TranscriptDb::with_dictionary(ReferenceDictionary::for_build(
            GenomeBuild::GRCh37,
        ));
        db.add(tx("NR_1.1", "A", "chr14", 100, 200)).unwrap();
        assert_eq!(db.overlapping("14", 150, 151).len(), 1);
        assert_eq!(db.overlapping("NC_000014.8", 150, 151).len(), 1);
    }

    #[test]
    fn test_json_load_rejects_invalid_model() {
        let json = r#"[{"accession":"NR_1.1","contig":"1","strand":"+",
            "exons":[{"start":10,"end":20}],"cds_start":0,"cds_end":0,
            "sequence":"ACGT"}]"#;
        let err = TranscriptDb::from_json_str(json).unwrap_err();
        assert!(matches!(err, AnnotateError::Configuration { .. }));

        let err = TranscriptDb::from_json_str("not json").unwrap_err();
        assert!(matches!(err, AnnotateError::Json { .. }));
    }

    #[test]
    fn test_index_through_reference() {
        fn count<I: TranscriptIndex>(index: I) -> usize {
            index.overlapping("1", 150, 151).len()
        }
        let mut db = TranscriptDb::new();
        db.add(tx("NR_1.1", "A", "1", 100, 200)).unwrap();
        assert_eq!(count(&db), 1);
        assert_eq!(count(Arc::new(db)), 1);
    }
}
