//! Shared fixtures for integration tests

#![allow(dead_code)]

use ferro_annotate::reference::Exon;
use ferro_annotate::{
    AnnotateConfig, Annotator, Strand, TranscriptDb, TranscriptModel, TranscriptRecord,
};
use std::io::Write;
use tempfile::NamedTempFile;

pub const MYH7: &str = "NM_000257.2";

/// MYH7 exons as 1-based closed genomic ranges, in transcript order
const MYH7_EXONS: [(u64, u64); 11] = [
    (23902842, 23903001),
    (23901850, 23902249),
    (23900726, 23901025),
    (23899022, 23899321),
    (23898171, 23898470),
    (23897587, 23897886),
    (23895930, 23896329),
    (23893038, 23893937),
    (23890634, 23891633),
    (23885881, 23886880),
    (23882850, 23883757),
];

/// Codons (0-based index within the CDS) that differ from the `GCT` filler
const MYH7_CODONS: [(usize, &str); 14] = [
    (0, "ATG"),
    (158, "GAC"),
    (225, "GCG"),
    (354, "GCC"),
    (427, "GCC"),
    (452, "CGC"),
    (474, "CAG"),
    (662, "CGC"),
    (903, "CGC"),
    (963, "GTG"),
    (1056, "GGC"),
    (1500, "GAG"),
    (1922, "AAG"),
    (1935, "TGA"),
];

pub const MYH7_CDS_START: u64 = 60;
pub const MYH7_CDS_END: u64 = 5868;

/// Transcript sequence: 60 bases of 5' UTR, 1936 codons, 100 bases of 3' UTR
pub fn myh7_sequence() -> String {
    let mut cds: Vec<&str> = vec!["GCT"; 1936];
    for (idx, codon) in MYH7_CODONS {
        cds[idx] = codon;
    }
    let mut seq = "GCC".repeat(20);
    seq.push_str(&cds.concat());
    seq.push_str(&"TAAG".repeat(25));
    seq
}

/// Synthetic minus-strand MYH7 model on contig 14 (GRCh37 exon layout)
pub fn myh7_record() -> TranscriptRecord {
    let mut exons: Vec<_> = MYH7_EXONS
        .iter()
        .map(|&(start, end)| Exon::new(start - 1, end))
        .collect();
    exons.sort_by_key(|e| e.start);
    TranscriptRecord {
        accession: MYH7.to_string(),
        gene_symbol: "MYH7".to_string(),
        contig: "14".to_string(),
        strand: Strand::Minus,
        exons,
        cds_start: MYH7_CDS_START,
        cds_end: MYH7_CDS_END,
        sequence: myh7_sequence(),
        xref: None,
    }
}

/// 0-based genomic position of MYH7 transcript offset `t`
pub fn myh7_genomic(t: u64) -> u64 {
    let mut remaining = t;
    for &(start, end) in &MYH7_EXONS {
        let len = end - start + 1;
        if remaining < len {
            return end - 1 - remaining;
        }
        remaining -= len;
    }
    panic!("offset {} is beyond the MYH7 transcript", t);
}

/// Transcript-space bounds `[start, end)` of each MYH7 exon, in transcript order
pub fn myh7_exon_offsets() -> Vec<(u64, u64)> {
    let mut offset = 0;
    MYH7_EXONS
        .iter()
        .map(|&(start, end)| {
            let bounds = (offset, offset + end - start + 1);
            offset = bounds.1;
            bounds
        })
        .collect()
}

pub fn myh7() -> TranscriptModel {
    TranscriptModel::from_record(myh7_record()).unwrap()
}

/// Two-exon plus-strand coding transcript on contig 1:
/// exon 1 `[1000, 1010)`, exon 2 `[1100, 1110)`,
/// spliced sequence `GG ATG AAA CCC GGG TAA CCC` with the CDS at offsets 2..17.
pub fn small_plus() -> TranscriptModel {
    TranscriptModel::builder("NM_SMALL.1")
        .gene_symbol("SMALL")
        .contig("1")
        .strand(Strand::Plus)
        .exon(1000, 1010)
        .exon(1100, 1110)
        .cds(2, 17)
        .sequence("GGATGAAACCCGGGTAACCC")
        .build()
        .unwrap()
}

/// Single-exon noncoding transcript on contig 1 at `[2000, 2020)`
pub fn small_noncoding() -> TranscriptModel {
    TranscriptModel::builder("NR_SMALL.1")
        .gene_symbol("SMALLNC")
        .contig("1")
        .strand(Strand::Plus)
        .exon(2000, 2020)
        .sequence("ACGTACGTACGTACGTACGT")
        .build()
        .unwrap()
}

pub fn db() -> TranscriptDb {
    let mut db = TranscriptDb::new();
    db.add(myh7()).unwrap();
    db.add(small_plus()).unwrap();
    db.add(small_noncoding()).unwrap();
    db
}

pub fn annotator(config: AnnotateConfig) -> Annotator<TranscriptDb> {
    Annotator::new(db(), config)
}

/// Write transcript records as a JSON array to a temporary file
pub fn write_transcripts_json(records: &[TranscriptRecord]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    let json = serde_json::to_string_pretty(records).unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
