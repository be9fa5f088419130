//! Transcript file and configuration file loading

mod common;

use common::{myh7_record, write_transcripts_json, MYH7};
use ferro_annotate::{
    AnnotateConfig, AnnotateError, Annotator, ErrorCode, ErrorMode, GenomeBuild, RawVariant,
    ShuffleDirection, TranscriptDb, TranscriptIndex, VariantEffect,
};
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_load_transcripts_from_json_file() {
    let file = write_transcripts_json(&[myh7_record()]);
    let mut db = TranscriptDb::new();
    db.load_json_path(file.path()).unwrap();

    assert_eq!(db.len(), 1);
    let tx = db.transcript(MYH7).unwrap();
    assert_eq!(tx.gene_symbol(), "MYH7");
    assert_eq!(tx.exons().len(), 11);
    assert_eq!(tx.len(), 5968);
    assert_eq!(db.by_gene("MYH7").len(), 1);

    let annotator = Annotator::new(&db, AnnotateConfig::default());
    let result = annotator
        .annotate_all(&RawVariant::new("14", 23896042, "C", "T"))
        .unwrap();
    let a = result.annotations.highest().unwrap();
    assert_eq!(a.protein_change.as_deref(), Some("p.(Arg663His)"));
}

#[test]
fn test_round_trip_through_json_keeps_model() {
    let model = common::myh7();
    let json = serde_json::to_string(&model).unwrap();
    let db = TranscriptDb::from_json_str(&format!("[{}]", json)).unwrap();
    assert_eq!(db.transcript(MYH7).unwrap(), &model);
}

#[test]
fn test_invalid_model_aborts_load() {
    let mut bad = myh7_record();
    bad.cds_end = 6000;
    let file = write_transcripts_json(&[myh7_record(), bad]);

    let mut db = TranscriptDb::new();
    let err = db.load_json_path(file.path()).unwrap_err();
    assert!(err.is_fatal());
    assert_eq!(err.code(), ErrorCode::InvalidTranscriptModel);
}

#[test]
fn test_duplicate_accession_rejected() {
    let file = write_transcripts_json(&[myh7_record(), myh7_record()]);
    let err = TranscriptDb::new().load_json_path(file.path()).unwrap_err();
    assert!(matches!(err, AnnotateError::Configuration { .. }));
}

#[test]
fn test_missing_file_and_bad_json() {
    let err = TranscriptDb::new()
        .load_json_path("/nonexistent/transcripts.json")
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::IoError);

    let err = TranscriptDb::from_json_str("{not json").unwrap_err();
    assert_eq!(err.code(), ErrorCode::JsonError);
}

#[test]
fn test_unknown_accession() {
    let db = common::db();
    let err = db.transcript("NM_999999.1").unwrap_err();
    assert_eq!(err.code(), ErrorCode::TranscriptNotFound);
}

#[test]
fn test_overlap_queries() {
    let db = common::db();
    // inside MYH7 exon 7
    let hits = db.overlapping("14", 23896041, 23896042);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].accession(), MYH7);
    // before the transcript start
    assert!(db.overlapping("14", 23882000, 23882001).is_empty());
    // another contig
    assert!(db.overlapping("2", 23896041, 23896042).is_empty());
}

#[test]
fn test_config_file_drives_annotation() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[annotate]
splice_window = 5
shuffle_direction = "five_prime"
error_mode = "strict"
genome_build = "GRCh38"
"#
    )
    .unwrap();

    let config = AnnotateConfig::load_from_path(file.path()).unwrap();
    assert_eq!(config.splice_window, 5);
    assert_eq!(config.shuffle_direction, ShuffleDirection::FivePrime);
    assert_eq!(config.error_mode, ErrorMode::Strict);
    assert_eq!(config.genome_build, GenomeBuild::GRCh38);

    let annotator = common::annotator(config);
    let result = annotator
        .annotate_all(&RawVariant::new("1", 1013, "G", "A"))
        .unwrap();
    assert_eq!(
        result.annotations.highest().unwrap().effect,
        VariantEffect::SpliceDonor
    );
}

#[test]
fn test_config_file_rejects_unknown_keys() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[annotate]\nsplice_windw = 5").unwrap();
    let err = AnnotateConfig::load_from_path(file.path()).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidConfig);
}
