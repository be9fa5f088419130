//! Structured fuzz target for annotation
//!
//! Builds an arbitrary small transcript, then annotates an arbitrary variant
//! near it. Invalid transcripts are rejected at build time; every variant
//! must yield annotations or typed errors without panicking.

#![no_main]

use arbitrary::Arbitrary;
use ferro_annotate::{
    AnnotateConfig, Annotator, ErrorMode, RawVariant, ReferenceDictionary, ShuffleDirection,
    Strand, TranscriptDb, TranscriptModel,
};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Base {
    A,
    C,
    G,
    T,
}

impl Base {
    fn as_char(&self) -> char {
        match self {
            Base::A => 'A',
            Base::C => 'C',
            Base::G => 'G',
            Base::T => 'T',
        }
    }
}

#[derive(Debug, Arbitrary)]
struct Input {
    minus: bool,
    /// (intron length, exon length) pairs
    exons: Vec<(u8, u8)>,
    cds: (u16, u16),
    sequence: Vec<Base>,
    position: u16,
    reference: Vec<Base>,
    alternate: Vec<Base>,
    splice_window: u8,
    five_prime: bool,
    strict: bool,
}

fn bases(v: &[Base]) -> String {
    v.iter().map(Base::as_char).collect()
}

fuzz_target!(|input: Input| {
    let mut builder = TranscriptModel::builder("NM_FUZZ.1")
        .contig("1")
        .strand(if input.minus { Strand::Minus } else { Strand::Plus });
    let mut at = 100u64;
    for &(intron, exon) in input.exons.iter().take(8) {
        at += u64::from(intron);
        builder = builder.exon(at, at + u64::from(exon));
        at += u64::from(exon);
    }
    let Ok(transcript) = builder
        .cds(u64::from(input.cds.0), u64::from(input.cds.1))
        .sequence(bases(&input.sequence))
        .build()
    else {
        return;
    };

    let mut db = TranscriptDb::new();
    if db.add(transcript).is_err() {
        return;
    }
    let mut dictionary = ReferenceDictionary::new();
    dictionary.add_contig("1", 10_000);
    let config = AnnotateConfig::new()
        .with_splice_window(u64::from(input.splice_window % 16))
        .with_shuffle_direction(if input.five_prime {
            ShuffleDirection::FivePrime
        } else {
            ShuffleDirection::ThreePrime
        })
        .with_error_mode(if input.strict {
            ErrorMode::Strict
        } else {
            ErrorMode::Silent
        });
    let annotator = Annotator::with_dictionary(db, config, dictionary);

    let raw = RawVariant::new(
        "1",
        i64::from(input.position % 4_000),
        bases(&input.reference),
        bases(&input.alternate),
    );
    if let Ok(result) = annotator.annotate_all(&raw) {
        for annotation in result.annotations.iter() {
            let _ = annotation.transcript_change();
            let _ = annotation.effect.impact();
        }
    }
});
