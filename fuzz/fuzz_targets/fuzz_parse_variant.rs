//! Fuzz target for variant input parsing and normalization
//!
//! Any line must either parse and normalize or fail with an error, never panic.

#![no_main]

use ferro_annotate::{GenomeBuild, Normalizer, RawVariant, ReferenceDictionary};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(line) = std::str::from_utf8(data) {
        if let Ok(raw) = RawVariant::parse_line(line) {
            let normalizer = Normalizer::new(ReferenceDictionary::for_build(GenomeBuild::GRCh38));
            if let Ok(normalized) = normalizer.normalize(&raw) {
                // normalizing a normalized variant is a no-op
                let again = normalizer.normalize(&normalized.to_raw());
                assert_eq!(again.as_ref(), Ok(&normalized));
            }
        }
    }
});
