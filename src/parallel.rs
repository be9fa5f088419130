//! Parallel batch annotation using rayon
//!
//! Transcript models are only read during annotation, so one [`Annotator`]
//! is shared by reference across worker threads. Enable with the `parallel`
//! feature.
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(feature = "parallel")]
//! # fn main() -> Result<(), ferro_annotate::AnnotateError> {
//! use ferro_annotate::parallel::annotate_batch_parallel;
//! use ferro_annotate::{AnnotateConfig, Annotator, RawVariant, TranscriptDb};
//!
//! let db = TranscriptDb::from_json_str(&std::fs::read_to_string("transcripts.json")?)?;
//! let annotator = Annotator::new(&db, AnnotateConfig::default());
//!
//! let variants = vec![
//!     RawVariant::new("14", 23896042, "C", "T"),
//!     RawVariant::new("14", 23886380, "C", "A"),
//! ];
//! let (outcomes, stats) = annotate_batch_parallel(&annotator, &variants, None);
//! println!("{}/{} annotated", stats.annotated, stats.total);
//! # let _ = outcomes;
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "parallel"))]
//! # fn main() {}
//! ```

use std::sync::atomic::AtomicBool;

use rayon::prelude::*;

use crate::annotator::{is_cancelled, Annotator, BatchOutcome, BatchStats};
use crate::error::AnnotateError;
use crate::reference::TranscriptIndex;
use crate::variant::RawVariant;

/// Configuration for parallel batch processing
#[derive(Debug, Clone)]
pub struct ParallelConfig {
    /// Variants handed to a worker at a time
    pub chunk_size: usize,
    /// Number of threads (0 = use rayon default)
    pub num_threads: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            num_threads: 0,
        }
    }
}

impl ParallelConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }

    pub fn with_num_threads(mut self, threads: usize) -> Self {
        self.num_threads = threads;
        self
    }
}

fn outcome<I: TranscriptIndex>(
    annotator: &Annotator<I>,
    raw: &RawVariant,
    cancel: Option<&AtomicBool>,
) -> BatchOutcome {
    if is_cancelled(cancel) {
        BatchOutcome::Cancelled { input: raw.clone() }
    } else {
        annotator.outcome(raw)
    }
}

/// Annotate a batch on the global rayon pool
///
/// Outcomes are returned in input order. `cancel` is checked before each
/// variant starts; variants already being annotated run to completion.
pub fn annotate_batch_parallel<I: TranscriptIndex + Sync>(
    annotator: &Annotator<I>,
    variants: &[RawVariant],
    cancel: Option<&AtomicBool>,
) -> (Vec<BatchOutcome>, BatchStats) {
    let outcomes: Vec<BatchOutcome> = variants
        .par_iter()
        .map(|raw| outcome(annotator, raw, cancel))
        .collect();
    let stats = BatchStats::from_outcomes(&outcomes);
    log::info!(
        "Annotated {}/{} variants in parallel ({} failed, {} cancelled)",
        stats.annotated,
        stats.total,
        stats.failed,
        stats.cancelled
    );
    (outcomes, stats)
}

/// Annotate a batch in chunks, on a dedicated pool when `num_threads` is set
pub fn annotate_batch_with_config<I: TranscriptIndex + Sync>(
    annotator: &Annotator<I>,
    variants: &[RawVariant],
    config: &ParallelConfig,
    cancel: Option<&AtomicBool>,
) -> Result<(Vec<BatchOutcome>, BatchStats), AnnotateError> {
    let chunk_size = config.chunk_size.max(1);
    let run = || {
        let outcomes: Vec<BatchOutcome> = variants
            .par_chunks(chunk_size)
            .flat_map_iter(|chunk| chunk.iter().map(|raw| outcome(annotator, raw, cancel)))
            .collect();
        let stats = BatchStats::from_outcomes(&outcomes);
        (outcomes, stats)
    };

    if config.num_threads == 0 {
        return Ok(run());
    }
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.num_threads)
        .build()
        .map_err(|e| AnnotateError::Config {
            msg: format!("Failed to build thread pool: {}", e),
        })?;
    Ok(pool.install(run))
}
