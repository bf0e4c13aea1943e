//! Parallel processing support for ferro-txmap
//!
//! Parallel variants of batch annotation and allele matching using rayon.
//! Enable with the `parallel` feature. The transcript index and reference
//! provider are only read, so one instance serves every worker.
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(feature = "parallel")]
//! # fn main() {
//! use ferro_txmap::batch::BatchProcessor;
//! use ferro_txmap::change::GenomeChange;
//! use ferro_txmap::coords::GenomePosition;
//! use ferro_txmap::index::TranscriptIndexBuilder;
//! use ferro_txmap::parallel::{process_parallel_with_config, ParallelConfig};
//! use ferro_txmap::MockProvider;
//!
//! let provider = MockProvider::with_test_data();
//! let index = provider.transcripts().cloned().collect::<TranscriptIndexBuilder>().build();
//! let processor = BatchProcessor::new(&index);
//!
//! let changes: Vec<GenomeChange> = (6640063..6640163)
//!     .map(|p| GenomeChange::new(GenomePosition::forward_one_based("chr1", 249_250_621, p), "A", "G"))
//!     .collect();
//!
//! let config = ParallelConfig::new().with_chunk_size(16).with_num_threads(4);
//! let (_results, stats) = process_parallel_with_config(&processor, &changes, &config).unwrap();
//! println!("{:.1}% annotated", stats.success_rate());
//! # }
//! # #[cfg(not(feature = "parallel"))]
//! # fn main() {}
//! ```

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::batch::{BatchProcessor, BatchStats, ItemResult, TranscriptHit};
use crate::change::GenomeChange;
use crate::equivalence::{AlleleMatch, AlleleMatcher, VariantRecord};
use crate::error::TxMapError;
use crate::reference::ReferenceProvider;

/// Annotate multiple changes in parallel
///
/// Returns one result per input change. Order is preserved.
pub fn process_parallel(
    processor: &BatchProcessor<'_>,
    changes: &[GenomeChange],
) -> Vec<ItemResult<Vec<TranscriptHit>>> {
    changes
        .par_iter()
        .map(|change| processor.annotate_item(change))
        .collect()
}

/// Annotate multiple changes in parallel, keeping only successes
pub fn process_parallel_ok(
    processor: &BatchProcessor<'_>,
    changes: &[GenomeChange],
) -> Vec<Vec<TranscriptHit>> {
    changes
        .par_iter()
        .filter_map(|change| processor.annotate(change).ok())
        .collect()
}

/// Annotate in chunks on a configured pool, returning results and counts
///
/// With `num_threads == 0` the global rayon pool is used. Every record is
/// processed regardless of `continue_on_error`; failures are only counted.
pub fn process_parallel_with_config(
    processor: &BatchProcessor<'_>,
    changes: &[GenomeChange],
    config: &ParallelConfig,
) -> Result<(Vec<ItemResult<Vec<TranscriptHit>>>, BatchStats), TxMapError> {
    let chunk_size = config.chunk_size.max(1);
    let run = || -> Vec<ItemResult<Vec<TranscriptHit>>> {
        changes
            .par_chunks(chunk_size)
            .flat_map_iter(|chunk| chunk.iter().map(|change| processor.annotate_item(change)))
            .collect()
    };

    let results = if config.num_threads > 0 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.num_threads)
            .build()
            .map_err(|e| TxMapError::Config {
                msg: format!("failed to build thread pool: {}", e),
            })?;
        pool.install(run)
    } else {
        run()
    };

    let stats = BatchStats::from_results(&results);
    if stats.invariant_violations > 0 {
        log::error!(
            "{} of {} records hit an internal invariant violation",
            stats.invariant_violations,
            stats.total
        );
    }
    log::info!(
        "annotated {} records: {} ok, {} failed",
        stats.total,
        stats.success,
        stats.errors
    );
    Ok((results, stats))
}

/// Match many (observed, database) record pairs in parallel
///
/// Order is preserved.
pub fn match_alleles_parallel<P: ReferenceProvider + Sync>(
    matcher: &AlleleMatcher<P>,
    pairs: &[(VariantRecord, VariantRecord)],
) -> Vec<Result<Vec<AlleleMatch>, TxMapError>> {
    pairs
        .par_iter()
        .map(|(observed, database)| matcher.match_alleles(observed, database))
        .collect()
}

/// Configuration for parallel batch processing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParallelConfig {
    /// Chunk size for parallel processing
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
    /// Create a new parallel configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the chunk size for batched processing
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }

    /// Set the number of threads
    pub fn with_num_threads(mut self, threads: usize) -> Self {
        self.num_threads = threads;
        self
    }
}
