//! Batch annotation of genome changes.
//!
//! A [`BatchProcessor`] runs every change through the overlap index, projects
//! it onto each overlapping transcript and normalizes it there. Failures are
//! isolated per record and counted in [`BatchStats`].
//!
//! # Examples
//!
//! ```
//! use ferro_txmap::batch::BatchProcessor;
//! use ferro_txmap::change::GenomeChange;
//! use ferro_txmap::coords::GenomePosition;
//! use ferro_txmap::index::TranscriptIndexBuilder;
//! use ferro_txmap::reference::mock::{zbtb48, HG19_CHR1_LENGTH};
//!
//! let mut builder = TranscriptIndexBuilder::new();
//! builder.add(zbtb48().unwrap());
//! let index = builder.build();
//! let processor = BatchProcessor::new(&index);
//!
//! let changes = vec![GenomeChange::new(
//!     GenomePosition::forward_one_based("chr1", HG19_CHR1_LENGTH, 6640063),
//!     "G",
//!     "A",
//! )];
//!
//! let result = processor.process_with_progress(&changes, |progress| {
//!     println!("Progress: {:.1}%", progress.percent());
//! });
//! assert_eq!(result.success_count(), 1);
//! ```

mod processor;

pub use processor::{
    BatchConfig, BatchProcessor, BatchProgress, BatchResult, BatchStats, ItemResult, TranscriptHit,
};
