//! Sequential driver plus the per-record result and progress types.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::change::GenomeChange;
use crate::convert::mapper::TranscriptProjector;
use crate::coords::{CdsPosition, Strand, TranscriptPosition};
use crate::error::TxMapError;
use crate::index::TranscriptIndex;
use crate::normalize::normalize_genome_change;

/// Error policy and reporting cadence for a batch run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Keep going after a record fails. When false the run ends at the
    /// first failure, which is still included in the results.
    pub continue_on_error: bool,
    /// Records between two progress reports
    pub progress_interval: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            continue_on_error: true,
            progress_interval: 100,
        }
    }
}

impl BatchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn continue_on_error(mut self, continue_on_error: bool) -> Self {
        self.continue_on_error = continue_on_error;
        self
    }

    /// Report every `interval` records; zero is treated as one
    pub fn progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval.max(1);
        self
    }
}

/// Snapshot handed to the progress callback
#[derive(Debug, Clone)]
pub struct BatchProgress {
    pub total: usize,
    pub processed: usize,
    pub success: usize,
    pub errors: usize,
    pub elapsed: Duration,
}

impl BatchProgress {
    /// Share of records processed, 100 for an empty batch
    pub fn percent(&self) -> f64 {
        match self.total {
            0 => 100.0,
            total => self.processed as f64 * 100.0 / total as f64,
        }
    }
}

/// Outcome for one record of a batch
#[derive(Debug, Clone)]
pub enum ItemResult<T> {
    Ok(T),
    /// The record failed; `change` is its display form for reporting
    Err { change: String, error: TxMapError },
}

impl<T> ItemResult<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, ItemResult::Ok(_))
    }

    pub fn is_err(&self) -> bool {
        !self.is_ok()
    }

    /// Consume into the hits, dropping a failure
    pub fn ok(self) -> Option<T> {
        match self {
            ItemResult::Ok(value) => Some(value),
            ItemResult::Err { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&TxMapError> {
        match self {
            ItemResult::Err { error, .. } => Some(error),
            ItemResult::Ok(_) => None,
        }
    }
}

/// Success/failure counts over a set of item results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchStats {
    pub total: usize,
    pub success: usize,
    pub errors: usize,
    /// Failures caused by internal defects rather than input data
    pub invariant_violations: usize,
}

impl BatchStats {
    pub fn from_results<T>(results: &[ItemResult<T>]) -> Self {
        results.iter().fold(Self::default(), |mut stats, result| {
            stats.total += 1;
            match result.error() {
                None => stats.success += 1,
                Some(error) => {
                    stats.errors += 1;
                    if error.is_invariant_violation() {
                        stats.invariant_violations += 1;
                    }
                }
            }
            stats
        })
    }

    /// Percentage of records that succeeded
    pub fn success_rate(&self) -> f64 {
        match self.total {
            0 => 100.0,
            total => self.success as f64 * 100.0 / total as f64,
        }
    }
}

/// Item results in input order, plus the wall time of the run
#[derive(Debug)]
pub struct BatchResult<T> {
    pub results: Vec<ItemResult<T>>,
    pub duration: Duration,
}

impl<T> BatchResult<T> {
    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn success_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_ok()).count()
    }

    pub fn error_count(&self) -> usize {
        self.total() - self.success_count()
    }

    pub fn stats(&self) -> BatchStats {
        BatchStats::from_results(&self.results)
    }

    pub fn all_ok(&self) -> bool {
        self.results.iter().all(ItemResult::is_ok)
    }

    /// Failed records as (change, error) pairs, in input order
    pub fn failures(&self) -> impl Iterator<Item = (&str, &TxMapError)> {
        self.results.iter().filter_map(|r| match r {
            ItemResult::Err { change, error } => Some((change.as_str(), error)),
            ItemResult::Ok(_) => None,
        })
    }
}

/// One transcript touched by a change
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptHit {
    pub accession: String,
    pub gene_symbol: Option<String>,
    /// Transcript position of the change start; `None` when it is intronic
    pub tx_pos: Option<TranscriptPosition>,
    /// CDS position of the change start, when it is coding
    pub cds_pos: Option<CdsPosition>,
    /// 3'-normalized change on the transcript strand; `None` without
    /// transcript sequence or for intronic changes
    pub normalized: Option<GenomeChange>,
}

/// Runs index lookup, projection and normalization over many changes
///
/// Borrows a frozen [`TranscriptIndex`]; the processor itself holds no
/// mutable state and can be shared between threads.
pub struct BatchProcessor<'a> {
    index: &'a TranscriptIndex,
    config: BatchConfig,
}

impl<'a> BatchProcessor<'a> {
    pub fn new(index: &'a TranscriptIndex) -> Self {
        Self::with_config(index, BatchConfig::default())
    }

    pub fn with_config(index: &'a TranscriptIndex, config: BatchConfig) -> Self {
        Self { index, config }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    pub fn index(&self) -> &'a TranscriptIndex {
        self.index
    }

    /// Project and normalize one change against every overlapping transcript
    pub fn annotate(&self, change: &GenomeChange) -> Result<Vec<TranscriptHit>, TxMapError> {
        let forward = change.with_strand(Strand::Forward);
        let begin = u64::try_from(forward.pos.zero_based_pos()).map_err(|_| {
            TxMapError::out_of_range(format!("{} starts before the contig", change))
        })?;
        let end = begin + (forward.reference.len() as u64).max(1);

        self.index
            .overlapping_interval(&forward.pos.contig, begin, end)
            .iter()
            .map(|model| {
                let projector = TranscriptProjector::new(model);
                let stranded = change.with_strand(model.strand);
                let tx_pos = match projector.genome_to_transcript_pos(&stranded.pos) {
                    Ok(tx_pos) => Some(tx_pos),
                    Err(TxMapError::NotInExon { .. }) => None,
                    Err(err) => return Err(err),
                };
                let cds_pos = projector.genome_to_cds_pos(&stranded.pos).ok();
                let normalized = match &tx_pos {
                    Some(tx_pos) if model.has_sequence() => {
                        Some(normalize_genome_change(model, &stranded, tx_pos)?)
                    }
                    _ => None,
                };
                Ok(TranscriptHit {
                    accession: model.accession.clone(),
                    gene_symbol: model.gene_symbol.clone(),
                    tx_pos,
                    cds_pos,
                    normalized,
                })
            })
            .collect()
    }

    /// Annotate a single change, wrapping failures into an item result
    pub fn annotate_item(&self, change: &GenomeChange) -> ItemResult<Vec<TranscriptHit>> {
        match self.annotate(change) {
            Ok(hits) => ItemResult::Ok(hits),
            Err(error) => {
                log::warn!("failed to annotate {}: {}", change, error);
                ItemResult::Err {
                    change: change.to_string(),
                    error,
                }
            }
        }
    }

    /// Annotate every change in order
    pub fn process(&self, changes: &[GenomeChange]) -> BatchResult<Vec<TranscriptHit>> {
        self.process_with_progress(changes, |_| {})
    }

    /// Like [`process`](Self::process), calling `progress_fn` every
    /// `progress_interval` records, after the last record, and when the run
    /// stops on an error.
    pub fn process_with_progress<F>(
        &self,
        changes: &[GenomeChange],
        mut progress_fn: F,
    ) -> BatchResult<Vec<TranscriptHit>>
    where
        F: FnMut(BatchProgress),
    {
        let start = Instant::now();
        let total = changes.len();
        let interval = self.config.progress_interval.max(1);
        let mut results = Vec::with_capacity(total);
        let mut success = 0;
        let mut errors = 0;

        for (i, change) in changes.iter().enumerate() {
            let result = self.annotate_item(change);
            let failed = result.is_err();
            if failed {
                errors += 1;
            } else {
                success += 1;
            }
            results.push(result);

            if (i + 1) % interval == 0 || i + 1 == total || failed && !self.config.continue_on_error {
                progress_fn(BatchProgress {
                    total,
                    processed: i + 1,
                    success,
                    errors,
                    elapsed: start.elapsed(),
                });
            }
            if failed && !self.config.continue_on_error {
                break;
            }
        }

        BatchResult {
            results,
            duration: start.elapsed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{GenomePosition, PositionType};
    use crate::index::TranscriptIndexBuilder;
    use crate::reference::TranscriptModelBuilder;

    // Forward transcript: exons [100,110) and [200,210), sequence CAGCAGCAGT + AAAAAAAAAA
    fn index() -> TranscriptIndex {
        let tx = TranscriptModelBuilder::new("tx1", "chrT", 1_000, Strand::Forward)
            .gene_symbol("GENE")
            .exon(100, 110)
            .exon(200, 210)
            .cds_tx(0, 20)
            .sequence("CAGCAGCAGTAAAAAAAAAA")
            .build()
            .unwrap();
        let mut builder = TranscriptIndexBuilder::new();
        builder.add(tx);
        builder.build()
    }

    fn change(zero_based: i64, reference: &str, alt: &str) -> GenomeChange {
        let pos = GenomePosition::new("chrT", 1_000, Strand::Forward, zero_based, PositionType::ZeroBased);
        GenomeChange::new(pos, reference, alt)
    }

    #[test]
    fn test_annotate_exonic_deletion() {
        let index = index();
        let processor = BatchProcessor::new(&index);
        let hits = processor.annotate(&change(100, "CAG", "")).unwrap();
        assert_eq!(hits.len(), 1);
        let hit = &hits[0];
        assert_eq!(hit.gene_symbol.as_deref(), Some("GENE"));
        assert_eq!(hit.tx_pos.as_ref().map(|p| p.pos), Some(0));
        assert_eq!(hit.cds_pos.as_ref().map(|p| p.pos), Some(0));
        let normalized = hit.normalized.as_ref().unwrap();
        assert_eq!(normalized.pos.zero_based_pos(), 106);
    }

    #[test]
    fn test_annotate_intronic_change() {
        let index = index();
        let processor = BatchProcessor::new(&index);
        let hits = processor.annotate(&change(150, "A", "G")).unwrap();
        assert_eq!(hits.len(), 1);
        assert!(hits[0].tx_pos.is_none());
        assert!(hits[0].normalized.is_none());
    }

    #[test]
    fn test_annotate_outside_every_transcript() {
        let index = index();
        let processor = BatchProcessor::new(&index);
        assert!(processor.annotate(&change(500, "A", "G")).unwrap().is_empty());
    }

    #[test]
    fn test_failure_isolated_per_record() {
        let index = index();
        let processor = BatchProcessor::new(&index);
        // Inserting A before the last transcript base rotates off the end
        let changes = vec![
            change(209, "", "A"),
            change(100, "C", "T"),
        ];
        let result = processor.process(&changes);
        assert_eq!(result.total(), 2);
        let stats = result.stats();
        assert_eq!(stats.errors, 1);
        assert_eq!(stats.invariant_violations, 1);
        assert_eq!(stats.success, 1);
    }

    #[test]
    fn test_stop_on_first_error() {
        let index = index();
        let config = BatchConfig::new().continue_on_error(false);
        let processor = BatchProcessor::with_config(&index, config);
        let changes = vec![change(209, "", "A"), change(100, "C", "T")];
        let mut calls = 0;
        let result = processor.process_with_progress(&changes, |_| calls += 1);
        assert_eq!(result.total(), 1);
        assert!(!result.all_ok());
        assert_eq!(calls, 1);
        let failures: Vec<_> = result.failures().collect();
        assert_eq!(failures.len(), 1);
        assert!(failures[0].1.is_invariant_violation());
    }

    #[test]
    fn test_progress_percent() {
        let progress = BatchProgress {
            total: 4,
            processed: 1,
            success: 1,
            errors: 0,
            elapsed: Duration::from_millis(1),
        };
        assert_eq!(progress.percent(), 25.0);
    }
}
