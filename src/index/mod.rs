//! Transcript overlap index
//!
//! Collect transcripts with a [`TranscriptIndexBuilder`], then freeze them into
//! a [`TranscriptIndex`] holding one interval tree per contig. The frozen
//! index is read-only and can be shared across threads behind an `Arc`.
//!
//! ```
//! use ferro_txmap::coords::{GenomePosition, Strand};
//! use ferro_txmap::index::TranscriptIndexBuilder;
//! use ferro_txmap::reference::TranscriptModelBuilder;
//!
//! let tx = TranscriptModelBuilder::new("tx1", "chr1", 1_000, Strand::Forward)
//!     .exon(100, 200)
//!     .build()
//!     .unwrap();
//! let mut builder = TranscriptIndexBuilder::new();
//! builder.add(tx);
//! let index = builder.build();
//!
//! let hits = index.overlapping_position(&GenomePosition::forward_one_based("chr1", 1_000, 150));
//! assert_eq!(hits.len(), 1);
//! ```

pub mod tree;

use std::collections::HashMap;
use std::sync::Arc;

use crate::coords::GenomePosition;
use crate::reference::transcript::TranscriptModel;
use tree::{CenteredIntervalTree, Entry};

/// Accumulates transcripts before the index is frozen
#[derive(Debug, Default)]
pub struct TranscriptIndexBuilder {
    by_contig: HashMap<String, Vec<Arc<TranscriptModel>>>,
}

impl TranscriptIndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, model: TranscriptModel) -> &mut Self {
        self.add_shared(Arc::new(model))
    }

    pub fn add_shared(&mut self, model: Arc<TranscriptModel>) -> &mut Self {
        self.by_contig
            .entry(model.contig.clone())
            .or_default()
            .push(model);
        self
    }

    /// Number of transcripts collected so far
    pub fn len(&self) -> usize {
        self.by_contig.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_contig.is_empty()
    }

    /// Freeze into an immutable index
    pub fn build(self) -> TranscriptIndex {
        let mut trees = HashMap::with_capacity(self.by_contig.len());
        let mut count = 0;
        for (contig, models) in self.by_contig {
            let tree = CenteredIntervalTree::new(models.into_iter().map(|model| Entry {
                interval: model.tx_region,
                value: model,
            }));
            count += tree.len();
            trees.insert(contig, tree);
        }
        log::debug!(
            "built transcript index: {} transcripts on {} contigs",
            count,
            trees.len()
        );
        TranscriptIndex { trees, count }
    }
}

impl Extend<TranscriptModel> for TranscriptIndexBuilder {
    fn extend<I: IntoIterator<Item = TranscriptModel>>(&mut self, iter: I) {
        for model in iter {
            self.add(model);
        }
    }
}

impl FromIterator<TranscriptModel> for TranscriptIndexBuilder {
    fn from_iter<I: IntoIterator<Item = TranscriptModel>>(iter: I) -> Self {
        let mut builder = Self::new();
        builder.extend(iter);
        builder
    }
}

/// Frozen per-contig overlap index over transcript spans
#[derive(Debug)]
pub struct TranscriptIndex {
    trees: HashMap<String, CenteredIntervalTree<Arc<TranscriptModel>>>,
    count: usize,
}

impl TranscriptIndex {
    /// Number of indexed transcripts
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn contig_count(&self) -> usize {
        self.trees.len()
    }

    /// Transcripts whose span contains `pos`
    pub fn overlapping_position(&self, pos: &GenomePosition) -> Vec<Arc<TranscriptModel>> {
        match u64::try_from(pos.forward_zero_based_pos()) {
            Ok(offset) => self.overlapping_interval(&pos.contig, offset, offset + 1),
            Err(_) => Vec::new(),
        }
    }

    /// Transcripts whose span overlaps the 0-based half-open `[begin, end)`
    ///
    /// Ordered by transcript start, then accession.
    pub fn overlapping_interval(
        &self,
        contig: &str,
        begin: u64,
        end: u64,
    ) -> Vec<Arc<TranscriptModel>> {
        let Some(tree) = self.trees.get(contig) else {
            return Vec::new();
        };
        let mut hits: Vec<Arc<TranscriptModel>> = tree
            .query(begin, end)
            .into_iter()
            .map(|entry| Arc::clone(&entry.value))
            .collect();
        hits.sort_by(|a, b| {
            a.tx_region
                .start
                .cmp(&b.tx_region.start)
                .then_with(|| a.accession.cmp(&b.accession))
        });
        hits
    }

    /// Every indexed transcript on `contig`
    pub fn transcripts_on(&self, contig: &str) -> impl Iterator<Item = &Arc<TranscriptModel>> {
        self.trees
            .get(contig)
            .into_iter()
            .flat_map(|tree| tree.iter().map(|entry| &entry.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Strand;
    use crate::reference::TranscriptModelBuilder;

    fn model(acc: &str, contig: &str, start: u64, end: u64) -> TranscriptModel {
        TranscriptModelBuilder::new(acc, contig, 10_000, Strand::Forward)
            .exon(start, end)
            .build()
            .unwrap()
    }

    fn accessions(hits: &[Arc<TranscriptModel>]) -> Vec<&str> {
        hits.iter().map(|m| m.accession.as_str()).collect()
    }

    #[test]
    fn test_index_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TranscriptIndex>();
    }

    #[test]
    fn test_contigs_are_separate() {
        let index: TranscriptIndex = [model("a", "chr1", 0, 100), model("b", "chr2", 0, 100)]
            .into_iter()
            .collect::<TranscriptIndexBuilder>()
            .build();
        assert_eq!(index.len(), 2);
        assert_eq!(index.contig_count(), 2);
        assert_eq!(accessions(&index.overlapping_interval("chr1", 10, 20)), vec!["a"]);
        assert!(index.overlapping_interval("chr3", 10, 20).is_empty());
    }

    #[test]
    fn test_results_ordered_by_start_then_accession() {
        let mut builder = TranscriptIndexBuilder::new();
        builder
            .add(model("z", "chr1", 50, 150))
            .add(model("b", "chr1", 10, 200))
            .add(model("a", "chr1", 10, 120));
        let index = builder.build();
        assert_eq!(
            accessions(&index.overlapping_interval("chr1", 100, 110)),
            vec!["a", "b", "z"]
        );
    }

    #[test]
    fn test_position_query_uses_forward_offset() {
        let mut builder = TranscriptIndexBuilder::new();
        builder.add(model("a", "chr1", 100, 200));
        let index = builder.build();

        let inside = GenomePosition::forward_one_based("chr1", 10_000, 101);
        assert_eq!(index.overlapping_position(&inside).len(), 1);
        let outside = GenomePosition::forward_one_based("chr1", 10_000, 100);
        assert!(index.overlapping_position(&outside).is_empty());
        let reverse = inside.with_strand(Strand::Reverse);
        assert_eq!(index.overlapping_position(&reverse).len(), 1);
    }

    #[test]
    fn test_transcripts_on() {
        let mut builder = TranscriptIndexBuilder::new();
        builder.add(model("a", "chr1", 0, 10)).add(model("b", "chr1", 20, 30));
        assert_eq!(builder.len(), 2);
        let index = builder.build();
        assert_eq!(index.transcripts_on("chr1").count(), 2);
        assert_eq!(index.transcripts_on("chrX").count(), 0);
    }
}
