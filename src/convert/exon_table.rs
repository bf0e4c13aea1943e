//! Exon/intron table derived from a transcript model
//!
//! Exons are kept in ascending genomic order (the *storage* order) whatever the
//! strand. Biological 5'->3' order is the *reference* order; on the reverse
//! strand it runs backwards through storage. The two index spaces meet only in
//! [`ExonIntronTable::reference_index`] and [`ExonIntronTable::intron_reference_index`].

use crate::coords::Strand;
use crate::reference::transcript::{Interval, TranscriptModel};

/// Per-transcript exon intervals plus transcript-order prefix sums
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExonIntronTable {
    strand: Strand,
    /// Forward-strand 0-based half-open exons, ascending
    exons: Vec<Interval>,
    /// `prefix[r]` = bases in reference-order exons `0..r`; length `n + 1`
    prefix: Vec<u64>,
}

impl ExonIntronTable {
    /// Build from exons that are already sorted and disjoint
    pub fn new(strand: Strand, exons: &[Interval]) -> Self {
        let exons = exons.to_vec();
        let n = exons.len();
        let mut prefix = Vec::with_capacity(n + 1);
        prefix.push(0);
        let mut total = 0u64;
        for r in 0..n {
            let storage = Self::flip_index(strand, n, r);
            total += exons[storage].len();
            prefix.push(total);
        }
        Self {
            strand,
            exons,
            prefix,
        }
    }

    pub fn from_model(model: &TranscriptModel) -> Self {
        Self::new(model.strand, &model.exons)
    }

    #[inline]
    fn flip_index(strand: Strand, count: usize, i: usize) -> usize {
        assert!(i < count, "index {} out of range for {} entries", i, count);
        match strand {
            Strand::Forward => i,
            Strand::Reverse => count - 1 - i,
        }
    }

    pub fn strand(&self) -> Strand {
        self.strand
    }

    pub fn exon_count(&self) -> usize {
        self.exons.len()
    }

    pub fn intron_count(&self) -> usize {
        self.exons.len().saturating_sub(1)
    }

    /// Exon bounds by storage index
    pub fn exon(&self, storage_idx: usize) -> Option<Interval> {
        self.exons.get(storage_idx).copied()
    }

    /// Intron bounds by storage index; intron `i` lies between exons `i` and `i + 1`
    pub fn intron(&self, storage_idx: usize) -> Option<Interval> {
        if storage_idx + 1 >= self.exons.len() {
            return None;
        }
        Some(Interval::new(
            self.exons[storage_idx].end,
            self.exons[storage_idx + 1].start,
        ))
    }

    pub fn exons(&self) -> &[Interval] {
        &self.exons
    }

    pub fn transcript_length(&self) -> u64 {
        self.prefix.last().copied().unwrap_or(0)
    }

    /// Map an exon index between storage and reference order (self-inverse)
    ///
    /// # Panics
    ///
    /// If `exon_idx >= exon_count()`.
    pub fn reference_index(&self, exon_idx: usize) -> usize {
        Self::flip_index(self.strand, self.exons.len(), exon_idx)
    }

    /// Map an intron index between storage and reference order (self-inverse)
    ///
    /// # Panics
    ///
    /// If `intron_idx >= intron_count()`.
    pub fn intron_reference_index(&self, intron_idx: usize) -> usize {
        Self::flip_index(self.strand, self.intron_count(), intron_idx)
    }

    /// Transcript bases upstream of the exon at reference index `ref_idx`
    pub fn bases_before(&self, ref_idx: usize) -> Option<u64> {
        self.prefix.get(ref_idx).copied()
    }

    /// Storage index of the exon containing a forward 0-based position
    pub fn exon_containing(&self, pos: u64) -> Option<usize> {
        let idx = self.exons.partition_point(|e| e.end <= pos);
        self.exons
            .get(idx)
            .filter(|e| e.start <= pos)
            .map(|_| idx)
    }

    /// Storage index of the intron containing a forward 0-based position
    pub fn intron_containing(&self, pos: u64) -> Option<usize> {
        let idx = self.exons.partition_point(|e| e.end <= pos);
        if idx == 0 || idx >= self.exons.len() || self.exons[idx].start <= pos {
            return None;
        }
        Some(idx - 1)
    }

    /// Reference index of the exon holding transcript offset `tx_offset` (0-based)
    pub fn exon_at_tx_offset(&self, tx_offset: u64) -> Option<usize> {
        if tx_offset >= self.transcript_length() {
            return None;
        }
        Some(self.prefix.partition_point(|&before| before <= tx_offset) - 1)
    }

    /// Forward 0-based genome position -> 0-based transcript offset
    pub fn genome_to_tx_offset(&self, pos: u64) -> Option<u64> {
        let storage = self.exon_containing(pos)?;
        let exon = self.exons[storage];
        let intra = match self.strand {
            Strand::Forward => pos - exon.start,
            Strand::Reverse => exon.end - 1 - pos,
        };
        Some(self.prefix[self.reference_index(storage)] + intra)
    }

    /// 0-based transcript offset -> forward 0-based genome position
    pub fn tx_offset_to_genome(&self, tx_offset: u64) -> Option<u64> {
        let ref_idx = self.exon_at_tx_offset(tx_offset)?;
        let exon = self.exons[self.reference_index(ref_idx)];
        let intra = tx_offset - self.prefix[ref_idx];
        Some(match self.strand {
            Strand::Forward => exon.start + intra,
            Strand::Reverse => exon.end - 1 - intra,
        })
    }
}
