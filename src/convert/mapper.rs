//! Projection between genome, transcript and CDS coordinates
//!
//! # Coordinate Systems
//!
//! | System | Type | Notes |
//! |--------|------|-------|
//! | Genome | [`GenomePosition`] | results are on the transcript's strand |
//! | Transcript (n.) | [`TranscriptPosition`] | exon-concatenated, 5'->3' |
//! | CDS (c.) | [`CdsPosition`] | starts at the first coding base |
//!
//! Every conversion works on zero-based values and hands the result back in
//! the position type of its input.
//!
//! ## Exon/intron indices
//! `locate_exon` and `locate_intron` answer in reference (5'->3') order. Use
//! [`TranscriptProjector::exon_id_in_reference_order`] to move between
//! storage and reference order explicitly.

use crate::convert::exon_table::ExonIntronTable;
use crate::coords::{CdsPosition, GenomePosition, PositionType, Strand, TranscriptPosition};
use crate::error::TxMapError;
use crate::reference::transcript::{Interval, TranscriptModel};

/// Projects coordinates onto and off a single transcript
#[derive(Debug, Clone)]
pub struct TranscriptProjector<'a> {
    model: &'a TranscriptModel,
    table: ExonIntronTable,
}

impl<'a> TranscriptProjector<'a> {
    /// Create a new projector for a transcript
    pub fn new(model: &'a TranscriptModel) -> Self {
        Self {
            model,
            table: ExonIntronTable::from_model(model),
        }
    }

    pub fn model(&self) -> &'a TranscriptModel {
        self.model
    }

    pub fn table(&self) -> &ExonIntronTable {
        &self.table
    }

    pub fn transcript_length(&self) -> u64 {
        self.table.transcript_length()
    }

    /// Forward 0-based offset of a genome position on this transcript's contig
    fn forward_offset(&self, pos: &GenomePosition) -> Option<u64> {
        if pos.contig != self.model.contig {
            return None;
        }
        u64::try_from(pos.forward_zero_based_pos()).ok()
    }

    /// Exon containing `pos`, as a reference-order index
    ///
    /// `None` between exons, outside the transcript, or on another contig.
    pub fn locate_exon(&self, pos: &GenomePosition) -> Option<usize> {
        let offset = self.forward_offset(pos)?;
        self.table
            .exon_containing(offset)
            .map(|idx| self.table.reference_index(idx))
    }

    /// Intron containing `pos`, as a reference-order index
    pub fn locate_intron(&self, pos: &GenomePosition) -> Option<usize> {
        let offset = self.forward_offset(pos)?;
        self.table
            .intron_containing(offset)
            .map(|idx| self.table.intron_reference_index(idx))
    }

    /// Exon containing a transcript position, as a reference-order index
    pub fn locate_exon_tx(&self, pos: &TranscriptPosition) -> Option<usize> {
        let offset = u64::try_from(pos.zero_based_pos()).ok()?;
        self.table.exon_at_tx_offset(offset)
    }

    /// Map between storage (ascending genomic) and reference (5'->3') exon order
    ///
    /// Identity on the forward strand, `n - 1 - i` on the reverse strand. The
    /// mapping is its own inverse.
    ///
    /// # Panics
    ///
    /// If `exon_idx` is not below the exon count, like slice indexing.
    pub fn exon_id_in_reference_order(&self, exon_idx: usize) -> usize {
        self.table.reference_index(exon_idx)
    }

    /// Intron counterpart of [`Self::exon_id_in_reference_order`]
    ///
    /// # Panics
    ///
    /// If `intron_idx` is not below the intron count.
    pub fn intron_id_in_reference_order(&self, intron_idx: usize) -> usize {
        self.table.intron_reference_index(intron_idx)
    }

    /// Bounds of the exon at a reference-order index
    pub fn exon_bounds(&self, ref_idx: usize) -> Option<Interval> {
        if ref_idx >= self.table.exon_count() {
            return None;
        }
        self.table.exon(self.table.reference_index(ref_idx))
    }

    /// Transcript position -> genome position on the transcript's strand
    pub fn transcript_to_genome_pos(
        &self,
        pos: &TranscriptPosition,
    ) -> Result<GenomePosition, TxMapError> {
        pos.validate(self.transcript_length())?;
        let forward = self
            .table
            .tx_offset_to_genome(pos.zero_based_pos() as u64)
            .ok_or_else(|| TxMapError::out_of_range(pos.to_string()))?;
        Ok(self.genome_pos_from_forward(forward, pos.position_type))
    }

    fn genome_pos_from_forward(
        &self,
        forward: u64,
        position_type: PositionType,
    ) -> GenomePosition {
        let zero_based = match self.model.strand {
            Strand::Forward => forward as i64,
            Strand::Reverse => self.model.contig_length as i64 - 1 - forward as i64,
        };
        GenomePosition::new(
            self.model.contig.clone(),
            self.model.contig_length,
            self.model.strand,
            position_type.from_zero_based(zero_based),
            position_type,
        )
    }

    /// Genome position -> transcript position
    ///
    /// Fails with `NotInExon` unless the position lies inside an exon.
    pub fn genome_to_transcript_pos(
        &self,
        pos: &GenomePosition,
    ) -> Result<TranscriptPosition, TxMapError> {
        let offset = self
            .forward_offset(pos)
            .and_then(|p| self.table.genome_to_tx_offset(p))
            .ok_or_else(|| TxMapError::NotInExon {
                transcript: self.model.accession.clone(),
                position: pos.to_string(),
            })?;
        Ok(TranscriptPosition::new(
            self.model.accession.clone(),
            pos.position_type.from_zero_based(offset as i64),
            pos.position_type,
        ))
    }

    fn not_in_cds(&self, position: String) -> TxMapError {
        TxMapError::NotInCds {
            transcript: self.model.accession.clone(),
            position,
        }
    }

    /// Transcript position -> CDS position
    pub fn transcript_to_cds_pos(
        &self,
        pos: &TranscriptPosition,
    ) -> Result<CdsPosition, TxMapError> {
        pos.validate(self.transcript_length())?;
        let cds = self
            .model
            .cds
            .filter(|cds| !cds.is_empty())
            .ok_or_else(|| self.not_in_cds(pos.to_string()))?;
        let offset = pos.zero_based_pos() as u64;
        if !cds.contains(offset) {
            return Err(self.not_in_cds(pos.to_string()));
        }
        Ok(CdsPosition::new(
            self.model.accession.clone(),
            pos.position_type
                .from_zero_based((offset - cds.start) as i64),
            pos.position_type,
        ))
    }

    /// CDS position -> transcript position
    pub fn cds_to_transcript_pos(
        &self,
        pos: &CdsPosition,
    ) -> Result<TranscriptPosition, TxMapError> {
        let cds = self
            .model
            .cds
            .filter(|cds| !cds.is_empty())
            .ok_or_else(|| self.not_in_cds(pos.to_string()))?;
        let offset = pos.zero_based_pos();
        if offset < 0 || offset >= cds.len() as i64 {
            return Err(TxMapError::out_of_range(format!(
                "{} outside CDS of length {}",
                pos,
                cds.len()
            )));
        }
        Ok(TranscriptPosition::new(
            self.model.accession.clone(),
            pos.position_type
                .from_zero_based(cds.start as i64 + offset),
            pos.position_type,
        ))
    }

    /// Genome position -> CDS position
    ///
    /// Positions in an intron or UTR, or on a non-coding transcript, fail
    /// with `NotInCds`.
    pub fn genome_to_cds_pos(&self, pos: &GenomePosition) -> Result<CdsPosition, TxMapError> {
        let tx_pos = self.genome_to_transcript_pos(pos).map_err(|err| match err {
            TxMapError::NotInExon { .. } => self.not_in_cds(pos.to_string()),
            other => other,
        })?;
        self.transcript_to_cds_pos(&tx_pos).map_err(|err| match err {
            TxMapError::NotInCds { .. } => self.not_in_cds(pos.to_string()),
            other => other,
        })
    }

    /// CDS position -> genome position on the transcript's strand
    pub fn cds_to_genome_pos(&self, pos: &CdsPosition) -> Result<GenomePosition, TxMapError> {
        let tx_pos = self.cds_to_transcript_pos(pos)?;
        self.transcript_to_genome_pos(&tx_pos)
    }
}
