//! Normalization engine
//!
//! Moves insertions and deletions to their canonical 3' position along the
//! transcript, and provides the generic [`shuffle`] used for genome-level
//! left/right alignment.
//!
//! # Coordinate Systems
//!
//! | Context | Basis | Notes |
//! |---------|-------|-------|
//! | `tx_pos` argument | any | converted to 0-based on entry |
//! | Sequence indexing | 0-based | `usize` into the transcript sequence |
//! | Returned change | caller's | position type of the input change |
//!
//! The transcript sequence must be present on the model; a model built
//! without sequence only supports projection.
//!
//! Insertions may shift across exon boundaries, since the rotation runs over
//! the spliced sequence and the result is projected back onto the genome.
//! Deletions are moved on the genome directly and must not span a splice
//! junction; that precondition belongs to the caller and is not checked.

pub mod boundary;
pub mod config;
pub mod shuffle;

use crate::change::{AminoAcidChange, ChangeKind, GenomeChange};
use crate::convert::mapper::TranscriptProjector;
use crate::coords::{PositionType, TranscriptPosition};
use crate::error::TxMapError;
use crate::reference::transcript::TranscriptModel;

pub use boundary::Boundaries;
pub use config::ShuffleDirection;
pub use shuffle::{shuffle, ShuffleResult};

/// Count how far a block of `len` bases at `pos` can rotate to the right
///
/// Advances while `seq[pos] == seq[pos + len]`.
fn rightward_shift(seq: &[u8], pos: usize, len: usize) -> usize {
    let mut shift = 0;
    while pos + shift + len < seq.len() && seq[pos + shift] == seq[pos + shift + len] {
        shift += 1;
    }
    shift
}

/// Zero-based transcript index, checked against `limit`
fn tx_index(tx_pos: &TranscriptPosition, limit: usize) -> Result<usize, TxMapError> {
    let zero_based = tx_pos.zero_based_pos();
    if zero_based < 0 || zero_based as usize > limit {
        return Err(TxMapError::out_of_range(format!(
            "{} outside transcript sequence of length {}",
            tx_pos,
            limit
        )));
    }
    Ok(zero_based as usize)
}

/// Normalize an insertion to its 3'-most position on the transcript
///
/// `tx_pos` is the transcript position the ALT bases are inserted before.
/// Returns `change` itself when no shift is possible.
pub fn normalize_insertion(
    model: &TranscriptModel,
    change: &GenomeChange,
    tx_pos: &TranscriptPosition,
) -> Result<GenomeChange, TxMapError> {
    if change.kind() != ChangeKind::Insertion {
        return Err(TxMapError::invalid_shape(format!(
            "expected an insertion, got a {} ({})",
            change.kind(),
            change
        )));
    }

    let stranded = change.with_strand(model.strand);
    let start = tx_index(tx_pos, model.sequence.len())?;
    let alt = stranded.alt.as_bytes();

    let mut seq = Vec::with_capacity(model.sequence.len() + alt.len());
    seq.extend_from_slice(&model.sequence.as_bytes()[..start]);
    seq.extend_from_slice(alt);
    seq.extend_from_slice(&model.sequence.as_bytes()[start..]);

    let shift = rightward_shift(&seq, start, alt.len());
    if shift == 0 {
        return Ok(change.clone());
    }

    let shifted_idx = start + shift;
    let shifted_tx = TranscriptPosition::new(
        model.accession.clone(),
        shifted_idx as i64,
        PositionType::ZeroBased,
    );
    let projector = TranscriptProjector::new(model);
    let genome_pos = match projector.transcript_to_genome_pos(&shifted_tx) {
        Ok(pos) => pos.with_position_type(change.pos.position_type),
        Err(err) => {
            let msg = format!(
                "shifted insertion {} at {} cannot be projected back to the genome: {}",
                change, shifted_tx, err
            );
            log::error!("{}", msg);
            return Err(TxMapError::InvariantViolation { msg });
        }
    };

    let new_alt = String::from_utf8_lossy(&seq[shifted_idx..shifted_idx + alt.len()]).into_owned();
    log::debug!(
        "insertion {} on {} shifted by {} to {}",
        change,
        model.accession,
        shift,
        genome_pos
    );
    Ok(GenomeChange::new(genome_pos, "", new_alt))
}

/// Normalize a deletion to its 3'-most position on the transcript
///
/// `tx_pos` is the transcript position of the first deleted base. The
/// deletion must lie within one exon.
pub fn normalize_deletion(
    model: &TranscriptModel,
    change: &GenomeChange,
    tx_pos: &TranscriptPosition,
) -> Result<GenomeChange, TxMapError> {
    if change.kind() != ChangeKind::Deletion {
        return Err(TxMapError::invalid_shape(format!(
            "expected a deletion, got a {} ({})",
            change.kind(),
            change
        )));
    }

    let stranded = change.with_strand(model.strand);
    let seq = model.sequence.as_bytes();
    let len = stranded.reference.len();
    let start = tx_index(tx_pos, seq.len())?;
    if start + len > seq.len() {
        return Err(TxMapError::out_of_range(format!(
            "deletion of {} bases at {} runs past the transcript end",
            len, tx_pos
        )));
    }

    let shift = rightward_shift(seq, start, len);
    if shift == 0 {
        return Ok(change.clone());
    }

    let new_start = start + shift;
    let new_ref = String::from_utf8_lossy(&seq[new_start..new_start + len]).into_owned();
    let genome_pos = stranded.pos.shifted(shift as i64);
    log::debug!(
        "deletion {} on {} shifted by {} to {}",
        change,
        model.accession,
        shift,
        genome_pos
    );
    Ok(GenomeChange::new(genome_pos, new_ref, ""))
}

/// Normalize any change; only insertions and deletions move
pub fn normalize_genome_change(
    model: &TranscriptModel,
    change: &GenomeChange,
    tx_pos: &TranscriptPosition,
) -> Result<GenomeChange, TxMapError> {
    match change.kind() {
        ChangeKind::Insertion => normalize_insertion(model, change, tx_pos),
        ChangeKind::Deletion => normalize_deletion(model, change, tx_pos),
        ChangeKind::Substitution | ChangeKind::BlockSubstitution | ChangeKind::NoChange => {
            Ok(change.clone())
        }
    }
}

/// Shift a protein deletion to its C-terminal-most equivalent position
pub fn normalize_amino_acid_deletion(
    protein: &str,
    change: &AminoAcidChange,
) -> Result<AminoAcidChange, TxMapError> {
    if !change.is_deletion() {
        return Err(TxMapError::invalid_shape(format!(
            "expected an amino acid deletion, got {}>{} at {}",
            change.reference, change.alt, change.pos
        )));
    }
    let seq = protein.as_bytes();
    let start = change.pos as usize;
    let len = change.reference.len();
    if start + len > seq.len() {
        return Err(TxMapError::out_of_range(format!(
            "deletion of {} residues at {} runs past protein of length {}",
            len,
            start,
            seq.len()
        )));
    }

    let shift = rightward_shift(seq, start, len);
    if shift == 0 {
        return Ok(change.clone());
    }
    let new_start = start + shift;
    Ok(AminoAcidChange::new(
        new_start as u64,
        String::from_utf8_lossy(&seq[new_start..new_start + len]).into_owned(),
        "",
    ))
}
