//! Coordinate value types
//!
//! # Coordinate Systems
//!
//! Three coordinate spaces are supported:
//!
//! | Type | Offset along | Notes |
//! |------|--------------|-------|
//! | [`GenomePosition`] | contig, on a given strand | carries the contig length so it can be mirrored |
//! | [`TranscriptPosition`] | exon-concatenated, strand-corrected transcript | `1..=len` one-based |
//! | [`CdsPosition`] | coding sequence, starting at the first coding base | `1..=cds_len` one-based |
//!
//! Every position records its [`PositionType`]. Internal arithmetic is always
//! done on the zero-based value; the caller's position type is reapplied only
//! when a result is handed back.
//!
//! Offsets are signed so that out-of-range inputs (e.g. one-based position 0)
//! are representable and can be rejected with a typed error instead of
//! wrapping.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::TxMapError;

/// Whether a position counts from 0 or from 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PositionType {
    /// First base is 0
    ZeroBased,
    /// First base is 1 (HGVS, VCF, GFF)
    #[default]
    OneBased,
}

impl PositionType {
    /// Convert a value of this position type to its zero-based equivalent
    #[inline]
    pub const fn to_zero_based(self, pos: i64) -> i64 {
        match self {
            PositionType::ZeroBased => pos,
            PositionType::OneBased => pos - 1,
        }
    }

    /// Express a zero-based value in this position type
    #[inline]
    pub const fn from_zero_based(self, pos: i64) -> i64 {
        match self {
            PositionType::ZeroBased => pos,
            PositionType::OneBased => pos + 1,
        }
    }
}

/// Strand orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Strand {
    #[serde(rename = "+")]
    #[default]
    Forward,
    #[serde(rename = "-")]
    Reverse,
}

impl Strand {
    /// The opposite strand
    #[inline]
    pub const fn flip(self) -> Self {
        match self {
            Strand::Forward => Strand::Reverse,
            Strand::Reverse => Strand::Forward,
        }
    }

    #[inline]
    pub const fn is_forward(self) -> bool {
        matches!(self, Strand::Forward)
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strand::Forward => write!(f, "+"),
            Strand::Reverse => write!(f, "-"),
        }
    }
}

impl TryFrom<char> for Strand {
    type Error = String;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            '+' => Ok(Strand::Forward),
            '-' => Ok(Strand::Reverse),
            _ => Err(format!("Invalid strand: {}", c)),
        }
    }
}

/// A base on a contig, on a particular strand
///
/// Two positions are equal when they denote the same base, regardless of the
/// strand or position type used to describe it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenomePosition {
    /// Contig name (e.g., "chr1")
    pub contig: String,
    /// Contig length, needed to mirror the position onto the other strand
    pub contig_length: u64,
    /// Strand the offset is counted on
    pub strand: Strand,
    /// Offset in `position_type` coordinates
    pub pos: i64,
    /// Basis of `pos`
    pub position_type: PositionType,
}

impl GenomePosition {
    pub fn new(
        contig: impl Into<String>,
        contig_length: u64,
        strand: Strand,
        pos: i64,
        position_type: PositionType,
    ) -> Self {
        Self {
            contig: contig.into(),
            contig_length,
            strand,
            pos,
            position_type,
        }
    }

    /// Shorthand for a one-based forward-strand position
    pub fn forward_one_based(contig: impl Into<String>, contig_length: u64, pos: i64) -> Self {
        Self::new(contig, contig_length, Strand::Forward, pos, PositionType::OneBased)
    }

    /// The zero-based offset on this position's strand
    #[inline]
    pub fn zero_based_pos(&self) -> i64 {
        self.position_type.to_zero_based(self.pos)
    }

    /// The zero-based offset on the forward strand
    #[inline]
    pub fn forward_zero_based_pos(&self) -> i64 {
        match self.strand {
            Strand::Forward => self.zero_based_pos(),
            Strand::Reverse => self.contig_length as i64 - 1 - self.zero_based_pos(),
        }
    }

    /// Same base, expressed in another position type
    pub fn with_position_type(&self, position_type: PositionType) -> Self {
        Self {
            pos: position_type.from_zero_based(self.zero_based_pos()),
            position_type,
            ..self.clone()
        }
    }

    /// Same base, counted on `strand`
    ///
    /// The offset is mirrored around the contig length, so flipping twice is
    /// the identity.
    pub fn with_strand(&self, strand: Strand) -> Self {
        if strand == self.strand {
            return self.clone();
        }
        let mirrored = self.contig_length as i64 - 1 - self.zero_based_pos();
        Self {
            strand,
            pos: self.position_type.from_zero_based(mirrored),
            ..self.clone()
        }
    }

    /// Move `delta` bases along this position's own strand
    pub fn shifted(&self, delta: i64) -> Self {
        Self {
            pos: self.pos + delta,
            ..self.clone()
        }
    }
}

impl PartialEq for GenomePosition {
    fn eq(&self, other: &Self) -> bool {
        self.contig == other.contig
            && self.forward_zero_based_pos() == other.forward_zero_based_pos()
    }
}

impl Eq for GenomePosition {}

impl Hash for GenomePosition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.contig.hash(state);
        self.forward_zero_based_pos().hash(state);
    }
}

impl fmt::Display for GenomePosition {
    /// Forward-strand, one-based, e.g. `chr1:6640063`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.contig, self.forward_zero_based_pos() + 1)
    }
}

/// A base on a transcript, counted 5' to 3' over the concatenated exons
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptPosition {
    /// Transcript accession
    pub transcript: String,
    /// Offset in `position_type` coordinates
    pub pos: i64,
    /// Basis of `pos`
    pub position_type: PositionType,
}

impl TranscriptPosition {
    pub fn new(transcript: impl Into<String>, pos: i64, position_type: PositionType) -> Self {
        Self {
            transcript: transcript.into(),
            pos,
            position_type,
        }
    }

    /// Create a position, rejecting offsets outside `1..=length` (one-based)
    pub fn checked(
        transcript: impl Into<String>,
        length: u64,
        pos: i64,
        position_type: PositionType,
    ) -> Result<Self, TxMapError> {
        let tx_pos = Self::new(transcript, pos, position_type);
        tx_pos.validate(length)?;
        Ok(tx_pos)
    }

    /// Check the offset against a transcript of `length` bases
    pub fn validate(&self, length: u64) -> Result<(), TxMapError> {
        let zb = self.zero_based_pos();
        if zb < 0 || zb >= length as i64 {
            return Err(TxMapError::out_of_range(format!(
                "{} outside transcript of length {}",
                self, length
            )));
        }
        Ok(())
    }

    #[inline]
    pub fn zero_based_pos(&self) -> i64 {
        self.position_type.to_zero_based(self.pos)
    }

    pub fn with_position_type(&self, position_type: PositionType) -> Self {
        Self {
            pos: position_type.from_zero_based(self.zero_based_pos()),
            position_type,
            ..self.clone()
        }
    }

    /// Move `delta` bases towards the 3' end
    pub fn shifted(&self, delta: i64) -> Self {
        Self {
            pos: self.pos + delta,
            ..self.clone()
        }
    }
}

impl PartialEq for TranscriptPosition {
    fn eq(&self, other: &Self) -> bool {
        self.transcript == other.transcript && self.zero_based_pos() == other.zero_based_pos()
    }
}

impl Eq for TranscriptPosition {}

impl Hash for TranscriptPosition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.transcript.hash(state);
        self.zero_based_pos().hash(state);
    }
}

impl fmt::Display for TranscriptPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:n.{}", self.transcript, self.zero_based_pos() + 1)
    }
}

/// A base on the coding sequence of a transcript
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CdsPosition {
    /// Transcript accession
    pub transcript: String,
    /// Offset from the first coding base, in `position_type` coordinates
    pub pos: i64,
    /// Basis of `pos`
    pub position_type: PositionType,
}

impl CdsPosition {
    pub fn new(transcript: impl Into<String>, pos: i64, position_type: PositionType) -> Self {
        Self {
            transcript: transcript.into(),
            pos,
            position_type,
        }
    }

    #[inline]
    pub fn zero_based_pos(&self) -> i64 {
        self.position_type.to_zero_based(self.pos)
    }

    pub fn with_position_type(&self, position_type: PositionType) -> Self {
        Self {
            pos: position_type.from_zero_based(self.zero_based_pos()),
            position_type,
            ..self.clone()
        }
    }
}

impl PartialEq for CdsPosition {
    fn eq(&self, other: &Self) -> bool {
        self.transcript == other.transcript && self.zero_based_pos() == other.zero_based_pos()
    }
}

impl Eq for CdsPosition {}

impl Hash for CdsPosition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.transcript.hash(state);
        self.zero_based_pos().hash(state);
    }
}

impl fmt::Display for CdsPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:c.{}", self.transcript, self.zero_based_pos() + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHR1_LEN: u64 = 249_250_621;

    #[test]
    fn test_position_type_conversion() {
        assert_eq!(PositionType::OneBased.to_zero_based(1), 0);
        assert_eq!(PositionType::ZeroBased.to_zero_based(1), 1);
        assert_eq!(PositionType::OneBased.from_zero_based(0), 1);
    }

    #[test]
    fn test_strand_flip_is_involution() {
        assert_eq!(Strand::Forward.flip(), Strand::Reverse);
        assert_eq!(Strand::Forward.flip().flip(), Strand::Forward);
        assert_eq!(Strand::try_from('-'), Ok(Strand::Reverse));
        assert!(Strand::try_from('x').is_err());
    }

    #[test]
    fn test_genome_position_with_strand_one_based() {
        let pos = GenomePosition::forward_one_based("chr1", 100, 1);
        let flipped = pos.with_strand(Strand::Reverse);
        assert_eq!(flipped.pos, 100);
        assert_eq!(flipped.strand, Strand::Reverse);

        let back = flipped.with_strand(Strand::Forward);
        assert_eq!(back.pos, 1);
        assert_eq!(back.strand, Strand::Forward);
    }

    #[test]
    fn test_genome_position_with_strand_zero_based() {
        let pos = GenomePosition::new("chr1", 100, Strand::Forward, 0, PositionType::ZeroBased);
        let flipped = pos.with_strand(Strand::Reverse);
        assert_eq!(flipped.pos, 99);
        assert_eq!(flipped.with_strand(Strand::Forward).pos, 0);
    }

    #[test]
    fn test_genome_position_equality_ignores_representation() {
        let one = GenomePosition::forward_one_based("chr1", CHR1_LEN, 6640063);
        let zero = one.with_position_type(PositionType::ZeroBased);
        let rev = one.with_strand(Strand::Reverse);
        assert_eq!(zero.pos, 6640062);
        assert_eq!(one, zero);
        assert_eq!(one, rev);
        assert_ne!(one, one.shifted(1));
    }

    #[test]
    fn test_genome_position_display_is_forward_one_based() {
        let pos = GenomePosition::new("chr1", CHR1_LEN, Strand::Forward, 6640062, PositionType::ZeroBased);
        assert_eq!(pos.to_string(), "chr1:6640063");
        assert_eq!(pos.with_strand(Strand::Reverse).to_string(), "chr1:6640063");
    }

    #[test]
    fn test_transcript_position_validate() {
        assert!(TranscriptPosition::checked("tx", 10, 1, PositionType::OneBased).is_ok());
        assert!(TranscriptPosition::checked("tx", 10, 10, PositionType::OneBased).is_ok());
        assert!(TranscriptPosition::checked("tx", 10, 0, PositionType::OneBased).is_err());
        assert!(TranscriptPosition::checked("tx", 10, 11, PositionType::OneBased).is_err());
        assert!(TranscriptPosition::checked("tx", 10, 10, PositionType::ZeroBased).is_err());
    }

    #[test]
    fn test_transcript_position_equality_across_types() {
        let a = TranscriptPosition::new("tx", 5, PositionType::OneBased);
        let b = TranscriptPosition::new("tx", 4, PositionType::ZeroBased);
        assert_eq!(a, b);
        assert_eq!(a.shifted(2).pos, 7);
        assert_eq!(a.to_string(), "tx:n.5");
    }

    #[test]
    fn test_cds_position_display() {
        let c = CdsPosition::new("tx", 0, PositionType::ZeroBased);
        assert_eq!(c.to_string(), "tx:c.1");
        assert_eq!(c.with_position_type(PositionType::OneBased).pos, 1);
    }
}
