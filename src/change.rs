//! Genome and amino-acid change records
//!
//! A [`GenomeChange`] is a position plus REF/ALT alleles written on the
//! position's strand. An empty REF is an insertion before `pos`; an empty ALT
//! is a deletion starting at `pos`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::coords::{GenomePosition, PositionType, Strand};
use crate::sequence::reverse_complement;

/// Shape of a change, derived from its alleles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeKind {
    /// Single base replaced by a single base
    Substitution,
    /// Empty REF
    Insertion,
    /// Empty ALT
    Deletion,
    /// Multi-base REF and/or ALT, both non-empty
    BlockSubstitution,
    /// Both alleles empty
    NoChange,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChangeKind::Substitution => "substitution",
            ChangeKind::Insertion => "insertion",
            ChangeKind::Deletion => "deletion",
            ChangeKind::BlockSubstitution => "block substitution",
            ChangeKind::NoChange => "no change",
        };
        write!(f, "{}", s)
    }
}

/// A change on the genome
///
/// Equality compares the forward-strand form, so a change and its
/// strand-flipped counterpart are equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenomeChange {
    /// First affected base (or insertion point)
    pub pos: GenomePosition,
    /// Reference allele on `pos.strand`
    pub reference: String,
    /// Alternate allele on `pos.strand`
    pub alt: String,
}

impl GenomeChange {
    pub fn new(pos: GenomePosition, reference: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            pos,
            reference: reference.into(),
            alt: alt.into(),
        }
    }

    pub fn kind(&self) -> ChangeKind {
        match (self.reference.len(), self.alt.len()) {
            (0, 0) => ChangeKind::NoChange,
            (0, _) => ChangeKind::Insertion,
            (_, 0) => ChangeKind::Deletion,
            (1, 1) => ChangeKind::Substitution,
            _ => ChangeKind::BlockSubstitution,
        }
    }

    pub fn strand(&self) -> Strand {
        self.pos.strand
    }

    /// The same change written on `strand`
    ///
    /// The REF interval `[p, p + |ref|)` is mirrored to
    /// `[len - p - |ref|, len - p)` and both alleles are reverse complemented.
    /// Flipping twice returns the original change field for field.
    pub fn with_strand(&self, strand: Strand) -> Self {
        if strand == self.pos.strand {
            return self.clone();
        }
        let len = self.pos.contig_length as i64;
        let mirrored = len - self.pos.zero_based_pos() - self.reference.len() as i64;
        let pos = GenomePosition {
            strand,
            pos: self.pos.position_type.from_zero_based(mirrored),
            ..self.pos.clone()
        };
        Self {
            pos,
            reference: reverse_complement(&self.reference),
            alt: reverse_complement(&self.alt),
        }
    }

    pub fn with_position_type(&self, position_type: PositionType) -> Self {
        Self {
            pos: self.pos.with_position_type(position_type),
            ..self.clone()
        }
    }

    fn forward_key(&self) -> (i64, String, String) {
        let fwd = self.with_strand(Strand::Forward);
        (fwd.pos.zero_based_pos(), fwd.reference, fwd.alt)
    }
}

impl PartialEq for GenomeChange {
    fn eq(&self, other: &Self) -> bool {
        self.pos.contig == other.pos.contig && self.forward_key() == other.forward_key()
    }
}

impl Eq for GenomeChange {}

impl Hash for GenomeChange {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.pos.contig.hash(state);
        self.forward_key().hash(state);
    }
}

impl fmt::Display for GenomeChange {
    /// Forward-strand, one-based, e.g. `chr1:6640063:A>G` or `chr1:100:->TG`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fwd = self.with_strand(Strand::Forward);
        let allele = |s: &str| if s.is_empty() { "-".to_string() } else { s.to_string() };
        write!(
            f,
            "{}:{}:{}>{}",
            fwd.pos.contig,
            fwd.pos.zero_based_pos() + 1,
            allele(&fwd.reference),
            allele(&fwd.alt)
        )
    }
}

/// A change on a protein sequence
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AminoAcidChange {
    /// 0-based residue position
    pub pos: u64,
    /// Reference residues (one-letter codes)
    pub reference: String,
    /// Alternate residues (one-letter codes)
    pub alt: String,
}

impl AminoAcidChange {
    pub fn new(pos: u64, reference: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            pos,
            reference: reference.into(),
            alt: alt.into(),
        }
    }

    pub fn is_deletion(&self) -> bool {
        !self.reference.is_empty() && self.alt.is_empty()
    }
}
