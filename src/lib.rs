// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! ferro-txmap: transcript coordinate projection and indel normalization
//!
//! Part of the ferro bioinformatics toolkit.
//!
//! Maps positions between the genome, a spliced transcript and its coding
//! sequence, moves indels to a canonical position, finds the transcripts
//! overlapping a locus and decides whether two multi-allelic variant records
//! share an allele.
//!
//! # Example
//!
//! ```
//! use ferro_txmap::coords::GenomePosition;
//! use ferro_txmap::reference::mock::{zbtb48, HG19_CHR1_LENGTH};
//! use ferro_txmap::TranscriptProjector;
//!
//! let model = zbtb48().unwrap();
//! let projector = TranscriptProjector::new(&model);
//!
//! // First base of the transcript
//! let pos = GenomePosition::forward_one_based("chr1", HG19_CHR1_LENGTH, 6640063);
//! let tx = projector.genome_to_transcript_pos(&pos).unwrap();
//! assert_eq!(tx.pos, 1);
//!
//! // And back
//! let back = projector.transcript_to_genome_pos(&tx).unwrap();
//! assert_eq!(back, pos);
//! ```

pub mod batch;
pub mod change;
pub mod config;
pub mod convert;
pub mod coords;
pub mod equivalence;
pub mod error;
pub mod index;
pub mod normalize;
#[cfg(feature = "parallel")]
pub mod parallel;
pub mod reference;
pub mod sequence;

// Re-export commonly used types
pub use batch::{BatchConfig, BatchProcessor, BatchStats, TranscriptHit};
pub use change::{AminoAcidChange, ChangeKind, GenomeChange};
pub use config::TxMapConfig;
pub use convert::{ExonIntronTable, TranscriptProjector};
pub use coords::{CdsPosition, GenomePosition, PositionType, Strand, TranscriptPosition};
pub use equivalence::{AlleleMatch, AlleleMatcher, MatcherConfig, VariantRecord};
pub use error::{ErrorCode, TxMapError};
pub use index::{TranscriptIndex, TranscriptIndexBuilder};
pub use normalize::{
    normalize_amino_acid_deletion, normalize_deletion, normalize_genome_change,
    normalize_insertion, ShuffleDirection,
};
pub use reference::{MockProvider, ReferenceProvider, TranscriptModel, TranscriptModelBuilder};

/// Result type alias for ferro-txmap operations
pub type Result<T> = std::result::Result<T, TxMapError>;
