//! Reference provider trait
//!
//! Defines the interface for accessing reference sequence data.

use crate::error::TxMapError;

/// Synchronous sequence lookup
///
/// Implementations might include:
/// - MockProvider for testing
/// - an indexed FASTA reader
/// - a remote sequence service behind a cache
///
/// The core never caches, retries or backs off around these calls.
pub trait ReferenceProvider {
    /// Get genomic sequence for a contig/chromosome
    ///
    /// # Arguments
    ///
    /// * `contig` - Chromosome/contig name (e.g., "chr1")
    /// * `start` - 0-based start position
    /// * `end` - 0-based end position (exclusive)
    fn get_genomic_sequence(&self, contig: &str, start: u64, end: u64)
        -> Result<String, TxMapError>;

    /// Length of a contig
    fn contig_length(&self, contig: &str) -> Result<u64, TxMapError>;

    /// Check if a contig is known
    fn has_contig(&self, contig: &str) -> bool {
        self.contig_length(contig).is_ok()
    }
}

/// Blanket implementation for boxed trait objects
impl ReferenceProvider for Box<dyn ReferenceProvider + Send + Sync> {
    fn get_genomic_sequence(
        &self,
        contig: &str,
        start: u64,
        end: u64,
    ) -> Result<String, TxMapError> {
        (**self).get_genomic_sequence(contig, start, end)
    }

    fn contig_length(&self, contig: &str) -> Result<u64, TxMapError> {
        (**self).contig_length(contig)
    }

    fn has_contig(&self, contig: &str) -> bool {
        (**self).has_contig(contig)
    }
}

impl<P: ReferenceProvider + ?Sized> ReferenceProvider for std::sync::Arc<P> {
    fn get_genomic_sequence(
        &self,
        contig: &str,
        start: u64,
        end: u64,
    ) -> Result<String, TxMapError> {
        (**self).get_genomic_sequence(contig, start, end)
    }

    fn contig_length(&self, contig: &str) -> Result<u64, TxMapError> {
        (**self).contig_length(contig)
    }
}
