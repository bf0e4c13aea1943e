//! Coordinate conversion
//!
//! Provides conversion between the coordinate systems of one transcript:
//! - Genome ↔ Transcript (spliced, 5' to 3')
//! - Transcript ↔ CDS
//! - Genome ↔ CDS (composed)

pub mod exon_table;
pub mod mapper;

pub use exon_table::ExonIntronTable;
pub use mapper::TranscriptProjector;
