//! Transcript models
//!
//! # Coordinate System
//!
//! All intervals in this module are **0-based half-open** `[start, end)`:
//!
//! | Field | Space | Notes |
//! |-------|-------|-------|
//! | `TranscriptModel.tx_region` | genome, forward strand | transcribed span |
//! | `TranscriptModel.exons` | genome, forward strand | ascending, disjoint |
//! | `TranscriptModel.cds` | transcript | offsets into the exon-concatenated sequence |
//!
//! For positions with strand and position type, see [`crate::coords`].

use serde::{Deserialize, Serialize};

use crate::convert::exon_table::ExonIntronTable;
use crate::coords::Strand;
use crate::error::TxMapError;

/// A 0-based half-open interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    pub start: u64,
    pub end: u64,
}

impl Interval {
    pub const fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    pub const fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    pub const fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Check if a 0-based position is within this interval
    pub const fn contains(&self, pos: u64) -> bool {
        pos >= self.start && pos < self.end
    }

    /// Check if two half-open intervals share at least one base
    pub const fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// A transcript with its exon structure and sequence
///
/// Immutable once built; construct through [`TranscriptModelBuilder`] to get
/// the structural checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptModel {
    /// Transcript accession (e.g., "uc001anx.3", "NM_000088.3")
    pub accession: String,
    /// Gene symbol (e.g., "ZBTB48")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gene_symbol: Option<String>,
    /// Contig the transcript lies on
    pub contig: String,
    /// Length of that contig
    pub contig_length: u64,
    pub strand: Strand,
    /// Transcribed span on the forward strand
    pub tx_region: Interval,
    /// Exons on the forward strand, ascending
    pub exons: Vec<Interval>,
    /// Coding region in transcript coordinates; `None` for non-coding transcripts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cds: Option<Interval>,
    /// Strand-corrected transcript sequence; may be empty when only projection is needed
    #[serde(default)]
    pub sequence: String,
}

impl TranscriptModel {
    /// Sum of exon lengths
    pub fn transcript_length(&self) -> u64 {
        self.exons.iter().map(Interval::len).sum()
    }

    pub fn is_coding(&self) -> bool {
        self.cds.is_some_and(|cds| !cds.is_empty())
    }

    pub fn exon_count(&self) -> usize {
        self.exons.len()
    }

    pub fn has_sequence(&self) -> bool {
        !self.sequence.is_empty()
    }

    /// Re-run the builder checks on a model that did not come from the
    /// builder, such as one deserialized from JSON
    pub fn validate(self) -> Result<Self, TxMapError> {
        TranscriptModelBuilder::from(self).build()
    }
}

/// Where the builder takes the coding region from
#[derive(Debug, Clone, Copy)]
enum CdsSpec {
    Transcript(Interval),
    Genomic(Interval),
}

/// Builds and validates a [`TranscriptModel`]
///
/// # Example
///
/// ```
/// use ferro_txmap::coords::Strand;
/// use ferro_txmap::reference::TranscriptModelBuilder;
///
/// let model = TranscriptModelBuilder::new("tx1", "chr1", 1_000, Strand::Forward)
///     .exon(100, 200)
///     .exon(300, 350)
///     .cds_genomic(150, 320)
///     .build()
///     .unwrap();
///
/// assert_eq!(model.transcript_length(), 150);
/// assert_eq!(model.cds.unwrap().start, 50);
/// ```
#[derive(Debug, Clone)]
pub struct TranscriptModelBuilder {
    accession: String,
    gene_symbol: Option<String>,
    contig: String,
    contig_length: u64,
    strand: Strand,
    tx_region: Option<Interval>,
    exons: Vec<Interval>,
    cds: Option<CdsSpec>,
    sequence: String,
}

impl From<TranscriptModel> for TranscriptModelBuilder {
    fn from(model: TranscriptModel) -> Self {
        Self {
            accession: model.accession,
            gene_symbol: model.gene_symbol,
            contig: model.contig,
            contig_length: model.contig_length,
            strand: model.strand,
            tx_region: Some(model.tx_region),
            exons: model.exons,
            cds: model.cds.map(CdsSpec::Transcript),
            sequence: model.sequence,
        }
    }
}

impl TranscriptModelBuilder {
    pub fn new(
        accession: impl Into<String>,
        contig: impl Into<String>,
        contig_length: u64,
        strand: Strand,
    ) -> Self {
        Self {
            accession: accession.into(),
            gene_symbol: None,
            contig: contig.into(),
            contig_length,
            strand,
            tx_region: None,
            exons: Vec::new(),
            cds: None,
            sequence: String::new(),
        }
    }

    pub fn gene_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.gene_symbol = Some(symbol.into());
        self
    }

    /// Set the transcribed span; defaults to the hull of the exons
    pub fn tx_region(mut self, start: u64, end: u64) -> Self {
        self.tx_region = Some(Interval::new(start, end));
        self
    }

    /// Add one exon, 0-based half-open on the forward strand
    pub fn exon(mut self, start: u64, end: u64) -> Self {
        self.exons.push(Interval::new(start, end));
        self
    }

    /// Add exons from parallel start/end lists, as found in gene tables
    pub fn exons(mut self, starts: &[u64], ends: &[u64]) -> Self {
        self.exons
            .extend(starts.iter().zip(ends).map(|(&s, &e)| Interval::new(s, e)));
        self
    }

    /// Coding region in transcript coordinates, 0-based half-open
    pub fn cds_tx(mut self, start: u64, end: u64) -> Self {
        self.cds = Some(CdsSpec::Transcript(Interval::new(start, end)));
        self
    }

    /// Coding region as a forward-strand genomic span (knownGene `cdsStart`/`cdsEnd`)
    ///
    /// An empty span marks the transcript as non-coding.
    pub fn cds_genomic(mut self, start: u64, end: u64) -> Self {
        self.cds = Some(CdsSpec::Genomic(Interval::new(start, end)));
        self
    }

    pub fn sequence(mut self, sequence: impl Into<String>) -> Self {
        self.sequence = sequence.into();
        self
    }

    fn invalid(&self, msg: impl Into<String>) -> TxMapError {
        TxMapError::InvalidModel {
            accession: self.accession.clone(),
            msg: msg.into(),
        }
    }

    pub fn build(self) -> Result<TranscriptModel, TxMapError> {
        if self.exons.is_empty() {
            return Err(self.invalid("transcript has no exons"));
        }
        for (i, exon) in self.exons.iter().enumerate() {
            if exon.is_empty() {
                return Err(self.invalid(format!("exon {} is empty", i)));
            }
            if exon.end > self.contig_length {
                return Err(self.invalid(format!(
                    "exon {} ends at {} beyond contig length {}",
                    i, exon.end, self.contig_length
                )));
            }
        }
        for (i, pair) in self.exons.windows(2).enumerate() {
            if pair[0].end > pair[1].start {
                return Err(self.invalid(format!(
                    "exons {} and {} are not ascending and disjoint",
                    i,
                    i + 1
                )));
            }
        }

        let hull = Interval::new(
            self.exons[0].start,
            self.exons[self.exons.len() - 1].end,
        );
        let tx_region = match self.tx_region {
            Some(region) if region.start > hull.start || region.end < hull.end => {
                return Err(self.invalid("exons extend beyond the transcript region"));
            }
            Some(region) => region,
            None => hull,
        };

        let table = ExonIntronTable::new(self.strand, &self.exons);
        let tx_len = table.transcript_length();

        if !self.sequence.is_empty() && self.sequence.len() as u64 != tx_len {
            return Err(self.invalid(format!(
                "sequence length {} does not match transcript length {}",
                self.sequence.len(),
                tx_len
            )));
        }

        let cds = match self.cds {
            None => None,
            Some(CdsSpec::Transcript(cds)) => {
                if cds.start > cds.end || cds.end > tx_len {
                    return Err(self.invalid("CDS lies outside the transcript"));
                }
                Some(cds)
            }
            Some(CdsSpec::Genomic(span)) if span.is_empty() => None,
            Some(CdsSpec::Genomic(span)) => {
                let first = table.genome_to_tx_offset(span.start);
                let last = table.genome_to_tx_offset(span.end - 1);
                match (first, last) {
                    (Some(a), Some(b)) => Some(Interval::new(a.min(b), a.max(b) + 1)),
                    _ => return Err(self.invalid("CDS boundaries are not exonic")),
                }
            }
        };

        Ok(TranscriptModel {
            accession: self.accession,
            gene_symbol: self.gene_symbol,
            contig: self.contig,
            contig_length: self.contig_length,
            strand: self.strand,
            tx_region,
            exons: self.exons,
            cds,
            sequence: self.sequence,
        })
    }
}
