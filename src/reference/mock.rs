//! Mock reference provider for testing

use crate::coords::Strand;
use crate::error::TxMapError;
use crate::reference::provider::ReferenceProvider;
use crate::reference::transcript::{TranscriptModel, TranscriptModelBuilder};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Length of hg19 chr1
pub const HG19_CHR1_LENGTH: u64 = 249_250_621;

/// On-disk layout accepted by [`MockProvider::from_json`]
#[derive(Debug, Deserialize)]
struct MockData {
    #[serde(default)]
    contigs: HashMap<String, String>,
    #[serde(default)]
    transcripts: Vec<TranscriptModel>,
}

/// In-memory contigs plus a transcript lookup table
#[derive(Debug, Clone, Default)]
pub struct MockProvider {
    contigs: HashMap<String, String>,
    transcripts: HashMap<String, TranscriptModel>,
}

impl MockProvider {
    /// Create an empty mock provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Load contigs and transcripts from a JSON file
    ///
    /// Transcripts go through the same checks as [`TranscriptModelBuilder`];
    /// the first invalid one fails the load with `InvalidModel`.
    ///
    /// ```json
    /// { "contigs": { "chrT": "ACGT..." }, "transcripts": [ ... ] }
    /// ```
    pub fn from_json(path: &Path) -> Result<Self, TxMapError> {
        let content = std::fs::read_to_string(path)?;
        let data: MockData = serde_json::from_str(&content)?;

        let mut provider = Self {
            contigs: data.contigs,
            transcripts: HashMap::new(),
        };
        for tx in data.transcripts {
            provider.add_transcript(tx.validate()?);
        }
        Ok(provider)
    }

    /// Add a contig sequence
    pub fn add_contig(&mut self, name: impl Into<String>, sequence: impl Into<String>) {
        self.contigs.insert(name.into(), sequence.into());
    }

    /// Add a transcript to the provider
    pub fn add_transcript(&mut self, transcript: TranscriptModel) {
        self.transcripts
            .insert(transcript.accession.clone(), transcript);
    }

    pub fn get_transcript(&self, accession: &str) -> Option<&TranscriptModel> {
        self.transcripts.get(accession)
    }

    /// All transcripts, in no particular order
    pub fn transcripts(&self) -> impl Iterator<Item = &TranscriptModel> {
        self.transcripts.values()
    }

    /// Get the number of transcripts
    pub fn len(&self) -> usize {
        self.transcripts.len()
    }

    /// Check if provider is empty
    pub fn is_empty(&self) -> bool {
        self.transcripts.is_empty()
    }

    /// Create a provider with the hg19 ZBTB48 and ZNF436 models and a small
    /// synthetic contig `chrT` for sequence tests
    pub fn with_test_data() -> Self {
        let mut provider = Self::new();
        // Built from constants; the models are known to be valid.
        if let Ok(tx) = zbtb48() {
            provider.add_transcript(tx);
        }
        if let Ok(tx) = znf436() {
            provider.add_transcript(tx);
        }

        //                 1         2         3         4
        //        1234567890123456789012345678901234567890
        provider.add_contig("chrT", "GGGGGCATGTGTGTGCAAAAACCCCCTTTTTACGTACGTA");
        provider
    }
}

impl ReferenceProvider for MockProvider {
    fn get_genomic_sequence(
        &self,
        contig: &str,
        start: u64,
        end: u64,
    ) -> Result<String, TxMapError> {
        let seq = self
            .contigs
            .get(contig)
            .ok_or_else(|| TxMapError::ContigNotFound {
                contig: contig.to_string(),
            })?;
        if start > end || end as usize > seq.len() {
            return Err(TxMapError::SequenceNotFound {
                contig: contig.to_string(),
                start,
                end,
            });
        }
        Ok(seq[start as usize..end as usize].to_string())
    }

    fn contig_length(&self, contig: &str) -> Result<u64, TxMapError> {
        self.contigs
            .get(contig)
            .map(|seq| seq.len() as u64)
            .ok_or_else(|| TxMapError::ContigNotFound {
                contig: contig.to_string(),
            })
    }
}

/// uc001anx.3 (ZBTB48), hg19 chr1, forward strand
pub fn zbtb48() -> Result<TranscriptModel, TxMapError> {
    TranscriptModelBuilder::new("uc001anx.3", "chr1", HG19_CHR1_LENGTH, Strand::Forward)
        .gene_symbol("ZBTB48")
        .tx_region(6640062, 6649340)
        .exons(
            &[
                6640062, 6640600, 6642117, 6645978, 6646754, 6647264, 6647537, 6648119, 6648337,
                6648815, 6648975,
            ],
            &[
                6640196, 6641359, 6642359, 6646090, 6646847, 6647351, 6647692, 6648256, 6648502,
                6648904, 6649340,
            ],
        )
        .cds_genomic(6640669, 6649272)
        .build()
}

/// uc001bgu.3 (ZNF436), hg19 chr1, reverse strand
pub fn znf436() -> Result<TranscriptModel, TxMapError> {
    TranscriptModelBuilder::new("uc001bgu.3", "chr1", HG19_CHR1_LENGTH, Strand::Reverse)
        .gene_symbol("ZNF436")
        .tx_region(23685940, 23696357)
        .exons(
            &[23685940, 23693534, 23694465, 23695858],
            &[23689714, 23693661, 23694558, 23696357],
        )
        .cds_genomic(23688461, 23694498)
        .build()
}
