//! Allele matching between two variant records

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::TxMapError;
use crate::normalize::{shuffle, Boundaries, ShuffleDirection};
use crate::reference::ReferenceProvider;
use crate::sequence::trim_common_bases;

/// A multi-allelic site as found in a VCF line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantRecord {
    pub contig: String,
    /// 1-based position of the first REF base
    pub pos: u64,
    /// `alleles[0]` is REF, the rest are ALTs
    pub alleles: Vec<String>,
}

impl VariantRecord {
    pub fn new<S: Into<String>>(
        contig: impl Into<String>,
        pos: u64,
        alleles: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            contig: contig.into(),
            pos,
            alleles: alleles.into_iter().map(Into::into).collect(),
        }
    }

    pub fn reference(&self) -> Option<&str> {
        self.alleles.first().map(String::as_str)
    }
}

/// One REF/ALT pair at a 0-based position
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariantDescription {
    pub contig: String,
    /// 0-based position of the first REF base (insertion point for insertions)
    pub pos: u64,
    pub reference: String,
    pub alt: String,
}

impl VariantDescription {
    pub fn new(
        contig: impl Into<String>,
        pos: u64,
        reference: impl Into<String>,
        alt: impl Into<String>,
    ) -> Self {
        Self {
            contig: contig.into(),
            pos,
            reference: reference.into(),
            alt: alt.into(),
        }
    }
}

impl fmt::Display for VariantDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}>{}", self.contig, self.pos, self.reference, self.alt)
    }
}

/// An observed ALT that equals a database ALT; indices count from 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlleleMatch {
    pub observed_index: usize,
    pub database_index: usize,
}

/// Allele matcher options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Direction indels are shifted before comparison
    pub direction: ShuffleDirection,
    /// Initial flank fetched on each side; doubled while a shift reaches it
    pub window: u64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            direction: ShuffleDirection::FivePrime,
            window: 100,
        }
    }
}

/// Normalizes the ALT alleles of two records and reports which ones match
pub struct AlleleMatcher<P: ReferenceProvider> {
    provider: P,
    config: MatcherConfig,
}

impl<P: ReferenceProvider> AlleleMatcher<P> {
    pub fn new(provider: P) -> Self {
        Self::with_config(provider, MatcherConfig::default())
    }

    pub fn with_config(provider: P, config: MatcherConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// One description per ALT allele, paired with its allele index
    ///
    /// The REF allele (index 0) is never returned.
    pub fn decompose(&self, record: &VariantRecord) -> Vec<(usize, VariantDescription)> {
        let Some(reference) = record.reference() else {
            return Vec::new();
        };
        record
            .alleles
            .iter()
            .enumerate()
            .skip(1)
            .map(|(idx, alt)| {
                (
                    idx,
                    VariantDescription::new(
                        record.contig.clone(),
                        record.pos.saturating_sub(1),
                        reference,
                        alt.clone(),
                    ),
                )
            })
            .collect()
    }

    /// Trim shared bases, then shift indels to the configured end
    ///
    /// Alleles and reference sequence are compared upper-cased, so soft-masked
    /// repeats shift like any other. Alleles must be ASCII.
    pub fn normalize(&self, desc: &VariantDescription) -> Result<VariantDescription, TxMapError> {
        if !desc.reference.is_ascii() || !desc.alt.is_ascii() {
            return Err(TxMapError::invalid_shape(format!(
                "{} has non-ASCII alleles",
                desc
            )));
        }
        let upper_ref = desc.reference.to_ascii_uppercase();
        let upper_alt = desc.alt.to_ascii_uppercase();
        let (reference, alt, prefix) = trim_common_bases(&upper_ref, &upper_alt);
        let pos = desc.pos + prefix as u64;
        if reference.is_empty() == alt.is_empty() {
            return Ok(VariantDescription::new(desc.contig.clone(), pos, reference, alt));
        }

        let contig_len = self.provider.contig_length(&desc.contig)?;
        let ref_len = reference.len() as u64;
        if pos + ref_len > contig_len {
            return Err(TxMapError::out_of_range(format!(
                "{} extends past contig length {}",
                desc, contig_len
            )));
        }

        let mut window = self.config.window.max(1);
        loop {
            let lo = pos.saturating_sub(window);
            let hi = (pos + ref_len).saturating_add(window).min(contig_len);
            let seq = self
                .provider
                .get_genomic_sequence(&desc.contig, lo, hi)?
                .to_ascii_uppercase();
            let seq = seq.as_bytes();
            let rel_start = pos - lo;
            let rel_end = rel_start + ref_len;

            if seq.len() as u64 != hi - lo {
                return Err(TxMapError::SequenceNotFound {
                    contig: desc.contig.clone(),
                    start: lo,
                    end: hi,
                });
            }
            if !reference.is_empty()
                && &seq[rel_start as usize..rel_end as usize] != reference.as_bytes()
            {
                log::warn!(
                    "REF {} of {} does not match the reference sequence",
                    reference,
                    desc
                );
            }

            let bounds = Boundaries::whole(seq.len());
            let result = shuffle(
                seq,
                alt.as_bytes(),
                rel_start,
                rel_end,
                &bounds,
                self.config.direction,
            );
            let window_can_grow = match self.config.direction {
                ShuffleDirection::FivePrime => lo > 0,
                ShuffleDirection::ThreePrime => hi < contig_len,
            };
            if result.reached_boundary(&bounds) && window_can_grow {
                window = window.saturating_mul(2);
                log::debug!("{} reached the window edge, widening to {}", desc, window);
                continue;
            }

            let new_pos = lo + result.start;
            return Ok(if alt.is_empty() {
                VariantDescription::new(
                    desc.contig.clone(),
                    new_pos,
                    String::from_utf8_lossy(&seq[result.start as usize..result.end as usize]),
                    "",
                )
            } else {
                VariantDescription::new(
                    desc.contig.clone(),
                    new_pos,
                    "",
                    String::from_utf8_lossy(&result.rotated_insertion(alt.as_bytes())),
                )
            });
        }
    }

    /// All `(observed, database)` ALT index pairs whose normalized forms are equal
    pub fn match_alleles(
        &self,
        observed: &VariantRecord,
        database: &VariantRecord,
    ) -> Result<Vec<AlleleMatch>, TxMapError> {
        let observed = self.normalized_alleles(observed)?;
        let database = self.normalized_alleles(database)?;

        let mut matches = Vec::new();
        for (observed_index, obs) in &observed {
            for (database_index, db) in &database {
                if obs == db {
                    matches.push(AlleleMatch {
                        observed_index: *observed_index,
                        database_index: *database_index,
                    });
                }
            }
        }
        Ok(matches)
    }

    fn normalized_alleles(
        &self,
        record: &VariantRecord,
    ) -> Result<Vec<(usize, VariantDescription)>, TxMapError> {
        self.decompose(record)
            .into_iter()
            .map(|(idx, desc)| Ok((idx, self.normalize(&desc)?)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::MockProvider;

    fn matcher() -> AlleleMatcher<MockProvider> {
        AlleleMatcher::new(MockProvider::with_test_data())
    }

    #[test]
    fn test_decompose_skips_reference() {
        let record = VariantRecord::new("chrT", 16, ["C", "CA", "T"]);
        let parts = matcher().decompose(&record);
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].0, 1);
        assert_eq!(parts[1].0, 2);
        assert_eq!(parts[1].1, VariantDescription::new("chrT", 15, "C", "T"));
    }

    #[test]
    fn test_decompose_empty_record() {
        let record = VariantRecord::new("chrT", 16, Vec::<String>::new());
        assert!(matcher().decompose(&record).is_empty());
    }

    #[test]
    fn test_snv_needs_no_sequence() {
        let desc = VariantDescription::new("chrUnknown", 99, "A", "G");
        assert_eq!(matcher().normalize(&desc).unwrap(), desc);
    }

    #[test]
    fn test_deletion_left_shift() {
        // chrT 13-15 is GTG; deleting TG at 14 shifts left to 8
        let desc = VariantDescription::new("chrT", 12, "GTG", "G");
        let out = matcher().normalize(&desc).unwrap();
        assert_eq!(out, VariantDescription::new("chrT", 7, "TG", ""));
    }

    #[test]
    fn test_small_window_grows() {
        let config = MatcherConfig {
            window: 2,
            ..Default::default()
        };
        let m = AlleleMatcher::with_config(MockProvider::with_test_data(), config);
        let desc = VariantDescription::new("chrT", 12, "GTG", "G");
        assert_eq!(m.normalize(&desc).unwrap().pos, 7);
    }

    #[test]
    fn test_insertion_left_shift() {
        let desc = VariantDescription::new("chrT", 20, "A", "AA");
        let out = matcher().normalize(&desc).unwrap();
        assert_eq!(out, VariantDescription::new("chrT", 16, "", "A"));
    }

    #[test]
    fn test_three_prime_direction() {
        let config = MatcherConfig {
            direction: ShuffleDirection::ThreePrime,
            ..Default::default()
        };
        let m = AlleleMatcher::with_config(MockProvider::with_test_data(), config);
        let desc = VariantDescription::new("chrT", 6, "ATG", "A");
        assert_eq!(m.normalize(&desc).unwrap(), VariantDescription::new("chrT", 13, "TG", ""));
    }

    #[test]
    fn test_unknown_contig_for_indel() {
        let desc = VariantDescription::new("chrZ", 5, "AC", "A");
        assert!(matches!(
            matcher().normalize(&desc),
            Err(TxMapError::ContigNotFound { .. })
        ));
    }

    fn soft_masked() -> AlleleMatcher<MockProvider> {
        let mut provider = MockProvider::new();
        provider.add_contig("chr1", "GGGGGCaaaaaTTTTT");
        AlleleMatcher::new(provider)
    }

    #[test]
    fn test_soft_masked_repeat_shifts() {
        // One A inserted at either end of the lower-case run
        let m = soft_masked();
        let first = m.normalize(&VariantDescription::new("chr1", 5, "C", "CA")).unwrap();
        let last = m.normalize(&VariantDescription::new("chr1", 10, "a", "aa")).unwrap();
        assert_eq!(first, VariantDescription::new("chr1", 6, "", "A"));
        assert_eq!(last, first);

        let observed = VariantRecord::new("chr1", 6, ["C", "CA"]);
        let database = VariantRecord::new("chr1", 11, ["A", "AA"]);
        assert_eq!(
            m.match_alleles(&observed, &database).unwrap(),
            vec![AlleleMatch {
                observed_index: 1,
                database_index: 1
            }]
        );
    }

    #[test]
    fn test_soft_masked_deletion_reports_upper_case_ref() {
        let out = soft_masked()
            .normalize(&VariantDescription::new("chr1", 9, "aa", "a"))
            .unwrap();
        assert_eq!(out, VariantDescription::new("chr1", 6, "A", ""));
    }

    #[test]
    fn test_non_ascii_alleles_rejected() {
        let desc = VariantDescription::new("chrT", 4, "\u{e9}", "\u{e8}");
        assert!(matches!(
            matcher().normalize(&desc),
            Err(TxMapError::InvalidChangeShape { .. })
        ));

        let observed = VariantRecord::new("chrT", 5, ["\u{e9}", "\u{e8}"]);
        let database = VariantRecord::new("chrT", 5, ["G", "T"]);
        assert!(matcher().match_alleles(&observed, &database).is_err());
    }

    #[test]
    fn test_match_alleles_multiallelic() {
        let observed = VariantRecord::new("chrT", 16, ["C", "CA", "T"]);
        let database = VariantRecord::new("chrT", 16, ["C", "T"]);
        let matches = matcher().match_alleles(&observed, &database).unwrap();
        assert_eq!(
            matches,
            vec![AlleleMatch {
                observed_index: 2,
                database_index: 1
            }]
        );
    }
}
