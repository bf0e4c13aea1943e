//! Allele equivalence between variant records
//!
//! Two records describe the same allele when their ALT alleles normalize to
//! the same `(contig, position, ref, alt)` tuple. Normalization trims shared
//! bases and shifts indels through repeats, fetching flanking sequence from a
//! [`ReferenceProvider`](crate::reference::ReferenceProvider).
//!
//! # Examples
//!
//! ```
//! use ferro_txmap::MockProvider;
//! use ferro_txmap::equivalence::{AlleleMatcher, VariantRecord};
//!
//! let matcher = AlleleMatcher::new(MockProvider::with_test_data());
//!
//! // chrT:7 ATG>A and chrT:13 GTG>G delete the same TG repeat unit
//! let observed = VariantRecord::new("chrT", 7, ["ATG", "A"]);
//! let database = VariantRecord::new("chrT", 13, ["GTG", "G"]);
//!
//! let matches = matcher.match_alleles(&observed, &database).unwrap();
//! assert_eq!(matches.len(), 1);
//! assert_eq!(matches[0].observed_index, 1);
//! ```
//!
//! The REF allele (index 0) is never compared.

mod matcher;

pub use matcher::{AlleleMatch, AlleleMatcher, MatcherConfig, VariantDescription, VariantRecord};
