//! Property-based tests for projection, normalization and the overlap index
//!
//! Transcript layouts are generated as alternating gap/exon lengths on a
//! synthetic contig, on either strand.

use ferro_txmap::change::GenomeChange;
use ferro_txmap::coords::{GenomePosition, PositionType, Strand, TranscriptPosition};
use ferro_txmap::index::TranscriptIndexBuilder;
use ferro_txmap::normalize::normalize_genome_change;
use ferro_txmap::reference::TranscriptModelBuilder;
use ferro_txmap::sequence::reverse_complement;
use ferro_txmap::{TranscriptModel, TranscriptProjector};
use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;

const CONTIG_LEN: u64 = 10_000;

// =============================================================================
// Strategies
// =============================================================================

fn strand() -> impl Strategy<Value = Strand> {
    prop_oneof![Just(Strand::Forward), Just(Strand::Reverse)]
}

/// (gap, exon length) pairs; the first exon starts after the first gap
fn exon_layout() -> impl Strategy<Value = Vec<(u64, u64)>> {
    prop::collection::vec((1u64..40, 1u64..40), 1..8)
}

/// Sequence over a two-letter alphabet so repeats are common
fn repetitive_sequence(len: usize) -> impl Strategy<Value = String> {
    prop::collection::vec(prop_oneof![Just('A'), Just('C')], len)
        .prop_map(|bases| bases.into_iter().collect())
}

fn nucleotides(max: usize) -> impl Strategy<Value = String> {
    prop::collection::vec(prop_oneof![Just('A'), Just('C'), Just('G'), Just('T')], 0..max)
        .prop_map(|bases| bases.into_iter().collect())
}

fn build_model(layout: &[(u64, u64)], strand: Strand, sequence: Option<&str>) -> TranscriptModel {
    let mut builder = TranscriptModelBuilder::new("tx1", "chrP", CONTIG_LEN, strand);
    let mut cursor = 0;
    for &(gap, len) in layout {
        builder = builder.exon(cursor + gap, cursor + gap + len);
        cursor += gap + len;
    }
    if let Some(seq) = sequence {
        builder = builder.sequence(seq);
    }
    builder.build().unwrap()
}

/// A layout together with a transcript sequence of matching length
fn model_with_sequence() -> impl Strategy<Value = TranscriptModel> {
    (exon_layout(), strand()).prop_flat_map(|(layout, strand)| {
        let len: u64 = layout.iter().map(|&(_, l)| l).sum();
        repetitive_sequence(len as usize)
            .prop_map(move |seq| build_model(&layout, strand, Some(&seq)))
    })
}

fn zero_based_tx(pos: usize) -> TranscriptPosition {
    TranscriptPosition::new("tx1", pos as i64, PositionType::ZeroBased)
}

// =============================================================================
// Projection
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Every transcript base projects to the genome and back unchanged
    #[test]
    fn prop_projection_round_trip(layout in exon_layout(), strand in strand()) {
        let model = build_model(&layout, strand, None);
        let projector = TranscriptProjector::new(&model);
        for t in 0..model.transcript_length() as usize {
            let g = projector.transcript_to_genome_pos(&zero_based_tx(t)).unwrap();
            prop_assert_eq!(g.strand, strand);
            let back = projector.genome_to_transcript_pos(&g).unwrap();
            prop_assert_eq!(back.pos, t as i64);
        }
    }

    /// Inside the transcript span every base is in exactly one exon or intron
    #[test]
    fn prop_exon_intron_partition(layout in exon_layout(), strand in strand()) {
        let model = build_model(&layout, strand, None);
        let projector = TranscriptProjector::new(&model);
        for p in model.tx_region.start..model.tx_region.end {
            let pos = GenomePosition::new("chrP", CONTIG_LEN, Strand::Forward, p as i64, PositionType::ZeroBased);
            let exon = projector.locate_exon(&pos);
            let intron = projector.locate_intron(&pos);
            prop_assert!(exon.is_some() != intron.is_some(), "position {}", p);
        }
        let before = GenomePosition::new("chrP", CONTIG_LEN, Strand::Forward, model.tx_region.start as i64 - 1, PositionType::ZeroBased);
        prop_assert_eq!(projector.locate_exon(&before), None);
        prop_assert_eq!(projector.locate_intron(&before), None);
    }

    /// The storage/reference exon mapping is its own inverse
    #[test]
    fn prop_exon_order_is_involution(layout in exon_layout(), strand in strand()) {
        let model = build_model(&layout, strand, None);
        let projector = TranscriptProjector::new(&model);
        for i in 0..model.exon_count() {
            let j = projector.exon_id_in_reference_order(i);
            prop_assert!(j < model.exon_count());
            prop_assert_eq!(projector.exon_id_in_reference_order(j), i);
        }
    }

    /// Exons visited in reference order tile the transcript without gaps
    #[test]
    fn prop_reference_order_is_five_to_three(layout in exon_layout(), strand in strand()) {
        let model = build_model(&layout, strand, None);
        let projector = TranscriptProjector::new(&model);
        let mut t = 0usize;
        for ref_idx in 0..model.exon_count() {
            let exon = projector.exon_bounds(ref_idx).unwrap();
            for _ in 0..exon.len() {
                prop_assert_eq!(projector.locate_exon_tx(&zero_based_tx(t)), Some(ref_idx));
                t += 1;
            }
        }
    }
}

// =============================================================================
// Normalization
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Normalizing a normalized deletion leaves it where it is
    #[test]
    fn prop_deletion_normalization_idempotent(
        model in model_with_sequence(),
        start_frac in 0.0f64..1.0,
        len in 1usize..4,
    ) {
        let tx_len = model.transcript_length() as usize;
        prop_assume!(len < tx_len);
        let start = ((tx_len - len) as f64 * start_frac) as usize;
        // Keep the deletion inside one exon
        let projector = TranscriptProjector::new(&model);
        prop_assume!(
            projector.locate_exon_tx(&zero_based_tx(start))
                == projector.locate_exon_tx(&zero_based_tx(start + len - 1))
        );

        let pos = projector.transcript_to_genome_pos(&zero_based_tx(start)).unwrap();
        let del = GenomeChange::new(pos, &model.sequence[start..start + len], "");
        let once = normalize_genome_change(&model, &del, &zero_based_tx(start)).unwrap();
        // Deletions are moved on the genome, so a shift past the exon end is out of scope
        let once_tx = match projector.genome_to_transcript_pos(&once.pos) {
            Ok(tx) => tx,
            Err(_) => return Ok(()),
        };
        let once_start = once_tx.pos as usize;
        prop_assume!(
            projector.locate_exon_tx(&zero_based_tx(start))
                == projector.locate_exon_tx(&zero_based_tx(once_start + len - 1))
        );
        prop_assert_eq!(&once.reference, &model.sequence[once_start..once_start + len]);
        let twice = normalize_genome_change(&model, &once, &once_tx).unwrap();
        prop_assert_eq!(once, twice);
    }

    /// Normalizing a normalized insertion leaves it where it is
    #[test]
    fn prop_insertion_normalization_idempotent(
        model in model_with_sequence(),
        start_frac in 0.0f64..1.0,
        alt in "[AC]{1,3}",
    ) {
        let tx_len = model.transcript_length() as usize;
        let start = (tx_len as f64 * start_frac) as usize;
        let projector = TranscriptProjector::new(&model);

        let pos = projector.transcript_to_genome_pos(&zero_based_tx(start)).unwrap();
        let ins = GenomeChange::new(pos, "", alt);
        // Rotating onto the past-the-end position is reported, not normalized
        let once = match normalize_genome_change(&model, &ins, &zero_based_tx(start)) {
            Ok(change) => change,
            Err(err) => {
                prop_assert!(err.is_invariant_violation());
                return Ok(());
            }
        };
        let once_tx = projector.genome_to_transcript_pos(&once.pos).unwrap();
        let twice = normalize_genome_change(&model, &once, &once_tx).unwrap();
        prop_assert_eq!(once, twice);
    }
}

// =============================================================================
// Changes and sequences
// =============================================================================

proptest! {
    /// Flipping a change to the other strand and back restores every field
    #[test]
    fn prop_change_strand_round_trip(
        pos in 1i64..900,
        reference in nucleotides(6),
        alt in nucleotides(6),
        one_based in any::<bool>(),
    ) {
        let position_type = if one_based { PositionType::OneBased } else { PositionType::ZeroBased };
        let gpos = GenomePosition::new("chrP", 1_000, Strand::Forward, pos, position_type);
        let change = GenomeChange::new(gpos, reference, alt);
        let twice = change.with_strand(Strand::Reverse).with_strand(Strand::Forward);
        prop_assert_eq!(twice.pos.pos, change.pos.pos);
        prop_assert_eq!(twice.pos.strand, change.pos.strand);
        prop_assert_eq!(twice.pos.position_type, change.pos.position_type);
        prop_assert_eq!(&twice.reference, &change.reference);
        prop_assert_eq!(&twice.alt, &change.alt);
        prop_assert_eq!(&change.with_strand(Strand::Reverse), &change);
    }

    #[test]
    fn prop_reverse_complement_involution(seq in nucleotides(50)) {
        prop_assert_eq!(reverse_complement(&reverse_complement(&seq)), seq);
    }
}

// =============================================================================
// Overlap index
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Interval queries agree with a linear scan
    #[test]
    fn prop_index_matches_linear_scan(
        spans in prop::collection::vec((0u64..5_000, 1u64..500), 1..60),
        begin in 0u64..5_500,
        width in 1u64..300,
    ) {
        let models: Vec<TranscriptModel> = spans
            .iter()
            .enumerate()
            .map(|(i, &(start, len))| {
                TranscriptModelBuilder::new(format!("tx{}", i), "chrP", CONTIG_LEN, Strand::Forward)
                    .exon(start, start + len)
                    .build()
                    .unwrap()
            })
            .collect();
        let index = models.iter().cloned().collect::<TranscriptIndexBuilder>().build();

        let end = begin + width;
        let mut expected: Vec<String> = models
            .iter()
            .filter(|m| m.tx_region.start < end && begin < m.tx_region.end)
            .map(|m| m.accession.clone())
            .collect();
        expected.sort();
        let mut actual: Vec<String> = index
            .overlapping_interval("chrP", begin, end)
            .iter()
            .map(|m| m.accession.clone())
            .collect();
        actual.sort();
        prop_assert_eq!(actual, expected);
    }
}
