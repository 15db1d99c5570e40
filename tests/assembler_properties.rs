//! Property-based tests for donor assembly

use proptest::prelude::*;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use svsim::core::dna::BASES;
use svsim::{assemble_contig, check_variations, Reference, Variant};

/// Generate a random DNA sequence
fn arb_sequence(min: usize, max: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop::sample::select(BASES.to_vec()), min..max)
}

/// Build a non-overlapping mix of variants, left to right
///
/// Each variant starts at or after the bases the previous one consumed.
/// Returns the variants and a contig length that holds them.
fn layout(pieces: &[(u64, u64, u8)]) -> (Vec<Variant>, u64) {
    let mut next = 0u64;
    let mut variants = Vec::with_capacity(pieces.len());
    for &(gap, length, kind) in pieces {
        let pos = next + gap;
        let (variant, width) = match kind {
            0 => (Variant::insertion("chr1", pos, length), 1),
            1 => (Variant::deletion("chr1", pos, length), length + 1),
            2 => (Variant::duplication("chr1", pos, length, 2), length),
            _ => (Variant::transversion("chr1", pos, length), length),
        };
        variants.push(variant);
        next = pos + width;
    }
    (variants, next + 1)
}

/// A mix of variants plus a reference long enough to hold them
fn arb_genome_with_variants() -> impl Strategy<Value = (Vec<u8>, Vec<Variant>)> {
    prop::collection::vec((0u64..10, 1u64..15, 0u8..4), 0..25).prop_flat_map(|pieces| {
        let (variants, min_len) = layout(&pieces);
        let min_len = min_len as usize;
        (arb_sequence(min_len, min_len + 50), Just(variants))
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: zero variants reproduce the reference
    #[test]
    fn prop_no_variants_is_identity(seq in arb_sequence(1, 500), seed in any::<u64>()) {
        let reference = Reference::from_contigs([("chr1", seq.clone())]).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let donor = assemble_contig(&reference, "chr1", &[], &mut rng).unwrap();
        prop_assert_eq!(donor.sequence, seq);
        prop_assert!(donor.applied.is_empty());
    }

    /// Property: growth is the sum of inserted bytes minus skipped bases
    #[test]
    fn prop_growth_matches_applied(
        (seq, variants) in arb_genome_with_variants(),
        seed in any::<u64>(),
    ) {
        let reference = Reference::from_contigs([("chr1", seq.clone())]).unwrap();
        let count = variants.len();
        let sorted = check_variations("chr1", Some(seq.len() as u64), variants).unwrap();

        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let donor = assemble_contig(&reference, "chr1", &sorted, &mut rng).unwrap();
        prop_assert_eq!(donor.applied.len(), count);

        let expected: i64 = donor
            .applied
            .iter()
            .map(|a| a.sequence.len() as i64 - a.variant.delta() as i64)
            .sum();
        prop_assert_eq!(donor.growth(), expected);
        prop_assert_eq!(donor.reference_len, seq.len() as u64);
    }

    /// Property: the same seed gives the same donor
    #[test]
    fn prop_seeded_assembly_is_deterministic(
        (seq, variants) in arb_genome_with_variants(),
        seed in any::<u64>(),
    ) {
        let reference = Reference::from_contigs([("chr1", seq.clone())]).unwrap();
        let sorted = check_variations("chr1", Some(seq.len() as u64), variants).unwrap();

        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let first = assemble_contig(&reference, "chr1", &sorted, &mut rng).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let second = assemble_contig(&reference, "chr1", &sorted, &mut rng).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Property: the bases in front of the first variant are untouched
    #[test]
    fn prop_prefix_preserved((seq, variants) in arb_genome_with_variants()) {
        let reference = Reference::from_contigs([("chr1", seq.clone())]).unwrap();
        let sorted = check_variations("chr1", Some(seq.len() as u64), variants).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        let donor = assemble_contig(&reference, "chr1", &sorted, &mut rng).unwrap();

        let prefix = sorted
            .first()
            .and_then(|v| v.run_end())
            .map_or(seq.len(), |end| end as usize);
        prop_assert_eq!(&donor.sequence[..prefix], &seq[..prefix]);
    }

    /// Property: the bases after the last variant are untouched
    #[test]
    fn prop_suffix_preserved((seq, variants) in arb_genome_with_variants()) {
        let reference = Reference::from_contigs([("chr1", seq.clone())]).unwrap();
        let sorted = check_variations("chr1", Some(seq.len() as u64), variants).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        let donor = assemble_contig(&reference, "chr1", &sorted, &mut rng).unwrap();

        let resume = sorted.last().and_then(|v| v.resume_at()).unwrap_or(0) as usize;
        let tail = &seq[resume..];
        prop_assert!(donor.sequence.ends_with(tail));
    }
}
