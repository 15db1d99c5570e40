//! Property-based tests for variant file parsing

use proptest::prelude::*;
use svsim::{Reference, Variant, VariantParseError, VariantParser};

fn reference() -> Reference {
    Reference::from_contigs([("chr1", vec![b'A'; 100]), ("chr2", vec![b'C'; 100])]).unwrap()
}

fn arb_contig() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("chr1"), Just("chr2")]
}

/// Whitespace between fields
fn arb_sep() -> impl Strategy<Value = String> {
    "[ \t]{1,3}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: any well-formed deletion parses to the same numbers
    #[test]
    fn prop_deletion_line(
        contig in arb_contig(),
        pos in any::<u32>(),
        length in any::<u32>(),
        sep in arb_sep(),
    ) {
        let reference = reference();
        let line = format!("{contig}{sep}deletion{sep}{pos}{sep}{length}");
        let parsed = VariantParser::new(&reference).parse_line(&line).unwrap();
        prop_assert_eq!(parsed, vec![Variant::deletion(contig, pos as u64, length as u64)]);
    }

    /// Property: duplication copy counts are read from the fifth field
    #[test]
    fn prop_duplication_copies(pos in 0u64..1000, length in 1u64..100, copies in 1usize..20) {
        let reference = reference();
        let line = format!("chr1 duplication {pos} {length} {copies}");
        let parsed = VariantParser::new(&reference).parse_line(&line).unwrap();
        prop_assert_eq!(parsed, vec![Variant::duplication("chr1", pos, length, copies)]);
    }

    /// Property: a translocation adds a deletion at the source and an
    /// insertion at the destination
    #[test]
    fn prop_translocation_line(
        to in arb_contig(),
        from in arb_contig(),
        pos in 0u64..1000,
        from_loc in 0u64..1000,
        length in 1u64..100,
    ) {
        let reference = reference();
        let data = format!("{to} translocation {pos} {length} {from} {from_loc}\n");
        let parsed = VariantParser::new(&reference).parse_bytes(data.as_bytes()).unwrap();

        prop_assert_eq!(parsed.total, 1);
        prop_assert_eq!(parsed.variants.len(), 2);
        let deletion = Variant::deletion(from, from_loc, length);
        prop_assert!(parsed.variants.get(from).contains(&deletion));
        prop_assert!(parsed
            .variants
            .get(to)
            .contains(&Variant::insertion_from(to, pos, length, from, from_loc)));
    }

    /// Property: unknown kinds are skipped and the rest of the file is kept
    #[test]
    fn prop_unknown_kind_skipped(kind in "[a-z]{3,12}", pos in 0u64..1000) {
        prop_assume!(kind.parse::<svsim::VariantKind>().is_err());
        let reference = reference();
        let data = format!("# header\n\nchr1 {kind} {pos} 5\nchr2 deletion {pos} 5\n");
        let parsed = VariantParser::new(&reference).parse_bytes(data.as_bytes()).unwrap();

        prop_assert_eq!(parsed.total, 2);
        prop_assert_eq!(parsed.variants.len(), 1);
        prop_assert_eq!(parsed.skipped.len(), 1);
        prop_assert_eq!(parsed.skipped[0].line, 3);
        prop_assert_eq!(&parsed.skipped[0].reason, &VariantParseError::UnknownType(kind.clone()));
    }

    /// Property: contigs missing from the reference are skipped
    #[test]
    fn prop_unknown_contig_skipped(contig in "chr[3-9][0-9]?", pos in 0u64..1000) {
        let reference = reference();
        let line = format!("{contig} insertion {pos} 10");
        prop_assert_eq!(
            VariantParser::new(&reference).parse_line(&line),
            Err(VariantParseError::UnknownContig(contig.clone()))
        );
    }
}
