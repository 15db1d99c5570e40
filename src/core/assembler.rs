//! Donor contig assembly
//!
//! Walks a contig with a reference cursor and splits it into unchanged
//! reference runs and variant segments. Each variant is preceded by the
//! run `[cursor, run_end)` and the cursor then moves to `resume_at`.
//! Insertions and deletions keep their anchor base in the run;
//! duplications and transversions replace `[pos, pos + length)`.
//!
//! ```text
//! reference: 1 2 3 4 5 6 7 8 9 A B
//! insertion pos=1 length=2
//! segments:  [1 2] [x y] [3 4 5 6 7 8 9 A B]
//! transversion pos=1 length=3
//! segments:  [1] [4 3 2] [5 6 7 8 9 A B]
//! ```

use crate::core::error::{AssemblyError, AssemblyResult, ReferenceError};
use crate::core::reference::ReferenceLookup;
use crate::core::variant::{AppliedVariant, Variant};
use log::debug;
use rand::Rng;

/// One piece of a donor contig
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Reference bases `[start, end)` copied as-is
    Unchanged { start: u64, end: u64 },
    /// Bytes produced by a variant
    Variant(&'a Variant),
}

impl Segment<'_> {
    /// Bytes this segment contributes to the donor
    pub fn materialize<L, R>(
        &self,
        reference: &L,
        contig: &str,
        rng: &mut R,
    ) -> AssemblyResult<Vec<u8>>
    where
        L: ReferenceLookup + ?Sized,
        R: Rng + ?Sized,
    {
        match self {
            Segment::Unchanged { start, end } => {
                Ok(reference.fetch(contig, *start, *end)?.to_vec())
            }
            Segment::Variant(variant) => Ok(variant.sequence(reference, rng)?),
        }
    }

    /// Length of an unchanged run, `None` for variant segments
    pub fn run_len(&self) -> Option<u64> {
        match self {
            Segment::Unchanged { start, end } => Some(end - start),
            Segment::Variant(_) => None,
        }
    }
}

/// Split a contig into segments
///
/// `variants` must be sorted by position and free of overlaps. A variant
/// whose run would end before the cursor means validation was bypassed
/// and fails with [`AssemblyError::NegativeSegment`].
pub fn plan_segments<'a>(
    contig: &str,
    contig_len: u64,
    variants: &'a [Variant],
) -> AssemblyResult<Vec<Segment<'a>>> {
    let mut segments = Vec::with_capacity(variants.len() * 2 + 1);
    let mut cursor = 0u64;

    for variant in variants {
        if let Variant::Translocation { pos, .. } = variant {
            return Err(AssemblyError::UndecomposedTranslocation {
                contig: contig.to_string(),
                pos: *pos,
            });
        }

        let pos = variant.pos();
        let (run_end, resume_at) = match (variant.run_end(), variant.resume_at()) {
            (Some(run_end), Some(resume_at)) => (run_end, resume_at),
            _ => {
                return Err(ReferenceError::RangeOutOfBounds {
                    contig: contig.to_string(),
                    start: pos,
                    end: u64::MAX,
                    len: contig_len,
                }
                .into());
            }
        };
        if run_end < cursor {
            return Err(AssemblyError::NegativeSegment {
                contig: contig.to_string(),
                pos,
                cursor,
            });
        }

        if run_end > cursor {
            segments.push(Segment::Unchanged {
                start: cursor,
                end: run_end,
            });
        }
        segments.push(Segment::Variant(variant));
        cursor = resume_at;
    }

    if cursor < contig_len {
        segments.push(Segment::Unchanged {
            start: cursor,
            end: contig_len,
        });
    } else if cursor > contig_len {
        // Trailing run would start past the end of the contig
        segments.push(Segment::Unchanged {
            start: cursor,
            end: cursor,
        });
    }

    Ok(segments)
}

/// A donor contig and the variants spliced into it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledContig {
    pub name: String,
    /// Length of the reference contig
    pub reference_len: u64,
    /// Donor sequence
    pub sequence: Vec<u8>,
    /// Variants in splice order with the bytes they contributed
    pub applied: Vec<AppliedVariant>,
}

impl AssembledContig {
    /// Donor length minus reference length
    pub fn growth(&self) -> i64 {
        self.sequence.len() as i64 - self.reference_len as i64
    }
}

/// Assemble one donor contig
///
/// `variants` must be sorted and validated (see
/// [`crate::core::index::check_variations`]). Random insertions draw
/// from `rng` once; the drawn bytes are kept in
/// [`AssembledContig::applied`] so VCF output matches the donor.
pub fn assemble_contig<L, R>(
    reference: &L,
    contig: &str,
    variants: &[Variant],
    rng: &mut R,
) -> AssemblyResult<AssembledContig>
where
    L: ReferenceLookup + ?Sized,
    R: Rng + ?Sized,
{
    let contig_len = reference
        .contig_len(contig)
        .ok_or_else(|| ReferenceError::UnknownContig(contig.to_string()))?;
    let segments = plan_segments(contig, contig_len, variants)?;

    let mut sequence = Vec::with_capacity(contig_len as usize);
    let mut applied = Vec::with_capacity(variants.len());

    for segment in &segments {
        let bytes = segment.materialize(reference, contig, rng)?;
        sequence.extend_from_slice(&bytes);
        if let Segment::Variant(variant) = segment {
            applied.push(AppliedVariant {
                variant: (*variant).clone(),
                sequence: bytes,
            });
        }
    }

    debug!(
        "Assembled {}: {} segments, {} -> {} bases",
        contig,
        segments.len(),
        contig_len,
        sequence.len()
    );

    Ok(AssembledContig {
        name: contig.to_string(),
        reference_len: contig_len,
        sequence,
        applied,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::reference::Reference;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn rng() -> Xoshiro256PlusPlus {
        Xoshiro256PlusPlus::seed_from_u64(7)
    }

    fn reference() -> Reference {
        Reference::from_contigs([("test", "123456789AB"), ("src", "ACGTACGT")]).unwrap()
    }

    #[test]
    fn test_no_variants_passes_through() {
        let reference = reference();
        let donor = assemble_contig(&reference, "test", &[], &mut rng()).unwrap();
        assert_eq!(donor.sequence, b"123456789AB");
        assert!(donor.applied.is_empty());
        assert_eq!(donor.growth(), 0);
    }

    #[test]
    fn test_random_insertion() {
        let reference = reference();
        let variants = [Variant::insertion("test", 1, 2)];
        let donor = assemble_contig(&reference, "test", &variants, &mut rng()).unwrap();

        assert_eq!(donor.sequence.len(), 13);
        assert_eq!(&donor.sequence[0..2], b"12");
        assert_eq!(&donor.sequence[4..], b"3456789AB");
        assert_eq!(donor.applied.len(), 1);
        assert_eq!(donor.applied[0].sequence, donor.sequence[2..4].to_vec());
    }

    #[test]
    fn test_deletion() {
        let reference = reference();
        let variants = [Variant::deletion("test", 1, 2)];
        let donor = assemble_contig(&reference, "test", &variants, &mut rng()).unwrap();
        assert_eq!(donor.sequence, b"1256789AB");
    }

    #[test]
    fn test_sourced_insertion_and_deletion() {
        let reference = reference();
        let variants = [
            Variant::insertion_from("test", 0, 3, "src", 4),
            Variant::deletion("test", 5, 3),
        ];
        let donor = assemble_contig(&reference, "test", &variants, &mut rng()).unwrap();
        assert_eq!(donor.sequence, b"1ACG23456AB");
    }

    #[test]
    fn test_duplication_growth() {
        let reference = reference();
        let variants = [Variant::duplication("test", 2, 3, 3)];
        let donor = assemble_contig(&reference, "test", &variants, &mut rng()).unwrap();
        assert_eq!(donor.applied[0].sequence, b"345345345");
        assert_eq!(donor.sequence, b"123453453456789AB");
        assert_eq!(donor.growth(), 6);
    }

    #[test]
    fn test_transversion_replaces_its_span() {
        let reference = Reference::from_contigs([("1", "ABCDEFGHIJ")]).unwrap();
        let variants = [Variant::transversion("1", 2, 5)];
        let donor = assemble_contig(&reference, "1", &variants, &mut rng()).unwrap();
        assert_eq!(donor.sequence, b"ABGFEDCHIJ");
        assert_eq!(donor.growth(), 0);

        let variants = [Variant::duplication("1", 2, 2, 2)];
        let donor = assemble_contig(&reference, "1", &variants, &mut rng()).unwrap();
        assert_eq!(donor.sequence, b"ABCDCDEFGHIJ");
    }

    #[test]
    fn test_spans_at_contig_edges() {
        let reference = Reference::from_contigs([("1", "ABCDEFGHIJ")]).unwrap();
        let variants = [Variant::transversion("1", 0, 3), Variant::transversion("1", 7, 3)];
        let donor = assemble_contig(&reference, "1", &variants, &mut rng()).unwrap();
        assert_eq!(donor.sequence, b"CBADEFGJIH");
    }

    #[test]
    fn test_transversion_after_insertion_anchor() {
        let reference = reference();
        let variants = [
            Variant::insertion_from("test", 1, 2, "src", 0),
            Variant::transversion("test", 2, 3),
        ];
        let segments = plan_segments("test", 11, &variants).unwrap();
        assert_eq!(
            segments,
            vec![
                Segment::Unchanged { start: 0, end: 2 },
                Segment::Variant(&variants[0]),
                Segment::Variant(&variants[1]),
                Segment::Unchanged { start: 5, end: 11 },
            ]
        );
        let donor = assemble_contig(&reference, "test", &variants, &mut rng()).unwrap();
        assert_eq!(donor.sequence, b"12AC5436789AB");
    }

    #[test]
    fn test_plan_segments() {
        let variants = [Variant::insertion("test", 1, 2), Variant::deletion("test", 5, 2)];
        let segments = plan_segments("test", 11, &variants).unwrap();
        assert_eq!(
            segments,
            vec![
                Segment::Unchanged { start: 0, end: 2 },
                Segment::Variant(&variants[0]),
                Segment::Unchanged { start: 2, end: 6 },
                Segment::Variant(&variants[1]),
                Segment::Unchanged { start: 8, end: 11 },
            ]
        );
        assert_eq!(segments[2].run_len(), Some(4));
        assert_eq!(segments[1].run_len(), None);
    }

    #[test]
    fn test_negative_segment() {
        let variants = [Variant::deletion("test", 1, 5), Variant::deletion("test", 3, 1)];
        assert!(matches!(
            plan_segments("test", 11, &variants),
            Err(AssemblyError::NegativeSegment { pos: 3, cursor: 7, .. })
        ));
    }

    #[test]
    fn test_transversion_inside_deleted_bases() {
        // The deletion consumes bases 2..=4, the transversion starts at 4
        let variants = [Variant::deletion("test", 1, 3), Variant::transversion("test", 4, 2)];
        assert!(matches!(
            plan_segments("test", 11, &variants),
            Err(AssemblyError::NegativeSegment { pos: 4, cursor: 5, .. })
        ));
    }

    #[test]
    fn test_position_overflow() {
        let variants = [Variant::deletion("test", u64::MAX, 1)];
        assert!(matches!(
            plan_segments("test", 11, &variants),
            Err(AssemblyError::Reference(ReferenceError::RangeOutOfBounds { end: u64::MAX, .. }))
        ));
    }

    #[test]
    fn test_undecomposed_translocation() {
        let variants = [Variant::translocation("test", 1, 2, "src", 0)];
        assert!(matches!(
            plan_segments("test", 11, &variants),
            Err(AssemblyError::UndecomposedTranslocation { pos: 1, .. })
        ));
    }

    #[test]
    fn test_deletion_past_end() {
        let reference = reference();
        let variants = [Variant::deletion("test", 8, 3)];
        assert!(matches!(
            assemble_contig(&reference, "test", &variants, &mut rng()),
            Err(AssemblyError::Reference(ReferenceError::RangeOutOfBounds { .. }))
        ));
    }
}
