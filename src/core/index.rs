//! Overlap validation for variant sets
//!
//! Uses rust-lapper for O(log n + k) interval queries. A variant set is
//! valid when no two variants on a contig share a span, no variant
//! starts inside bases another one consumed, and every variant (and
//! every copied source span) fits inside its contig.

use crate::core::error::ValidationError;
use crate::core::parser::VariantSet;
use crate::core::reference::ReferenceLookup;
use crate::core::variant::Variant;
use log::debug;
use rust_lapper::{Interval, Lapper};

/// Type alias for variant intervals; the value is the variant's list index
pub type VariantInterval = Interval<u64, usize>;

/// Interval index over one contig's variants
pub struct VariantIndex {
    lapper: Lapper<u64, usize>,
}

impl VariantIndex {
    /// Build the index from variant spans
    pub fn new(variants: &[Variant]) -> Self {
        let intervals: Vec<VariantInterval> = variants
            .iter()
            .enumerate()
            .map(|(i, variant)| {
                let (start, stop) = variant.span();
                Interval { start, stop, val: i }
            })
            .collect();

        Self {
            lapper: Lapper::new(intervals),
        }
    }

    /// Indices of variants whose spans intersect `[start, stop)`
    pub fn query(&self, start: u64, stop: u64) -> Vec<usize> {
        self.lapper.find(start, stop).map(|iv| iv.val).collect()
    }

    /// Number of indexed variants
    pub fn len(&self) -> usize {
        self.lapper.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lapper.is_empty()
    }
}

/// Check one contig's variants and return them sorted by position
///
/// Fails with [`ValidationError::OverlappingVariants`] naming the first
/// variant (in input order) whose span meets another one. A deletion
/// whose last deleted base is the first base of a touching duplication
/// or transversion is reported the same way, at the deletion.
///
/// Every variant must leave the reference cursor inside the contig:
/// `resume_at <= contig_len`. Without a `contig_len` only positions that
/// overflow `u64` are rejected.
pub fn check_variations(
    contig: &str,
    contig_len: Option<u64>,
    mut variants: Vec<Variant>,
) -> Result<Vec<Variant>, ValidationError> {
    let len = contig_len.unwrap_or(u64::MAX);
    for variant in &variants {
        match variant.resume_at() {
            Some(end) if end <= len => {}
            end => {
                return Err(ValidationError::VariantOutOfBounds {
                    contig: contig.to_string(),
                    pos: variant.pos(),
                    end: end.unwrap_or(u64::MAX),
                    len,
                });
            }
        }
    }

    let index = VariantIndex::new(&variants);
    for variant in &variants {
        let (start, stop) = variant.span();
        if index.query(start, stop).len() > 1 {
            return Err(ValidationError::OverlappingVariants {
                contig: contig.to_string(),
                pos: variant.pos(),
            });
        }
    }

    // Stable: equal positions keep file order
    variants.sort_by_key(|v| v.pos());

    for pair in variants.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        if let (Some(cursor), Some(run_end)) = (prev.resume_at(), next.run_end()) {
            if run_end < cursor {
                return Err(ValidationError::OverlappingVariants {
                    contig: contig.to_string(),
                    pos: prev.pos(),
                });
            }
        }
    }
    debug!("Validated {} variants on {}", variants.len(), contig);
    Ok(variants)
}

/// Validate every contig of a variant set against the reference
///
/// Contigs are checked in reference order so the reported error is
/// deterministic. Sourced insertions must copy a span that lies inside
/// their source contig.
pub fn validate_variant_set<L: ReferenceLookup + ?Sized>(
    variants: VariantSet,
    reference: &L,
) -> Result<VariantSet, ValidationError> {
    let mut remaining = variants.into_inner();
    let mut validated = std::collections::HashMap::with_capacity(remaining.len());

    for contig in reference.contig_names() {
        if let Some(list) = remaining.remove(contig) {
            for variant in &list {
                check_source_span(variant, reference)?;
            }
            let sorted = check_variations(contig, reference.contig_len(contig), list)?;
            validated.insert(contig.to_string(), sorted);
        }
    }

    if let Some(contig) = remaining.keys().min() {
        return Err(ValidationError::UnknownContig(contig.clone()));
    }

    Ok(VariantSet::from_inner(validated))
}

fn check_source_span<L: ReferenceLookup + ?Sized>(
    variant: &Variant,
    reference: &L,
) -> Result<(), ValidationError> {
    let Some((source, loc, length)) = variant.source_span() else {
        return Ok(());
    };
    let len = reference
        .contig_len(source)
        .ok_or_else(|| ValidationError::UnknownContig(source.to_string()))?;
    match loc.checked_add(length) {
        Some(end) if end <= len => Ok(()),
        end => Err(ValidationError::VariantOutOfBounds {
            contig: source.to_string(),
            pos: loc,
            end: end.unwrap_or(u64::MAX),
            len,
        }),
    }
}
