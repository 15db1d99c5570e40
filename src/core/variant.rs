//! Structural variant model
//!
//! Every variant records a 0-based position (`pos`) and a length.
//! Insertions and deletions treat `pos` as the anchor base *before* the
//! event. Duplications and transversions rework the span starting at
//! `pos` itself. The assembler copies the reference up to
//! [`Variant::run_end`], emits [`Variant::sequence`], then resumes at
//! [`Variant::resume_at`].

use crate::core::dna;
use crate::core::error::ReferenceResult;
use crate::core::reference::ReferenceLookup;
use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// Default number of copies for a duplication
pub const DEFAULT_COPY_COUNT: usize = 2;

/// Kind of structural variant, as named in variant files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariantKind {
    Insertion,
    Deletion,
    Duplication,
    Transversion,
    Translocation,
}

impl VariantKind {
    /// Name used in variant files
    pub fn as_str(&self) -> &'static str {
        match self {
            VariantKind::Insertion => "insertion",
            VariantKind::Deletion => "deletion",
            VariantKind::Duplication => "duplication",
            VariantKind::Transversion => "transversion",
            VariantKind::Translocation => "translocation",
        }
    }
}

impl fmt::Display for VariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VariantKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "insertion" => Ok(VariantKind::Insertion),
            "deletion" => Ok(VariantKind::Deletion),
            "duplication" => Ok(VariantKind::Duplication),
            "transversion" => Ok(VariantKind::Transversion),
            "translocation" => Ok(VariantKind::Translocation),
            other => Err(other.to_string()),
        }
    }
}

/// Where an inserted sequence comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    /// Contig the material is copied from
    pub contig: String,
    /// 0-based start of the copied span, `None` for random bases
    pub loc: Option<u64>,
}

/// A structural variant on one contig
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Variant {
    /// `length` bases inserted after `pos`
    Insertion {
        contig: String,
        pos: u64,
        length: u64,
        source: Source,
    },
    /// `length` bases removed after `pos`
    Deletion { contig: String, pos: u64, length: u64 },
    /// Span at `pos` present `copy_count` times
    Duplication {
        contig: String,
        pos: u64,
        length: u64,
        copy_count: usize,
    },
    /// Span at `pos` with its byte order reversed
    Transversion { contig: String, pos: u64, length: u64 },
    /// Span moved from `source` to after `pos`
    Translocation {
        contig: String,
        pos: u64,
        length: u64,
        source: Source,
    },
}

impl Variant {
    /// Random insertion of `length` bases
    pub fn insertion(contig: impl Into<String>, pos: u64, length: u64) -> Self {
        let contig = contig.into();
        Variant::Insertion {
            source: Source {
                contig: contig.clone(),
                loc: None,
            },
            contig,
            pos,
            length,
        }
    }

    /// Insertion copying `length` bases from `from_contig` at `from_loc`
    pub fn insertion_from(
        contig: impl Into<String>,
        pos: u64,
        length: u64,
        from_contig: impl Into<String>,
        from_loc: u64,
    ) -> Self {
        Variant::Insertion {
            contig: contig.into(),
            pos,
            length,
            source: Source {
                contig: from_contig.into(),
                loc: Some(from_loc),
            },
        }
    }

    pub fn deletion(contig: impl Into<String>, pos: u64, length: u64) -> Self {
        Variant::Deletion {
            contig: contig.into(),
            pos,
            length,
        }
    }

    pub fn duplication(
        contig: impl Into<String>,
        pos: u64,
        length: u64,
        copy_count: usize,
    ) -> Self {
        Variant::Duplication {
            contig: contig.into(),
            pos,
            length,
            copy_count,
        }
    }

    pub fn transversion(contig: impl Into<String>, pos: u64, length: u64) -> Self {
        Variant::Transversion {
            contig: contig.into(),
            pos,
            length,
        }
    }

    pub fn translocation(
        contig: impl Into<String>,
        pos: u64,
        length: u64,
        from_contig: impl Into<String>,
        from_loc: u64,
    ) -> Self {
        Variant::Translocation {
            contig: contig.into(),
            pos,
            length,
            source: Source {
                contig: from_contig.into(),
                loc: Some(from_loc),
            },
        }
    }

    pub fn kind(&self) -> VariantKind {
        match self {
            Variant::Insertion { .. } => VariantKind::Insertion,
            Variant::Deletion { .. } => VariantKind::Deletion,
            Variant::Duplication { .. } => VariantKind::Duplication,
            Variant::Transversion { .. } => VariantKind::Transversion,
            Variant::Translocation { .. } => VariantKind::Translocation,
        }
    }

    pub fn contig(&self) -> &str {
        match self {
            Variant::Insertion { contig, .. }
            | Variant::Deletion { contig, .. }
            | Variant::Duplication { contig, .. }
            | Variant::Transversion { contig, .. }
            | Variant::Translocation { contig, .. } => contig,
        }
    }

    pub fn pos(&self) -> u64 {
        match self {
            Variant::Insertion { pos, .. }
            | Variant::Deletion { pos, .. }
            | Variant::Duplication { pos, .. }
            | Variant::Transversion { pos, .. }
            | Variant::Translocation { pos, .. } => *pos,
        }
    }

    pub fn length(&self) -> u64 {
        match self {
            Variant::Insertion { length, .. }
            | Variant::Deletion { length, .. }
            | Variant::Duplication { length, .. }
            | Variant::Transversion { length, .. }
            | Variant::Translocation { length, .. } => *length,
        }
    }

    /// Reference bases consumed when stepping over this variant
    pub fn delta(&self) -> u64 {
        match self {
            Variant::Insertion { .. } | Variant::Translocation { .. } => 0,
            Variant::Deletion { length, .. }
            | Variant::Duplication { length, .. }
            | Variant::Transversion { length, .. } => *length,
        }
    }

    /// End of the unchanged reference run copied before this variant
    ///
    /// `pos + 1` for anchored kinds, `pos` for duplications and
    /// transversions. `None` on overflow.
    pub fn run_end(&self) -> Option<u64> {
        match self {
            Variant::Duplication { pos, .. } | Variant::Transversion { pos, .. } => Some(*pos),
            _ => self.pos().checked_add(1),
        }
    }

    /// Reference position the cursor moves to after this variant
    ///
    /// `None` when the position does not fit in a `u64`.
    pub fn resume_at(&self) -> Option<u64> {
        self.run_end()?.checked_add(self.delta())
    }

    /// Half-open span used for overlap checks
    ///
    /// Insertions only claim their anchor base. Every span is at least
    /// one base wide so zero-length events still collide.
    pub fn span(&self) -> (u64, u64) {
        let pos = self.pos();
        match self {
            Variant::Insertion { .. } | Variant::Translocation { .. } => {
                (pos, pos.saturating_add(1))
            }
            _ => (pos, pos.saturating_add(self.length().max(1))),
        }
    }

    /// Reference span a sourced insertion copies from, as
    /// `(contig, start, length)`
    pub fn source_span(&self) -> Option<(&str, u64, u64)> {
        match self {
            Variant::Insertion { length, source, .. }
            | Variant::Translocation { length, source, .. } => {
                source.loc.map(|loc| (source.contig.as_str(), loc, *length))
            }
            _ => None,
        }
    }

    /// Bytes this variant places in the donor
    pub fn sequence<L, R>(&self, reference: &L, rng: &mut R) -> ReferenceResult<Vec<u8>>
    where
        L: ReferenceLookup + ?Sized,
        R: Rng + ?Sized,
    {
        match self {
            Variant::Insertion { length, source, .. }
            | Variant::Translocation { length, source, .. } => match source.loc {
                Some(loc) => Ok(reference.fetch_len(&source.contig, loc, *length)?.to_vec()),
                None => Ok(dna::random_bases(*length as usize, rng)),
            },
            Variant::Deletion { .. } => Ok(Vec::new()),
            Variant::Duplication {
                contig,
                pos,
                length,
                copy_count,
            } => {
                let span = reference.fetch_len(contig, *pos, *length)?;
                Ok(dna::repeated(span, *copy_count))
            }
            Variant::Transversion { contig, pos, length } => {
                let span = reference.fetch_len(contig, *pos, *length)?;
                Ok(dna::reversed(span))
            }
        }
    }

    /// Split a translocation into the deletion at its source and the
    /// insertion at its destination
    ///
    /// Returns `None` for every other kind.
    pub fn decompose(&self) -> Option<(Variant, Variant)> {
        match self {
            Variant::Translocation {
                contig,
                pos,
                length,
                source,
            } => {
                let from_loc = source.loc?;
                let from_contig = source.contig.clone();
                Some((
                    Variant::deletion(from_contig.clone(), from_loc, *length),
                    Variant::insertion_from(contig.clone(), *pos, *length, from_contig, from_loc),
                ))
            }
            _ => None,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}:{}, length={}", self.kind(), self.contig(), self.pos(), self.length())?;
        match self {
            Variant::Insertion { source, .. } | Variant::Translocation { source, .. } => {
                match source.loc {
                    Some(loc) => write!(f, ", from={}:{})", source.contig, loc),
                    None => write!(f, ", from=random)"),
                }
            }
            Variant::Duplication { copy_count, .. } => write!(f, ", copies={})", copy_count),
            _ => write!(f, ")"),
        }
    }
}

/// A variant together with the exact bytes it contributed to the donor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedVariant {
    pub variant: Variant,
    pub sequence: Vec<u8>,
}

impl AppliedVariant {
    /// Materialize a variant against the reference
    pub fn materialize<L, R>(variant: &Variant, reference: &L, rng: &mut R) -> ReferenceResult<Self>
    where
        L: ReferenceLookup + ?Sized,
        R: Rng + ?Sized,
    {
        Ok(Self {
            sequence: variant.sequence(reference, rng)?,
            variant: variant.clone(),
        })
    }
}
