//! Variant file parsing
//!
//! # Variant File Format
//!
//! ```text
//! contig type pos length [extra...]
//! chr1 insertion 100 50
//! chr1 insertion 300 20 chr2 1000
//! chr1 deletion 500 10
//! chr1 duplication 700 30 3
//! chr1 transversion 900 40
//! chr2 translocation 5000 100 chr1 2000
//! ```
//!
//! - `pos` is the 0-based position of the base before the event
//! - duplication: optional copy count (default 2)
//! - insertion: optional `from_contig from_loc`, random bases otherwise
//! - translocation: required `from_contig from_loc`; becomes a deletion
//!   at the source plus an insertion at the destination
//!
//! Malformed records are skipped with a warning; the rest of the file is
//! still used.

use crate::core::reference::ReferenceLookup;
use crate::core::variant::{Variant, VariantKind, DEFAULT_COPY_COUNT};
use log::warn;
use std::collections::HashMap;
use std::io::{self, BufRead};
use std::path::Path;

/// Why a variant record was skipped
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VariantParseError {
    #[error("too few fields: expected at least {expected}, found {found}")]
    TooFewFields { expected: usize, found: usize },

    #[error("contig {0} does not exist in the reference")]
    UnknownContig(String),

    #[error("unknown variation type: {0}")]
    UnknownType(String),

    #[error("invalid number in field {field}: {value}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("copy count must be at least 1")]
    InvalidCopyCount,

    #[error("translocation must have from_contig and from_loc")]
    IncompleteTranslocation,
}

/// A record dropped by the parser
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    /// 1-based line number
    pub line: usize,
    pub reason: VariantParseError,
}

/// Variants grouped by contig
///
/// Lists keep file order until [`crate::core::index::validate_variant_set`]
/// sorts them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantSet {
    by_contig: HashMap<String, Vec<Variant>>,
}

impl VariantSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a variant to its contig's list
    pub fn push(&mut self, variant: Variant) {
        self.by_contig
            .entry(variant.contig().to_string())
            .or_default()
            .push(variant);
    }

    /// Variants of one contig (empty if none)
    pub fn get(&self, contig: &str) -> &[Variant] {
        self.by_contig.get(contig).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Contigs that carry at least one variant
    pub fn contigs(&self) -> impl Iterator<Item = &str> {
        self.by_contig.keys().map(|s| s.as_str())
    }

    /// Total number of variants
    pub fn len(&self) -> usize {
        self.by_contig.values().map(|v| v.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn into_inner(self) -> HashMap<String, Vec<Variant>> {
        self.by_contig
    }

    pub(crate) fn from_inner(by_contig: HashMap<String, Vec<Variant>>) -> Self {
        Self { by_contig }
    }
}

impl FromIterator<Variant> for VariantSet {
    fn from_iter<I: IntoIterator<Item = Variant>>(iter: I) -> Self {
        let mut set = VariantSet::new();
        for variant in iter {
            set.push(variant);
        }
        set
    }
}

/// Result of parsing a variant file
#[derive(Debug, Default)]
pub struct ParsedVariants {
    pub variants: VariantSet,
    pub skipped: Vec<SkippedRecord>,
    /// Number of non-empty, non-comment records seen
    pub total: usize,
}

/// Parser that checks records against a reference
pub struct VariantParser<'a, L: ReferenceLookup + ?Sized> {
    reference: &'a L,
}

impl<'a, L: ReferenceLookup + ?Sized> VariantParser<'a, L> {
    pub fn new(reference: &'a L) -> Self {
        Self { reference }
    }

    /// Parse a variant file from a path (plain, gzip or bzip2)
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> io::Result<ParsedVariants> {
        let reader = crate::core::io::open_reader(path.as_ref())?;
        self.parse_reader(reader)
    }

    /// Parse variant records from a reader
    pub fn parse_reader<R: BufRead>(&self, reader: R) -> io::Result<ParsedVariants> {
        let mut parsed = ParsedVariants::default();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let line_number = index + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            parsed.total += 1;
            match self.parse_line(trimmed) {
                Ok(variants) => {
                    for variant in variants {
                        parsed.variants.push(variant);
                    }
                }
                Err(reason) => {
                    warn!("Skipping variant on line {}: {}", line_number, reason);
                    parsed.skipped.push(SkippedRecord {
                        line: line_number,
                        reason,
                    });
                }
            }
        }

        Ok(parsed)
    }

    /// Parse variant records from bytes (for testing)
    pub fn parse_bytes(&self, data: &[u8]) -> io::Result<ParsedVariants> {
        self.parse_reader(data)
    }

    /// Parse one record into the variants it produces
    ///
    /// Translocations produce two variants, everything else one.
    pub fn parse_line(&self, line: &str) -> Result<Vec<Variant>, VariantParseError> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 4 {
            return Err(VariantParseError::TooFewFields {
                expected: 4,
                found: fields.len(),
            });
        }

        let contig = fields[0];
        self.require_contig(contig)?;

        let kind: VariantKind = fields[1]
            .parse()
            .map_err(VariantParseError::UnknownType)?;
        let pos = parse_number("pos", fields[2])?;
        let length = parse_number("length", fields[3])?;

        let variant = match kind {
            VariantKind::Insertion => {
                if fields.len() > 5 {
                    let from_contig = fields[4];
                    self.require_contig(from_contig)?;
                    let from_loc = parse_number("from_loc", fields[5])?;
                    Variant::insertion_from(contig, pos, length, from_contig, from_loc)
                } else {
                    Variant::insertion(contig, pos, length)
                }
            }
            VariantKind::Deletion => Variant::deletion(contig, pos, length),
            VariantKind::Duplication => {
                let copy_count = match fields.get(4) {
                    Some(value) => parse_number("copy_count", value)? as usize,
                    None => DEFAULT_COPY_COUNT,
                };
                if copy_count == 0 {
                    return Err(VariantParseError::InvalidCopyCount);
                }
                Variant::duplication(contig, pos, length, copy_count)
            }
            VariantKind::Transversion => Variant::transversion(contig, pos, length),
            VariantKind::Translocation => {
                if fields.len() < 6 {
                    return Err(VariantParseError::IncompleteTranslocation);
                }
                let from_contig = fields[4];
                self.require_contig(from_contig)?;
                let from_loc = parse_number("from_loc", fields[5])?;
                let translocation =
                    Variant::translocation(contig, pos, length, from_contig, from_loc);
                return match translocation.decompose() {
                    Some((deletion, insertion)) => Ok(vec![deletion, insertion]),
                    None => Err(VariantParseError::IncompleteTranslocation),
                };
            }
        };

        Ok(vec![variant])
    }

    fn require_contig(&self, contig: &str) -> Result<(), VariantParseError> {
        if self.reference.has_contig(contig) {
            Ok(())
        } else {
            Err(VariantParseError::UnknownContig(contig.to_string()))
        }
    }
}

fn parse_number(field: &'static str, value: &str) -> Result<u64, VariantParseError> {
    value.parse().map_err(|_| VariantParseError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}
