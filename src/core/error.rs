//! Error types for svsim
//!
//! Defines all error types used throughout the library.

use std::path::PathBuf;
use thiserror::Error;

use crate::core::variant::VariantKind;

/// Main error type for svsim operations
#[derive(Debug, Error)]
pub enum SvSimError {
    /// Reference genome errors
    #[error("Reference error: {0}")]
    Reference(#[from] ReferenceError),

    /// Variant set validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Donor assembly errors
    #[error("Assembly error: {0}")]
    Assembly(#[from] AssemblyError),

    /// VCF output errors
    #[error("VCF error: {0}")]
    Vcf(#[from] VcfError),

    /// Genome simulation errors
    #[error("Simulation error: {0}")]
    Simulation(#[from] SimulationError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while loading or accessing reference contigs
#[derive(Debug, Error)]
pub enum ReferenceError {
    /// Contig not present in the reference
    #[error("Unknown contig: {0}")]
    UnknownContig(String),

    /// Requested range is outside the contig
    #[error("Range {start}-{end} is out of bounds for contig {contig} (length {len})")]
    RangeOutOfBounds {
        contig: String,
        start: u64,
        end: u64,
        len: u64,
    },

    /// Sequence data before the first header line
    #[error("Sequence data before first FASTA header at line {line}")]
    MissingHeader { line: usize },

    /// Header does not contain the requested key field
    #[error("FASTA header at line {line} has no field {field_index}: {header}")]
    MissingHeaderField {
        line: usize,
        field_index: usize,
        header: String,
    },

    /// Two records resolve to the same contig key
    #[error("Duplicate contig {contig} at line {line}")]
    DuplicateContig { contig: String, line: usize },

    /// Reference file not found
    #[error("Reference file not found: {0}")]
    FileNotFound(PathBuf),

    /// I/O error during reading
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that reject a variant set before assembly
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Two variants on the same contig share reference bases
    #[error("Variant at contig {contig}, position {pos} overlaps another variant; variants are not allowed to overlap")]
    OverlappingVariants { contig: String, pos: u64 },

    /// Variant span runs past the end of its contig
    #[error("Variant at contig {contig}, position {pos} ends at {end}, past the contig length {len}")]
    VariantOutOfBounds {
        contig: String,
        pos: u64,
        end: u64,
        len: u64,
    },

    /// Variants were validated for a contig missing from the reference
    #[error("Unknown contig: {0}")]
    UnknownContig(String),
}

/// Broken invariants detected while splicing a donor contig
#[derive(Debug, Error)]
pub enum AssemblyError {
    /// Variant run ends before the reference cursor
    #[error("Negative segment on contig {contig}: variant at {pos} precedes cursor {cursor}")]
    NegativeSegment { contig: String, pos: u64, cursor: u64 },

    /// Translocations must be split into a deletion and an insertion first
    #[error("Translocation on contig {contig} at {pos} was not decomposed before assembly")]
    UndecomposedTranslocation { contig: String, pos: u64 },

    /// Reference access failed
    #[error(transparent)]
    Reference(#[from] ReferenceError),
}

/// Errors raised by the VCF writer
#[derive(Debug, Error)]
pub enum VcfError {
    /// Only deletions and insertions have a VCF representation
    #[error("Unsupported variant for VCF output: {0}")]
    UnsupportedVariantForVcf(VariantKind),

    /// CHROM override must be set before the first record
    #[error("CHROM override set after {written} record(s) were written")]
    ChromAfterRecords { written: usize },

    /// Reference access failed
    #[error(transparent)]
    Reference(#[from] ReferenceError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the genome simulator
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Base frequencies must form a distribution
    #[error("Base frequencies must sum to 1, got {0}")]
    InvalidFrequencies(f64),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for svsim operations
pub type Result<T> = std::result::Result<T, SvSimError>;

/// Result type alias for reference operations
pub type ReferenceResult<T> = std::result::Result<T, ReferenceError>;

/// Result type alias for assembly operations
pub type AssemblyResult<T> = std::result::Result<T, AssemblyError>;

/// Result type alias for VCF operations
pub type VcfResult<T> = std::result::Result<T, VcfError>;
