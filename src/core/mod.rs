//! Core structural variant functionality
//!
//! This module contains the reference model, the variant model and parser,
//! overlap validation and donor contig assembly.

pub mod assembler;
pub mod dna;
mod error;
pub mod index;
pub mod io;
pub mod parser;
pub mod reference;
pub mod variant;

pub use assembler::{assemble_contig, plan_segments, AssembledContig, Segment};
pub use error::{
    AssemblyError, AssemblyResult, ReferenceError, ReferenceResult, Result, SimulationError,
    SvSimError, ValidationError, VcfError, VcfResult,
};
pub use index::{check_variations, validate_variant_set, VariantIndex, VariantInterval};
pub use io::{detect_compression, CompressionFormat, DEFAULT_BUFFER_SIZE, MMAP_THRESHOLD};
pub use parser::{ParsedVariants, SkippedRecord, VariantParseError, VariantParser, VariantSet};
pub use reference::{Contig, FastaOptions, Reference, ReferenceLookup};
pub use variant::{AppliedVariant, Source, Variant, VariantKind, DEFAULT_COPY_COUNT};
