//! svsim - Structural variant simulation
//!
//! Applies insertions, deletions, duplications, transversions and
//! translocations to a reference genome, producing a donor genome and a
//! VCF describing the applied deletions and insertions.
//!
//! # Features
//!
//! - Overlap validation with an interval index before any output is written
//! - Parallel per-contig assembly with rayon, deterministic for a given seed
//! - Compressed inputs (gzip, bzip2) and memory-mapped large references
//!
//! # Example
//!
//! ```
//! use rand::SeedableRng;
//! use rand_xoshiro::Xoshiro256PlusPlus;
//! use svsim::{assemble_contig, Reference, Variant};
//!
//! let reference = Reference::from_contigs([("chr1", "123456789AB")]).unwrap();
//! let variants = [Variant::deletion("chr1", 1, 2)];
//! let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
//!
//! let donor = assemble_contig(&reference, "chr1", &variants, &mut rng).unwrap();
//! assert_eq!(donor.sequence, b"1256789AB");
//! ```

pub mod core;
pub mod formats;

// Re-export commonly used types
pub use crate::core::{
    assemble_contig, check_variations, validate_variant_set, AppliedVariant, AssembledContig,
    AssemblyError, FastaOptions, ParsedVariants, Reference, ReferenceError, ReferenceLookup, Result,
    SimulationError, SvSimError, ValidationError, Variant, VariantKind, VariantParseError,
    VariantParser, VariantSet, VcfError,
};
pub use crate::formats::{
    create_donor_contigs, create_donor_files, simulate_genome, DonorOptions, DonorStats, VcfWriter,
};
