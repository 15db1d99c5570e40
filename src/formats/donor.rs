//! Donor genome creation
//!
//! Reads variants, validates them against the reference, assembles every
//! contig and writes the donor FASTA plus an optional VCF of the applied
//! deletions and insertions.
//!
//! Contigs are independent, so assembly runs on a rayon pool when more
//! than one thread is requested. Each contig gets its own random source
//! derived from the run seed, so output does not depend on the thread
//! count. Nothing is written until every contig has been assembled.

use crate::core::assembler::{assemble_contig, AssembledContig};
use crate::core::index::validate_variant_set;
use crate::core::io::{create_writer, open_reader};
use crate::core::parser::{SkippedRecord, VariantParser, VariantSet};
use crate::core::reference::{FastaOptions, Reference, ReferenceLookup};
use crate::core::Result;
use crate::formats::fasta::write_donor_contig;
use crate::formats::vcf::VcfWriter;
use log::{info, warn};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;
use std::io::{BufRead, Write};
use std::path::Path;

/// Default genome name used in donor headers
pub const DEFAULT_GENOME_NAME: &str = "donor-genome";

/// Options for donor creation
#[derive(Debug, Clone)]
pub struct DonorOptions {
    /// Genome name written into donor headers
    pub genome_name: String,
    /// CHROM value for every VCF record instead of the contig name
    pub chrom: Option<String>,
    /// Seed for random insertions; drawn from the OS when `None`
    pub seed: Option<u64>,
    /// Number of assembly threads (1 = sequential)
    pub threads: usize,
}

impl Default for DonorOptions {
    fn default() -> Self {
        Self {
            genome_name: DEFAULT_GENOME_NAME.to_string(),
            chrom: None,
            seed: None,
            threads: 1,
        }
    }
}

/// Donor creation statistics
#[derive(Debug, Default, Clone)]
pub struct DonorStats {
    /// Contigs written
    pub contigs: usize,
    /// Variant records read (excluding blanks and comments)
    pub records: usize,
    /// Records dropped by the parser
    pub skipped: Vec<SkippedRecord>,
    /// Variants spliced into the donor
    pub applied: usize,
    /// VCF records written
    pub vcf_records: usize,
    /// Applied variants with no VCF representation
    pub vcf_unsupported: usize,
    pub reference_bases: u64,
    pub donor_bases: u64,
    /// Seed used for random insertions
    pub seed: u64,
}

/// Assemble all contigs of the reference in reference order
///
/// `variants` must already be validated.
pub fn assemble_genome<L: ReferenceLookup + Sync + ?Sized>(
    reference: &L,
    variants: &VariantSet,
    seed: u64,
    threads: usize,
) -> Result<Vec<AssembledContig>> {
    let contigs = reference.contig_names();

    let assemble = |(i, contig): (usize, &&str)| -> Result<AssembledContig> {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed.wrapping_add(i as u64));
        Ok(assemble_contig(reference, contig, variants.get(contig), &mut rng)?)
    };

    if threads > 1 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| std::io::Error::other(format!("Failed to create thread pool: {}", e)))?;
        pool.install(|| contigs.par_iter().enumerate().map(assemble).collect())
    } else {
        contigs.iter().enumerate().map(assemble).collect()
    }
}

/// Create donor contigs from an in-memory reference
///
/// # Arguments
/// * `reference` - Reference genome
/// * `variants` - Variant specification records
/// * `output` - Destination for the donor FASTA
/// * `vcf` - Optional destination for the VCF
/// * `options` - Genome name, CHROM override, seed and threads
///
/// # Returns
/// Donor statistics
pub fn create_donor_contigs<R, W, V>(
    reference: &Reference,
    variants: R,
    output: &mut W,
    vcf: Option<V>,
    options: &DonorOptions,
) -> Result<DonorStats>
where
    R: BufRead,
    W: Write + ?Sized,
    V: Write,
{
    let parsed = VariantParser::new(reference).parse_reader(variants)?;
    if !parsed.skipped.is_empty() {
        warn!("Skipped {} of {} variant records", parsed.skipped.len(), parsed.total);
    }

    let validated = validate_variant_set(parsed.variants, reference)?;
    info!("Validated {} variants", validated.len());

    let seed = options.seed.unwrap_or_else(rand::random);
    let assembled = assemble_genome(reference, &validated, seed, options.threads)?;

    let mut stats = DonorStats {
        records: parsed.total,
        skipped: parsed.skipped,
        reference_bases: reference.total_bases(),
        seed,
        ..Default::default()
    };

    for contig in &assembled {
        write_donor_contig(output, contig, &options.genome_name)?;
        stats.contigs += 1;
        stats.applied += contig.applied.len();
        stats.donor_bases += contig.sequence.len() as u64;
    }
    output.flush()?;

    if let Some(out) = vcf {
        let mut writer = VcfWriter::new(out)?;
        if let Some(chrom) = &options.chrom {
            writer.set_chrom(chrom.clone())?;
        }
        for contig in &assembled {
            let sequence = reference.sequence(&contig.name)?;
            for applied in &contig.applied {
                if VcfWriter::<V>::supports(&applied.variant) {
                    writer.write_variant(&contig.name, sequence, applied)?;
                } else {
                    warn!("No VCF representation for {}, not written to VCF", applied.variant);
                    stats.vcf_unsupported += 1;
                }
            }
        }
        stats.vcf_records = writer.records_written();
        writer.flush()?;
    }

    Ok(stats)
}

/// Create donor contigs from files
///
/// Output files are only created once the variant set has been
/// validated and every contig assembled.
pub fn create_donor_files<P: AsRef<Path>>(
    reference_path: P,
    variants_path: P,
    output_path: P,
    vcf_path: Option<P>,
    fasta_options: &FastaOptions,
    options: &DonorOptions,
) -> Result<DonorStats> {
    let reference = Reference::from_fasta_file(reference_path.as_ref(), fasta_options)?;
    info!(
        "Loaded {} contigs ({} bases) from {:?}",
        reference.len(),
        reference.total_bases(),
        reference_path.as_ref()
    );

    let mut donor: Vec<u8> = Vec::new();
    let mut vcf: Option<Vec<u8>> = vcf_path.as_ref().map(|_| Vec::new());
    let stats = create_donor_contigs(
        &reference,
        open_reader(variants_path.as_ref())?,
        &mut donor,
        vcf.as_mut(),
        options,
    )?;

    let mut output = create_writer(output_path.as_ref())?;
    output.write_all(&donor)?;
    output.flush()?;

    if let (Some(path), Some(bytes)) = (vcf_path, vcf) {
        let mut out = create_writer(path.as_ref())?;
        out.write_all(&bytes)?;
        out.flush()?;
    }

    Ok(stats)
}
