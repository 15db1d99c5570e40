//! svsim CLI entry point
//!
//! Creates donor genomes from a reference and a variant file, and
//! simulates random reference genomes.

use anyhow::Context;
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use svsim::core::io::{create_writer, open_reader, DEFAULT_BUFFER_SIZE};
use svsim::{
    create_donor_contigs, create_donor_files, simulate_genome, DonorOptions, DonorStats,
    FastaOptions, Reference,
};

#[derive(Parser)]
#[command(name = "svsim")]
#[command(about = "Structural variant simulation on reference genomes")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply structural variants to a reference and write the donor genome
    Donor {
        /// Reference genome in FASTA format (plain, gzip or bzip2)
        reference: PathBuf,
        /// Variant file: `contig type pos length [extra...]` per line
        variations: PathBuf,
        /// Output FASTA file (optional, stdout if not specified)
        output: Option<PathBuf>,
        /// Delimiter splitting FASTA header fields
        #[arg(long, default_value = "|")]
        delimiter: String,
        /// Header field used as the contig name
        #[arg(long = "field-index", default_value = "0")]
        field_index: usize,
        /// Genome name written into donor headers
        #[arg(long = "genome-name", default_value = svsim::formats::donor::DEFAULT_GENOME_NAME)]
        genome_name: String,
        /// CHROM value for every VCF record
        #[arg(long)]
        chrom: Option<String>,
        /// Write applied deletions and insertions to this VCF file
        #[arg(long)]
        vcf: Option<PathBuf>,
        /// Seed for random insertions (random if not specified)
        #[arg(long)]
        seed: Option<u64>,
        /// Number of threads
        #[arg(short = 't', long, default_value = "1")]
        threads: usize,
    },
    /// Simulate a random reference genome
    Genome {
        /// Number of bases
        length: u64,
        /// Output FASTA file (optional, stdout if not specified)
        output: Option<PathBuf>,
        /// Base frequencies for A, C, G and T
        #[arg(
            long,
            num_args = 4,
            value_names = ["A", "C", "G", "T"],
            default_values_t = [0.25, 0.25, 0.25, 0.25]
        )]
        frequencies: Vec<f64>,
        /// Random seed (random if not specified)
        #[arg(long)]
        seed: Option<u64>,
    },
}

/// Donor run writing FASTA to stdout; the VCF is kept in memory until
/// every contig has been assembled
fn donor_to_stdout(
    reference: &Path,
    variations: &Path,
    vcf_path: Option<&Path>,
    fasta_options: &FastaOptions,
    options: &DonorOptions,
) -> anyhow::Result<DonorStats> {
    let reference = Reference::from_fasta_file(reference, fasta_options)
        .with_context(|| format!("Failed to load reference {:?}", reference))?;
    let variants =
        open_reader(variations).with_context(|| format!("Failed to open {:?}", variations))?;

    let stdout = io::stdout();
    let mut out = BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, stdout.lock());
    let mut vcf: Option<Vec<u8>> = vcf_path.map(|_| Vec::new());
    let stats = create_donor_contigs(&reference, variants, &mut out, vcf.as_mut(), options)?;
    out.flush()?;

    if let (Some(path), Some(bytes)) = (vcf_path, vcf) {
        let mut writer = create_writer(path)?;
        writer.write_all(&bytes)?;
        writer.flush()?;
    }
    Ok(stats)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let start = Instant::now();

    match cli.command {
        Commands::Donor {
            reference,
            variations,
            output,
            delimiter,
            field_index,
            genome_name,
            chrom,
            vcf,
            seed,
            threads,
        } => {
            let fasta_options = FastaOptions { delimiter, field_index };
            let options = DonorOptions {
                genome_name,
                chrom,
                seed,
                threads,
            };

            eprintln!("Creating donor genome: {:?} + {:?}", reference, variations);
            let stats = match &output {
                Some(path) => create_donor_files(
                    &reference,
                    &variations,
                    path,
                    vcf.as_ref(),
                    &fasta_options,
                    &options,
                )?,
                None => donor_to_stdout(
                    &reference,
                    &variations,
                    vcf.as_deref(),
                    &fasta_options,
                    &options,
                )?,
            };

            eprintln!("\n=== Donor Statistics ===");
            eprintln!("Contigs:         {}", stats.contigs);
            eprintln!("Variant records: {}", stats.records);
            eprintln!("Skipped:         {}", stats.skipped.len());
            eprintln!("Applied:         {}", stats.applied);
            if vcf.is_some() {
                eprintln!("VCF records:     {}", stats.vcf_records);
                eprintln!("  - No VCF form: {}", stats.vcf_unsupported);
            }
            eprintln!("Reference bases: {}", stats.reference_bases);
            eprintln!("Donor bases:     {}", stats.donor_bases);
            eprintln!("Seed:            {}", stats.seed);
            eprintln!("Time elapsed:    {:.2}s", start.elapsed().as_secs_f64());
        }

        Commands::Genome {
            length,
            output,
            frequencies,
            seed,
        } => {
            let frequencies: [f64; 4] = frequencies
                .try_into()
                .map_err(|f: Vec<f64>| {
                    anyhow::anyhow!("Expected 4 base frequencies, got {}", f.len())
                })?;
            let seed = seed.unwrap_or_else(rand::random);
            let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);

            match &output {
                Some(path) => {
                    eprintln!("Simulating genome: {} bases -> {:?}", length, path);
                    let mut out = create_writer(path)?;
                    simulate_genome(&mut out, length, frequencies, &mut rng)?;
                    out.flush()?;
                }
                None => {
                    let stdout = io::stdout();
                    let mut out = BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, stdout.lock());
                    simulate_genome(&mut out, length, frequencies, &mut rng)?;
                    out.flush()?;
                }
            }

            eprintln!("\n=== Simulation Statistics ===");
            eprintln!("Bases:           {}", length);
            let [a, c, g, t] = frequencies;
            eprintln!("Frequencies:     A={} C={} G={} T={}", a, c, g, t);
            eprintln!("Seed:            {}", seed);
            eprintln!("Time elapsed:    {:.2}s", start.elapsed().as_secs_f64());
        }
    }

    Ok(())
}
