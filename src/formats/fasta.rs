//! FASTA output
//!
//! Donor contigs and simulated genomes are written with sequence lines
//! wrapped at [`LINE_WIDTH`] characters.

use crate::core::assembler::AssembledContig;
use crate::core::dna::BaseSampler;
use crate::core::io::write_wrapped;
use crate::core::SimulationError;
use rand::Rng;
use std::io::{self, Write};

/// Sequence line width
pub const LINE_WIDTH: usize = 80;

/// Header name of simulated genomes
pub const SIMULATED_GENOME_NAME: &str = "normal-genome";

/// Header line for a donor contig (without the trailing newline)
///
/// ```
/// use svsim::formats::fasta::donor_header;
///
/// assert_eq!(
///     donor_header("chr1", "donor-genome", 1000),
///     ">chr1|dna:chromosome|chromosome:donor-genome:chr1:1:1000:1|DONOR"
/// );
/// ```
pub fn donor_header(contig: &str, genome_name: &str, length: u64) -> String {
    format!(
        ">{0}|dna:chromosome|chromosome:{1}:{0}:1:{2}:1|DONOR",
        contig, genome_name, length
    )
}

/// Write one donor contig record
///
/// The header carries the reference contig length.
pub fn write_donor_contig<W: Write + ?Sized>(
    out: &mut W,
    contig: &AssembledContig,
    genome_name: &str,
) -> io::Result<()> {
    writeln!(out, "{}", donor_header(&contig.name, genome_name, contig.reference_len))?;
    write_wrapped(out, &contig.sequence, LINE_WIDTH)
}

/// Write a random genome of `length` bases as a single FASTA record
///
/// Bases are drawn with the given A, C, G, T frequencies, which must sum
/// to 1 (within [`BaseSampler::TOLERANCE`]).
pub fn simulate_genome<W, R>(
    out: &mut W,
    length: u64,
    frequencies: [f64; 4],
    rng: &mut R,
) -> Result<(), SimulationError>
where
    W: Write + ?Sized,
    R: Rng + ?Sized,
{
    let sampler = BaseSampler::new(frequencies).map_err(SimulationError::InvalidFrequencies)?;

    writeln!(out, ">{}", SIMULATED_GENOME_NAME)?;
    let mut line = Vec::with_capacity(LINE_WIDTH + 1);
    let mut remaining = length;
    while remaining > 0 {
        let n = remaining.min(LINE_WIDTH as u64);
        line.clear();
        line.extend((0..n).map(|_| sampler.sample(rng)));
        line.push(b'\n');
        out.write_all(&line)?;
        remaining -= n;
    }
    Ok(())
}
