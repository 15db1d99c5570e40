//! Output formats
//!
//! Donor FASTA, simulated genomes and VCF records for applied variants,
//! plus the end-to-end donor pipeline.

pub mod donor;
pub mod fasta;
pub mod vcf;

pub use donor::{
    assemble_genome, create_donor_contigs, create_donor_files, DonorOptions, DonorStats,
};
pub use fasta::{donor_header, simulate_genome, write_donor_contig, LINE_WIDTH};
pub use vcf::{SvType, VcfRecord, VcfWriter, VCF_HEADER};
