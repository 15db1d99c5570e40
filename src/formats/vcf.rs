//! VCF output for applied variants
//!
//! Deletions and insertions are written with the base before the event
//! included in both REF and ALT, as VCF requires for indels.

use crate::core::variant::{AppliedVariant, Variant};
use crate::core::{ReferenceError, VcfError, VcfResult};
use std::fmt;
use std::io::Write;

/// Header written once when the file is opened
pub const VCF_HEADER: &str = "\
#fileformat=VCFv4.1
##INFO=<ID=SVLEN,Number=1,Type=Integer,Description=\"Difference in length between REF and ALT alleles\">
##INFO=<ID=SVTYPE,Number=1,Type=String,Description=\"Type of structural variant\">
##INFO=<ID=END,Number=1,Type=Integer,Description=\"End position of the variant described in this record\">
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO
";

/// Structural variant type reported in INFO
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SvType {
    Del,
    Ins,
}

impl SvType {
    /// INFO value (`DEL`/`INS`)
    pub fn as_str(&self) -> &'static str {
        match self {
            SvType::Del => "DEL",
            SvType::Ins => "INS",
        }
    }

    /// Tag used in record IDs (`del`/`ins`)
    pub fn id_tag(&self) -> &'static str {
        match self {
            SvType::Del => "del",
            SvType::Ins => "ins",
        }
    }
}

/// VCF record representation for output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VcfRecord {
    pub chrom: String,
    /// 1-based position of the anchor base
    pub pos: u64,
    pub id: String,
    pub ref_allele: String,
    pub alt_allele: String,
    pub sv_type: SvType,
    pub sv_len: i64,
    pub end: u64,
}

impl VcfRecord {
    /// INFO column
    pub fn info(&self) -> String {
        format!("SVTYPE={};SVLEN={};END={}", self.sv_type.as_str(), self.sv_len, self.end)
    }
}

impl fmt::Display for VcfRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t.\t.\t{}",
            self.chrom,
            self.pos,
            self.id,
            self.ref_allele,
            self.alt_allele,
            self.info()
        )
    }
}

/// Writer for applied structural variants
///
/// Records are written in the order they are presented; each gets the
/// next serial number for its ID.
pub struct VcfWriter<W: Write> {
    out: W,
    serial: usize,
    chrom: Option<String>,
}

impl<W: Write> VcfWriter<W> {
    /// Open a writer and emit the header
    pub fn new(mut out: W) -> VcfResult<Self> {
        out.write_all(VCF_HEADER.as_bytes())?;
        Ok(Self {
            out,
            serial: 0,
            chrom: None,
        })
    }

    /// Use `chrom` in the CHROM column instead of contig names
    ///
    /// Must be called before the first record is written.
    pub fn set_chrom(&mut self, chrom: impl Into<String>) -> VcfResult<()> {
        if self.serial > 0 {
            return Err(VcfError::ChromAfterRecords { written: self.serial });
        }
        self.chrom = Some(chrom.into());
        Ok(())
    }

    /// Whether a variant kind has a VCF representation
    pub fn supports(variant: &Variant) -> bool {
        matches!(variant, Variant::Deletion { .. } | Variant::Insertion { .. })
    }

    /// Build the record for a variant without writing it
    ///
    /// `reference` is the full sequence of `contig`.
    pub fn record(
        &self,
        contig: &str,
        reference: &[u8],
        applied: &AppliedVariant,
    ) -> VcfResult<VcfRecord> {
        let chrom = self.chrom.clone().unwrap_or_else(|| contig.to_string());
        build_record(chrom, contig, reference, applied, self.serial)
    }

    /// Write one applied variant
    pub fn write_variant(
        &mut self,
        contig: &str,
        reference: &[u8],
        applied: &AppliedVariant,
    ) -> VcfResult<VcfRecord> {
        let record = self.record(contig, reference, applied)?;
        writeln!(self.out, "{}", record)?;
        self.serial += 1;
        Ok(record)
    }

    /// Write a contig's applied variants in order
    pub fn write(
        &mut self,
        contig: &str,
        reference: &[u8],
        applied: &[AppliedVariant],
    ) -> VcfResult<usize> {
        for variant in applied {
            self.write_variant(contig, reference, variant)?;
        }
        Ok(applied.len())
    }

    /// Number of records written so far
    pub fn records_written(&self) -> usize {
        self.serial
    }

    pub fn flush(&mut self) -> VcfResult<()> {
        self.out.flush()?;
        Ok(())
    }

    /// Flush and return the underlying writer
    pub fn into_inner(mut self) -> VcfResult<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

fn build_record(
    chrom: String,
    contig: &str,
    reference: &[u8],
    applied: &AppliedVariant,
    serial: usize,
) -> VcfResult<VcfRecord> {
    let variant = &applied.variant;
    let pos = variant.pos();
    let length = variant.length();
    let end = pos.saturating_add(length).saturating_add(1);

    let (sv_type, ref_allele, alt_allele, sv_len) = match variant {
        Variant::Deletion { .. } => {
            let ref_allele = slice(contig, reference, pos, end)?;
            let anchor = slice(contig, reference, pos, pos + 1)?;
            (SvType::Del, ref_allele, anchor.to_vec(), -(length as i64))
        }
        Variant::Insertion { .. } => {
            let anchor = slice(contig, reference, pos, pos.saturating_add(1))?;
            let mut alt = anchor.to_vec();
            alt.extend_from_slice(&applied.sequence);
            (SvType::Ins, anchor, alt, length as i64)
        }
        other => return Err(VcfError::UnsupportedVariantForVcf(other.kind())),
    };

    Ok(VcfRecord {
        chrom,
        pos: pos + 1,
        id: format!("{}_{}_{}", contig, sv_type.id_tag(), serial),
        ref_allele: String::from_utf8_lossy(ref_allele).into_owned(),
        alt_allele: String::from_utf8_lossy(&alt_allele).into_owned(),
        sv_type,
        sv_len,
        end,
    })
}

fn slice<'a>(contig: &str, reference: &'a [u8], start: u64, end: u64) -> VcfResult<&'a [u8]> {
    let len = reference.len() as u64;
    if start > end || end > len {
        return Err(VcfError::Reference(ReferenceError::RangeOutOfBounds {
            contig: contig.to_string(),
            start,
            end,
            len,
        }));
    }
    Ok(&reference[start as usize..end as usize])
}
