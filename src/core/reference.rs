//! Reference genome access
//!
//! [`ReferenceLookup`] is the capability the parser, assembler and VCF
//! writer need from a reference: contig names in file order, contig
//! lengths and half-open byte ranges. [`Reference`] is the in-memory
//! implementation loaded from FASTA.

use crate::core::error::{ReferenceError, ReferenceResult};
use crate::core::io::FileBytes;
use memchr::memchr_iter;
use std::collections::HashMap;
use std::path::Path;

/// Read access to reference contigs
pub trait ReferenceLookup {
    /// Contig names in original file order
    fn contig_names(&self) -> Vec<&str>;

    /// Length of a contig, `None` if it does not exist
    fn contig_len(&self, contig: &str) -> Option<u64>;

    /// Bytes of `contig` in the half-open range `[start, end)`
    fn fetch(&self, contig: &str, start: u64, end: u64) -> ReferenceResult<&[u8]>;

    /// `length` bytes of `contig` starting at `start`
    ///
    /// An end past `u64::MAX` saturates and is reported as out of bounds.
    fn fetch_len(&self, contig: &str, start: u64, length: u64) -> ReferenceResult<&[u8]> {
        self.fetch(contig, start, start.saturating_add(length))
    }

    /// Check if a contig exists
    fn has_contig(&self, contig: &str) -> bool {
        self.contig_len(contig).is_some()
    }

    /// Whole sequence of a contig
    fn sequence(&self, contig: &str) -> ReferenceResult<&[u8]> {
        let len = self
            .contig_len(contig)
            .ok_or_else(|| ReferenceError::UnknownContig(contig.to_string()))?;
        self.fetch(contig, 0, len)
    }
}

/// How FASTA headers are turned into contig keys
///
/// The key is `header.split(delimiter)[field_index].trim()`, with the
/// leading `>` removed.
#[derive(Debug, Clone)]
pub struct FastaOptions {
    pub delimiter: String,
    pub field_index: usize,
}

impl Default for FastaOptions {
    fn default() -> Self {
        Self {
            delimiter: "|".to_string(),
            field_index: 0,
        }
    }
}

/// A single named contig
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contig {
    pub name: String,
    pub seq: Vec<u8>,
}

/// In-memory reference genome keeping the original contig order
#[derive(Debug, Clone, Default)]
pub struct Reference {
    contigs: Vec<Contig>,
    index: HashMap<String, usize>,
}

impl Reference {
    /// Build a reference from `(name, sequence)` pairs
    ///
    /// Later duplicates are rejected.
    pub fn from_contigs<I, N, S>(contigs: I) -> ReferenceResult<Self>
    where
        I: IntoIterator<Item = (N, S)>,
        N: Into<String>,
        S: Into<Vec<u8>>,
    {
        let mut reference = Reference::default();
        for (line, (name, seq)) in contigs.into_iter().enumerate() {
            reference.push(name.into(), seq.into(), line + 1)?;
        }
        Ok(reference)
    }

    /// Load a FASTA file (plain, gzip or bzip2)
    ///
    /// # Example
    /// ```ignore
    /// let reference = Reference::from_fasta_file("hg38.fa.gz", &FastaOptions::default())?;
    /// ```
    pub fn from_fasta_file<P: AsRef<Path>>(
        path: P,
        options: &FastaOptions,
    ) -> ReferenceResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ReferenceError::FileNotFound(path.to_path_buf()));
        }
        let bytes = FileBytes::load(path)?;
        Self::from_fasta_bytes(bytes.as_bytes(), options)
    }

    /// Parse FASTA records from a byte slice
    pub fn from_fasta_bytes(data: &[u8], options: &FastaOptions) -> ReferenceResult<Self> {
        let mut reference = Reference::default();
        let mut current: Option<(String, usize)> = None;
        let mut seq: Vec<u8> = Vec::new();

        let mut start = 0;
        let mut line_number = 0;
        let ends = memchr_iter(b'\n', data).chain(std::iter::once(data.len()));
        for end in ends {
            line_number += 1;
            let mut line = &data[start..end];
            start = end + 1;
            if line.last() == Some(&b'\r') {
                line = &line[..line.len() - 1];
            }

            if line.first() == Some(&b'>') {
                if let Some((name, header_line)) = current.take() {
                    reference.push(name, std::mem::take(&mut seq), header_line)?;
                }
                let name = contig_key(&line[1..], options, line_number)?;
                current = Some((name, line_number));
            } else {
                let trimmed = line.trim_ascii();
                if trimmed.is_empty() {
                    continue;
                }
                if current.is_none() {
                    return Err(ReferenceError::MissingHeader { line: line_number });
                }
                seq.extend_from_slice(trimmed);
            }
        }

        if let Some((name, header_line)) = current {
            reference.push(name, seq, header_line)?;
        }

        Ok(reference)
    }

    fn push(&mut self, name: String, seq: Vec<u8>, line: usize) -> ReferenceResult<()> {
        if self.index.contains_key(&name) {
            return Err(ReferenceError::DuplicateContig { contig: name, line });
        }
        self.index.insert(name.clone(), self.contigs.len());
        self.contigs.push(Contig { name, seq });
        Ok(())
    }

    /// Get a contig by name
    pub fn contig(&self, name: &str) -> Option<&Contig> {
        self.index.get(name).map(|&i| &self.contigs[i])
    }

    /// Iterate contigs in original order
    pub fn contigs(&self) -> impl Iterator<Item = &Contig> {
        self.contigs.iter()
    }

    /// Number of contigs
    pub fn len(&self) -> usize {
        self.contigs.len()
    }

    /// Check if the reference has no contigs
    pub fn is_empty(&self) -> bool {
        self.contigs.is_empty()
    }

    /// Total number of bases across all contigs
    pub fn total_bases(&self) -> u64 {
        self.contigs.iter().map(|c| c.seq.len() as u64).sum()
    }
}

impl ReferenceLookup for Reference {
    fn contig_names(&self) -> Vec<&str> {
        self.contigs.iter().map(|c| c.name.as_str()).collect()
    }

    fn contig_len(&self, contig: &str) -> Option<u64> {
        self.contig(contig).map(|c| c.seq.len() as u64)
    }

    fn fetch(&self, contig: &str, start: u64, end: u64) -> ReferenceResult<&[u8]> {
        let record = self
            .contig(contig)
            .ok_or_else(|| ReferenceError::UnknownContig(contig.to_string()))?;
        let len = record.seq.len() as u64;
        if start > end || end > len {
            return Err(ReferenceError::RangeOutOfBounds {
                contig: contig.to_string(),
                start,
                end,
                len,
            });
        }
        Ok(&record.seq[start as usize..end as usize])
    }
}

/// Extract the contig key from a header line (without the `>`)
fn contig_key(header: &[u8], options: &FastaOptions, line: usize) -> ReferenceResult<String> {
    let header = String::from_utf8_lossy(header);
    let header = header.trim_end();
    let delimiter = if options.delimiter.is_empty() { "|" } else { options.delimiter.as_str() };

    header
        .split(delimiter)
        .nth(options.field_index)
        .map(|field| field.trim().to_string())
        .filter(|field| !field.is_empty())
        .ok_or_else(|| ReferenceError::MissingHeaderField {
            line,
            field_index: options.field_index,
            header: header.chars().take(100).collect(),
        })
}
