//! Input/output helpers
//!
//! Opens reference and variant files with transparent gzip/bzip2
//! decompression, memory-maps large plain files, and provides
//! buffered writers for donor and VCF output.

use memmap2::Mmap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Default buffer size for readers and writers (128KB)
pub const DEFAULT_BUFFER_SIZE: usize = 128 * 1024;

/// Threshold for memory-mapping plain input files (100MB)
pub const MMAP_THRESHOLD: u64 = 100 * 1024 * 1024;

/// Compression format of an input file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionFormat {
    /// Plain text (uncompressed)
    Plain,
    /// Gzip compressed (.gz)
    Gzip,
    /// Bzip2 compressed (.bz2)
    Bzip2,
}

/// Detect compression format from file extension, then magic bytes
///
/// - `.gz` or gzip magic bytes (1f 8b)
/// - `.bz2` or bzip2 magic bytes (42 5a 68, "BZh")
pub fn detect_compression(path: &Path) -> io::Result<CompressionFormat> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    if extension == "gz" {
        return Ok(CompressionFormat::Gzip);
    }
    if extension == "bz2" {
        return Ok(CompressionFormat::Bzip2);
    }

    let mut file = File::open(path)?;
    let mut magic = [0u8; 3];
    let bytes_read = file.read(&mut magic)?;

    if bytes_read >= 2 && magic[0] == 0x1f && magic[1] == 0x8b {
        return Ok(CompressionFormat::Gzip);
    }
    if bytes_read >= 3 && magic[0] == 0x42 && magic[1] == 0x5a && magic[2] == 0x68 {
        return Ok(CompressionFormat::Bzip2);
    }

    Ok(CompressionFormat::Plain)
}

/// Open a text input, decompressing when needed
pub fn open_reader(path: &Path) -> io::Result<Box<dyn BufRead>> {
    let format = detect_compression(path)?;
    let file = File::open(path)?;

    Ok(match format {
        CompressionFormat::Gzip => Box::new(BufReader::with_capacity(
            DEFAULT_BUFFER_SIZE,
            flate2::read::MultiGzDecoder::new(file),
        )),
        CompressionFormat::Bzip2 => Box::new(BufReader::with_capacity(
            DEFAULT_BUFFER_SIZE,
            bzip2::read::BzDecoder::new(file),
        )),
        CompressionFormat::Plain => Box::new(BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file)),
    })
}

/// Whole-file contents, either memory-mapped or read into memory
pub enum FileBytes {
    /// Large plain file mapped into memory
    Mapped(Mmap),
    /// Decompressed or small file held in a buffer
    Owned(Vec<u8>),
}

impl FileBytes {
    /// Load a file, mapping plain files above [`MMAP_THRESHOLD`]
    pub fn load(path: &Path) -> io::Result<Self> {
        let format = detect_compression(path)?;
        if format == CompressionFormat::Plain {
            let file = File::open(path)?;
            if file.metadata()?.len() >= MMAP_THRESHOLD {
                // SAFETY: the file is not expected to be modified while mapped
                let mmap = unsafe { Mmap::map(&file)? };
                return Ok(FileBytes::Mapped(mmap));
            }
        }

        let mut data = Vec::new();
        open_reader(path)?.read_to_end(&mut data)?;
        Ok(FileBytes::Owned(data))
    }

    /// Get the file content as a byte slice
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            FileBytes::Mapped(mmap) => &mmap[..],
            FileBytes::Owned(data) => &data[..],
        }
    }

    /// Check if using memory mapping
    pub fn is_mapped(&self) -> bool {
        matches!(self, FileBytes::Mapped(_))
    }
}

/// Create a buffered writer for an output file
pub fn create_writer(path: &Path) -> io::Result<BufWriter<File>> {
    Ok(BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, File::create(path)?))
}

/// Write `seq` as lines of at most `width` bytes, each newline terminated
pub fn write_wrapped<W: Write + ?Sized>(out: &mut W, seq: &[u8], width: usize) -> io::Result<()> {
    let width = width.max(1);
    for line in seq.chunks(width) {
        out.write_all(line)?;
        out.write_all(b"\n")?;
    }
    Ok(())
}
