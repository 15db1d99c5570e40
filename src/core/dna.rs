//! DNA sequence utilities
//!
//! Provides random base generation and the byte-level sequence
//! transformations applied by structural variants.

use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::Rng;

/// The four standard bases, in A, C, G, T order
pub const BASES: [u8; 4] = [b'A', b'C', b'G', b'T'];

/// Generate `len` bases drawn uniformly from A, C, G, T
///
/// # Examples
/// ```
/// use rand::SeedableRng;
/// use rand_xoshiro::Xoshiro256PlusPlus;
/// use svsim::core::dna::{is_acgt, random_bases};
///
/// let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
/// let seq = random_bases(12, &mut rng);
/// assert_eq!(seq.len(), 12);
/// assert!(is_acgt(&seq));
/// ```
pub fn random_bases<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Vec<u8> {
    (0..len).map(|_| BASES[rng.random_range(0..BASES.len())]).collect()
}

/// Return the sequence in reverse byte order
///
/// This is a plain reversal, no complement is taken.
///
/// # Examples
/// ```
/// use svsim::core::dna::reversed;
///
/// assert_eq!(reversed(b"CDEFG"), b"GFEDC");
/// assert_eq!(reversed(b""), b"");
/// ```
pub fn reversed(seq: &[u8]) -> Vec<u8> {
    seq.iter().rev().copied().collect()
}

/// Return the sequence repeated `copies` times
pub fn repeated(seq: &[u8], copies: usize) -> Vec<u8> {
    seq.repeat(copies)
}

/// Check if every byte is one of A, C, G, T (uppercase)
#[inline]
pub fn is_acgt(seq: &[u8]) -> bool {
    seq.iter().all(|b| BASES.contains(b))
}

/// Weighted base sampler for simulated genomes
///
/// Frequencies are given for A, C, G and T respectively.
#[derive(Debug, Clone)]
pub struct BaseSampler {
    index: WeightedIndex<f64>,
}

impl BaseSampler {
    /// Tolerance on the sum of the frequencies
    pub const TOLERANCE: f64 = 0.001;

    /// Build a sampler, returning the frequency sum if it is not ~1
    pub fn new(frequencies: [f64; 4]) -> Result<Self, f64> {
        let total: f64 = frequencies.iter().sum();
        if (total - 1.0).abs() > Self::TOLERANCE {
            return Err(total);
        }
        let index = WeightedIndex::new(frequencies).map_err(|_| total)?;
        Ok(Self { index })
    }

    /// Draw one base
    #[inline]
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u8 {
        BASES[self.index.sample(rng)]
    }
}
