//! Hashing primitives backing the sketches.
//!
//! Two unrelated families live here:
//! - a fixed 32-bit dispersion hash used to pick and rank registers,
//! - a k-wise independent polynomial hash over the Mersenne prime field
//!   `2^61 - 1`, used where min-wise behaviour matters.
//!
//! The djb2 string hash is kept alongside: it canonicalizes arbitrary byte
//! strings into the `u64` domain and routes elements across KMV shards.
//! Shard routing depends on its exact output, so it must not be swapped for
//! a stronger hash.

use rand::Rng;

use crate::error::{Result, SketchError};

/// Mersenne prime `2^61 - 1` defining the field of the independent hash family.
pub const MERSENNE_PRIME: u64 = (1 << 61) - 1;

const FNV_OFFSET_BASIS: u32 = 2_166_136_261;
const FNV_PRIME: u32 = 16_777_619;
const DJB_SEED: u64 = 5381;

/// FNV-1a over the little-endian bytes of `value`.
///
/// Mixing stops as soon as the remaining high bytes are all zero, so small
/// values are hashed over fewer bytes and `fnv1a_32(0)` is the offset basis.
#[inline]
pub fn fnv1a_32(mut value: u64) -> u32 {
    let mut h = FNV_OFFSET_BASIS;
    while value != 0 {
        h ^= (value & 0xff) as u32;
        h = h.wrapping_mul(FNV_PRIME);
        value >>= 8;
    }
    h
}

/// Murmur3 32-bit finalizer.
#[inline]
pub fn fmix32(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^= h >> 16;
    h
}

/// Deterministic 32-bit dispersion hash used to index register arrays.
///
/// The low bits of a bare FNV word only depend on the low bits of each input
/// byte, which would tie the register index of small integers to `value mod m`.
/// The finalizer is a bijection that spreads every input bit over the whole word.
#[inline]
pub fn dispersion_hash(value: u64) -> u32 {
    fmix32(fnv1a_32(value))
}

/// djb2 polynomial hash (`h * 33 + byte`, wrapping) over raw bytes.
#[inline]
pub fn string_hash(bytes: &[u8]) -> u64 {
    bytes.iter().fold(DJB_SEED, |h, &b| {
        h.wrapping_mul(33).wrapping_add(u64::from(b))
    })
}

/// Adds two field elements modulo [`MERSENNE_PRIME`].
#[inline]
pub fn add_mod(a: u64, b: u64) -> u64 {
    // both reduced operands are below 2^61, their sum fits easily
    let sum = a % MERSENNE_PRIME + b % MERSENNE_PRIME;
    if sum >= MERSENNE_PRIME {
        sum - MERSENNE_PRIME
    } else {
        sum
    }
}

/// Multiplies two field elements modulo [`MERSENNE_PRIME`] by double-and-add.
///
/// Every intermediate value stays below `2^62`, so no step can overflow `u64`.
#[inline]
pub fn mul_mod(a: u64, b: u64) -> u64 {
    let mut a = a % MERSENNE_PRIME;
    let mut b = b % MERSENNE_PRIME;
    let mut result = 0;
    while b > 0 {
        if b & 1 == 1 {
            result = add_mod(result, a);
        }
        a = add_mod(a, a);
        b >>= 1;
    }
    result
}

/// One member of a k-wise independent hash family.
///
/// Evaluates `sum(coeff[i] * x^i) mod (2^61 - 1)`. The coefficients are drawn
/// once, uniformly from `[1, P - 1]`, and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndependentHashFamily {
    coefficients: Vec<u64>,
}

impl IndependentHashFamily {
    /// Creates a family member of independence `k` seeded from system entropy.
    pub fn new(k: usize) -> Result<Self> {
        Self::with_rng(k, &mut rand::thread_rng())
    }

    /// Creates a family member of independence `k` drawing coefficients from `rng`.
    pub fn with_rng<R: Rng + ?Sized>(k: usize, rng: &mut R) -> Result<Self> {
        if k < 1 {
            return Err(SketchError::invalid_argument(format!(
                "hash family independence k must be at least 1, got {k}"
            )));
        }

        let coefficients = (0..k)
            .map(|_| rng.gen_range(1..MERSENNE_PRIME))
            .collect();
        tracing::debug!(k, "drew independent hash family coefficients");

        Ok(Self { coefficients })
    }

    /// Evaluates the polynomial at `x` using Horner's method.
    /// The result always lies in `[0, 2^61 - 1)`.
    #[inline]
    pub fn evaluate(&self, x: u64) -> u64 {
        let x = x % MERSENNE_PRIME;
        self.coefficients
            .iter()
            .rev()
            .fold(0, |acc, &coeff| add_mod(mul_mod(acc, x), coeff))
    }

    /// Degree of independence, i.e. the number of coefficients
    #[inline]
    pub fn k(&self) -> usize {
        self.coefficients.len()
    }

    /// Coefficients ordered from the constant term upwards
    #[inline]
    pub fn coefficients(&self) -> &[u64] {
        &self.coefficients
    }

    /// Size of the field the family hashes into
    #[inline]
    pub const fn prime(&self) -> u64 {
        MERSENNE_PRIME
    }
}
