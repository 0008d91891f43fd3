//! Register sketch estimates the number of distinct elements in a stream
//! from an array of `m = 2^b` small registers, where `b` is the precision
//! in [4..16] range.
//!
//! # Update rule
//!
//! Every element is hashed into a 32-bit word `h` by
//! [`dispersion_hash`](crate::hash::dispersion_hash):
//! - the lowest `b` bits of `h` select the register,
//! - the remaining `32 - b` bits `w = h >> b` give the rank, i.e. the
//!   1-indexed position of the leftmost set bit of `w` within its `32 - b`
//!   significant bits (`33 - b` when `w == 0`).
//!
//! The register keeps the maximum rank it has seen, so registers never
//! decrease and re-inserting an element is a no-op.
//!
//! # Estimators
//!
//! The same registers feed either the LogLog (arithmetic mean) or the
//! HyperLogLog (harmonic mean with range corrections) estimator, selected
//! by [`Variant`].
//!
//! | Precision | Registers | HyperLogLog std. error |
//! |-----------|-----------|------------------------|
//! | 4         | 16        | 26%                    |
//! | 10        | 1024      | 3.25%                  |
//! | 12        | 4096      | 1.62%                  |
//! | 14        | 16384     | 0.81%                  |
//! | 16        | 65536     | 0.41%                  |

use std::fmt::{Debug, Formatter};
use std::hash::{BuildHasher, BuildHasherDefault, Hash, Hasher};
use std::mem::size_of;

use wyhash::WyHash;

use crate::error::{Result, SketchError};
use crate::hash::dispersion_hash;
use crate::hyperloglog::HyperLogLog;
use crate::loglog::LogLog;
use crate::variant::{Variant, VariantTrait};

/// Smallest supported precision
pub const MIN_PRECISION: usize = 4;
/// Largest supported precision
pub const MAX_PRECISION: usize = 16;
/// Precision used by `Default`
pub const DEFAULT_PRECISION: usize = 12;

/// Fixed-size array of monotone registers.
///
/// Number of zero registers is tracked on every update, so linear counting
/// does not need to rescan the array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterArray {
    ranks: Vec<u8>,
    zeros: usize,
}

impl RegisterArray {
    /// Creates `m` zeroed registers
    pub fn new(m: usize) -> Self {
        Self {
            ranks: vec![0; m],
            zeros: m,
        }
    }

    /// Raises register `idx` to `rank` if it is currently lower.
    /// Returns true if the register changed.
    ///
    /// # Panics
    /// Panics if `idx >= self.len()`.
    #[inline]
    pub fn update(&mut self, idx: usize, rank: u8) -> bool {
        let old_rank = self.ranks[idx];
        if rank <= old_rank {
            return false;
        }
        self.zeros -= usize::from(old_rank == 0);
        self.ranks[idx] = rank;
        true
    }

    /// Return register `idx`
    ///
    /// # Panics
    /// Panics if `idx >= self.len()`.
    #[inline]
    pub fn get(&self, idx: usize) -> u8 {
        self.ranks[idx]
    }

    /// Number of registers
    #[inline]
    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    /// Return whether the array holds no registers at all
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    /// Number of registers still at zero
    #[inline]
    pub fn zeros(&self) -> usize {
        self.zeros
    }

    /// Register ranks in index order
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.ranks
    }

    /// Iterate over register ranks by value
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.ranks.iter().copied()
    }
}

/// LogLog / HyperLogLog register sketch.
///
/// `H` is only used by [`RegisterSketch::insert`] to turn arbitrary hashable
/// items into `u64` values; [`RegisterSketch::update`] hashes with the fixed
/// dispersion hash, so identical `u64` streams always give identical registers.
pub struct RegisterSketch<H: Hasher + Default = WyHash> {
    variant: Variant,
    /// Number of register index bits `b`
    precision: usize,
    /// Bias correction constant precomputed for `m`
    alpha: f64,
    registers: RegisterArray,
    /// Zero-sized build hasher
    build_hasher: BuildHasherDefault<H>,
}

impl RegisterSketch {
    /// Creates new sketch of the given variant with `2^precision` registers
    #[inline]
    pub fn new(variant: impl Into<Variant>, precision: usize) -> Result<Self> {
        Self::with_hasher(variant, precision)
    }

    /// Creates new LogLog sketch
    #[inline]
    pub fn loglog(precision: usize) -> Result<Self> {
        Self::new(LogLog, precision)
    }

    /// Creates new HyperLogLog sketch
    #[inline]
    pub fn hyperloglog(precision: usize) -> Result<Self> {
        Self::new(HyperLogLog, precision)
    }
}

impl<H: Hasher + Default> RegisterSketch<H> {
    /// Creates new sketch using `H` for [`RegisterSketch::insert`]
    pub fn with_hasher(variant: impl Into<Variant>, precision: usize) -> Result<Self> {
        let variant = variant.into();
        if !(MIN_PRECISION..=MAX_PRECISION).contains(&precision) {
            return Err(SketchError::invalid_argument(format!(
                "precision must be in [{MIN_PRECISION}, {MAX_PRECISION}], got {precision}"
            )));
        }

        let sketch = Self::from_parts(variant, precision);
        tracing::debug!(
            variant = variant.name(),
            precision,
            registers = sketch.num_registers(),
            alpha = sketch.alpha,
            "created register sketch"
        );
        Ok(sketch)
    }

    fn from_parts(variant: Variant, precision: usize) -> Self {
        let m = 1 << precision;
        Self {
            variant,
            precision,
            alpha: variant.alpha(m),
            registers: RegisterArray::new(m),
            build_hasher: BuildHasherDefault::default(),
        }
    }

    /// Insert a hashable item into the sketch
    #[inline]
    pub fn insert<T: Hash + ?Sized>(&mut self, item: &T) {
        let mut hasher = self.build_hasher.build_hasher();
        item.hash(&mut hasher);
        self.update(hasher.finish());
    }

    /// Insert a `u64` value into the sketch
    #[inline]
    pub fn update(&mut self, value: u64) {
        let (idx, rank) = Self::index_and_rank(dispersion_hash(value), self.precision as u32);
        self.registers.update(idx, rank);
    }

    /// Split hash into register index (low `b` bits) and rank of the remaining bits
    #[inline]
    fn index_and_rank(hash: u32, b: u32) -> (usize, u8) {
        let idx = (hash & ((1 << b) - 1)) as usize;
        let w = hash >> b;
        // `w` has at most `32 - b` significant bits, so the rank is in [1, 33 - b]
        let rank = leading_zeros_32(w) - b + 1;
        (idx, rank as u8)
    }

    /// Return cardinality estimate
    #[inline]
    pub fn estimate(&self) -> f64 {
        self.variant.estimate(&self.registers, self.alpha)
    }

    #[inline]
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Number of register index bits `b`
    #[inline]
    pub fn precision(&self) -> usize {
        self.precision
    }

    /// Number of registers `m = 2^b`
    #[inline]
    pub fn num_registers(&self) -> usize {
        self.registers.len()
    }

    #[inline]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    #[inline]
    pub fn registers(&self) -> &[u8] {
        self.registers.as_slice()
    }

    #[inline]
    pub fn zero_registers(&self) -> usize {
        self.registers.zeros()
    }

    /// Return whether no element has been observed yet
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.registers.zeros() == self.registers.len()
    }

    /// Return memory size of `RegisterSketch`
    pub fn size_of(&self) -> usize {
        size_of::<Self>() + self.registers.len() * size_of::<u8>()
    }
}

impl Default for RegisterSketch {
    fn default() -> Self {
        Self::from_parts(HyperLogLog.into(), DEFAULT_PRECISION)
    }
}

impl<H: Hasher + Default> Clone for RegisterSketch<H> {
    fn clone(&self) -> Self {
        Self {
            variant: self.variant,
            precision: self.precision,
            alpha: self.alpha,
            registers: self.registers.clone(),
            build_hasher: BuildHasherDefault::default(),
        }
    }
}

impl<H: Hasher + Default> PartialEq for RegisterSketch<H> {
    /// Compare variant, precision and registers
    fn eq(&self, rhs: &Self) -> bool {
        self.variant == rhs.variant
            && self.precision == rhs.precision
            && self.registers == rhs.registers
    }
}

impl<H: Hasher + Default> Debug for RegisterSketch<H> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{ variant: {}, precision: {}, estimate: {:.2} }}",
            self.variant,
            self.precision,
            self.estimate()
        )
    }
}

/// Portable leading zero count of a 32-bit word by binary bit scan.
/// A zero word has 32 leading zeros.
#[inline]
pub(crate) fn leading_zeros_32(mut w: u32) -> u32 {
    if w == 0 {
        return 32;
    }
    let mut n = 0;
    if w & 0xffff_0000 == 0 {
        n += 16;
        w <<= 16;
    }
    if w & 0xff00_0000 == 0 {
        n += 8;
        w <<= 8;
    }
    if w & 0xf000_0000 == 0 {
        n += 4;
        w <<= 4;
    }
    if w & 0xc000_0000 == 0 {
        n += 2;
        w <<= 2;
    }
    if w & 0x8000_0000 == 0 {
        n += 1;
    }
    n
}
