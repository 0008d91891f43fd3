//! ## K-Minimum-Values sketch
//! Keeps the `k` smallest values of a pairwise independent hash of every
//! element. With `n` distinct elements spread uniformly over `[0, P)`, the
//! `k`-th smallest hash sits near `kP / (n + 1)`, which inverts into the
//! estimate `(k - 1) / (kth_min / P)`.
//!
//! Elements are canonicalized into the `u64` domain by the djb2 string hash
//! before the independent hash is applied.
//!
//! Equal hash values are treated as the same element: a genuine collision
//! between two distinct elements is counted once.

use std::collections::BTreeSet;
use std::mem::size_of;

use rand::Rng;

use crate::error::{Result, SketchError};
use crate::hash::{string_hash, IndependentHashFamily, MERSENNE_PRIME};

/// Independence of the hash family backing the sketch (one multiplicative and one additive term)
pub const KMV_HASH_DEGREE: usize = 2;

/// Ordered set holding at most `capacity` smallest distinct hash values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinHashSet {
    capacity: usize,
    hashes: BTreeSet<u64>,
}

impl MinHashSet {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            hashes: BTreeSet::new(),
        }
    }

    /// Offer a hash value to the set.
    /// Returns true if the set changed.
    #[inline]
    pub fn insert(&mut self, hash: u64) -> bool {
        if self.hashes.len() < self.capacity {
            return self.hashes.insert(hash);
        }

        match self.hashes.last() {
            Some(&max) if hash < max && !self.hashes.contains(&hash) => {
                self.hashes.pop_last();
                self.hashes.insert(hash);
                tracing::trace!(evicted = max, inserted = hash, "replaced k-th minimum");
                true
            }
            _ => false,
        }
    }

    /// Largest retained hash value
    #[inline]
    pub fn max(&self) -> Option<u64> {
        self.hashes.last().copied()
    }

    #[inline]
    pub fn contains(&self, hash: u64) -> bool {
        self.hashes.contains(&hash)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.hashes.len() >= self.capacity
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Retained hash values in ascending order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        self.hashes.iter().copied()
    }
}

/// K-Minimum-Values cardinality sketch
#[derive(Debug, Clone)]
pub struct OrderStatisticSketch {
    k: usize,
    hash_family: IndependentHashFamily,
    min_hashes: MinHashSet,
}

impl OrderStatisticSketch {
    /// Creates new sketch retaining `k` minimum hashes, seeded from system entropy
    pub fn new(k: usize) -> Result<Self> {
        Self::with_rng(k, &mut rand::thread_rng())
    }

    /// Creates new sketch drawing its hash coefficients from `rng`
    pub fn with_rng<R: Rng + ?Sized>(k: usize, rng: &mut R) -> Result<Self> {
        if k < 1 {
            return Err(SketchError::invalid_argument(format!(
                "k must be at least 1, got {k}"
            )));
        }

        let hash_family = IndependentHashFamily::with_rng(KMV_HASH_DEGREE, rng)?;
        tracing::debug!(k, "created kmv sketch");

        Ok(Self {
            k,
            hash_family,
            min_hashes: MinHashSet::new(k),
        })
    }

    /// Insert a string element
    #[inline]
    pub fn update(&mut self, value: &str) {
        self.update_bytes(value.as_bytes());
    }

    /// Insert a raw byte string element
    #[inline]
    pub fn update_bytes(&mut self, value: &[u8]) {
        let hash = self.hash_family.evaluate(string_hash(value));
        self.min_hashes.insert(hash);
    }

    /// Return cardinality estimate.
    ///
    /// Below `k` distinct hashes every one of them is retained and the count is exact.
    /// Past that point the numerator is `k - 1`, so a `k = 1` sketch estimates 0.0
    /// once it has seen anything; pick `k >= 2` for a usable estimate.
    pub fn estimate(&self) -> f64 {
        if !self.min_hashes.is_full() {
            return self.min_hashes.len() as f64;
        }

        // a zero k-th minimum is only possible for k == 1, where the numerator is zero anyway
        let kth_min = self.kth_min().max(1);
        (self.k - 1) as f64 / (kth_min as f64 / MERSENNE_PRIME as f64)
    }

    /// Largest retained hash, or the field size when nothing has been retained yet
    #[inline]
    pub fn kth_min(&self) -> u64 {
        self.min_hashes.max().unwrap_or(MERSENNE_PRIME)
    }

    /// `kth_min / P`, a density in `(0, 1]`
    #[inline]
    pub fn scaled_kth_min(&self) -> f64 {
        self.kth_min() as f64 / MERSENNE_PRIME as f64
    }

    #[inline]
    pub fn k(&self) -> usize {
        self.k
    }

    #[inline]
    pub fn num_retained(&self) -> usize {
        self.min_hashes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min_hashes.is_empty()
    }

    /// Return whether `k` distinct hashes have been seen and the estimate is approximate
    #[inline]
    pub fn is_estimation_mode(&self) -> bool {
        self.min_hashes.is_full()
    }

    /// Retained hashes in ascending order
    #[inline]
    pub fn retained(&self) -> impl Iterator<Item = u64> + '_ {
        self.min_hashes.iter()
    }

    #[inline]
    pub fn hash_family(&self) -> &IndependentHashFamily {
        &self.hash_family
    }

    /// Approximate memory size of `OrderStatisticSketch`
    pub fn size_of(&self) -> usize {
        size_of::<Self>()
            + self.hash_family.k() * size_of::<u64>()
            + self.min_hashes.len() * size_of::<u64>()
    }
}
