//! ## Sharded K-Minimum-Values sketch
//! Routes every element to one of `num_splits` independent KMV shards by
//! `string_hash(element) mod num_splits`; each shard retains `k / num_splits`
//! minimum hashes.
//!
//! The shards' scaled k-th minima are treated as order statistics of one
//! logical uniform process:
//!
//! `estimate = (num_splits * k - num_splits) / sum(kth_min_i / P)`
//!
//! Averaging `num_splits` independent order statistics has lower variance
//! than relying on a single large one. Shards are still updated sequentially
//! by the caller.

use std::mem::size_of;

use rand::Rng;

use crate::error::{Result, SketchError};
use crate::hash::string_hash;
use crate::kmv::OrderStatisticSketch;

/// Sharded K-Minimum-Values cardinality sketch
#[derive(Debug, Clone)]
pub struct ShardedOrderStatisticSketch {
    k: usize,
    num_splits: usize,
    shards: Vec<OrderStatisticSketch>,
}

impl ShardedOrderStatisticSketch {
    /// Creates new sketch with total capacity `k` spread over `num_splits` shards
    pub fn new(k: usize, num_splits: usize) -> Result<Self> {
        Self::with_rng(k, num_splits, &mut rand::thread_rng())
    }

    /// Creates new sketch drawing every shard's hash coefficients from `rng`
    pub fn with_rng<R: Rng + ?Sized>(k: usize, num_splits: usize, rng: &mut R) -> Result<Self> {
        if num_splits == 0 {
            return Err(SketchError::invalid_argument(
                "num_splits must be at least 1, got 0",
            ));
        }
        if k == 0 || k % num_splits != 0 {
            return Err(SketchError::invalid_argument(format!(
                "k must be a positive multiple of num_splits, got k = {k}, num_splits = {num_splits}"
            )));
        }

        let shard_capacity = k / num_splits;
        let shards = (0..num_splits)
            .map(|_| OrderStatisticSketch::with_rng(shard_capacity, rng))
            .collect::<Result<Vec<_>>>()?;
        tracing::debug!(k, num_splits, shard_capacity, "created sharded kmv sketch");

        Ok(Self {
            k,
            num_splits,
            shards,
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
        let idx = self.shard_index(value);
        self.shards[idx].update_bytes(value);
    }

    /// Return shard receiving `value`
    #[inline]
    pub fn shard_index(&self, value: &[u8]) -> usize {
        (string_hash(value) % self.num_splits as u64) as usize
    }

    /// Return cardinality estimate.
    ///
    /// While no shard has filled up, every distinct hash is retained and the
    /// total retained count is exact.
    pub fn estimate(&self) -> f64 {
        if !self.shards.iter().any(OrderStatisticSketch::is_estimation_mode) {
            return self.num_retained() as f64;
        }

        // empty shards contribute the sentinel density 1.0
        let sum: f64 = self
            .shards
            .iter()
            .map(OrderStatisticSketch::scaled_kth_min)
            .sum();
        if sum <= 0.0 {
            return self.num_retained() as f64;
        }

        (self.num_splits * self.k - self.num_splits) as f64 / sum
    }

    /// Total capacity across all shards
    #[inline]
    pub fn k(&self) -> usize {
        self.k
    }

    #[inline]
    pub fn num_splits(&self) -> usize {
        self.num_splits
    }

    /// Capacity of every shard, `k / num_splits`
    #[inline]
    pub fn shard_capacity(&self) -> usize {
        self.k / self.num_splits
    }

    #[inline]
    pub fn shards(&self) -> &[OrderStatisticSketch] {
        &self.shards
    }

    /// Number of hashes retained over all shards
    #[inline]
    pub fn num_retained(&self) -> usize {
        self.shards.iter().map(OrderStatisticSketch::num_retained).sum()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(OrderStatisticSketch::is_empty)
    }

    /// Approximate memory size of `ShardedOrderStatisticSketch`
    pub fn size_of(&self) -> usize {
        size_of::<Self>()
            + self
                .shards
                .iter()
                .map(OrderStatisticSketch::size_of)
                .sum::<usize>()
    }
}
