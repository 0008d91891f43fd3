//! `stream-sketches` estimates the number of distinct elements in a stream in a single pass,
//! using memory far smaller than the distinct count itself.
//!
//! Two estimator families are provided:
//! - register sketches ([`RegisterSketch`]) in LogLog and HyperLogLog flavours,
//! - order statistic sketches: K-Minimum-Values ([`OrderStatisticSketch`]) and its
//!   sharded variant ([`ShardedOrderStatisticSketch`]), backed by a k-wise independent
//!   hash family over the Mersenne prime field `2^61 - 1` ([`IndependentHashFamily`]).
//!
//! Sketches are plain single-threaded values: `update` and `estimate` never fail,
//! construction validates its parameters and returns [`SketchError`] otherwise.
//!
//! ```
//! use stream_sketches::{RegisterSketch, OrderStatisticSketch};
//!
//! let mut hll = RegisterSketch::hyperloglog(14).unwrap();
//! let mut kmv = OrderStatisticSketch::new(256).unwrap();
//! for i in 0..10_000u64 {
//!     hll.update(i);
//!     kmv.update(&i.to_string());
//! }
//! assert!((hll.estimate() - 10_000.0).abs() < 500.0);
//! assert!(kmv.estimate() > 5_000.0);
//! ```
pub mod error;
pub mod hash;
pub mod hyperloglog;
pub mod kmv;
pub mod loglog;
pub mod register;
pub mod split_kmv;
pub mod variant;

pub use error::{Result, SketchError};
pub use hash::IndependentHashFamily;
pub use hyperloglog::HyperLogLog;
pub use kmv::{MinHashSet, OrderStatisticSketch};
pub use loglog::LogLog;
pub use register::{RegisterArray, RegisterSketch};
pub use split_kmv::ShardedOrderStatisticSketch;
pub use variant::{Variant, VariantTrait};
