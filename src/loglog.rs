//! ## LogLog estimator
//! Estimates cardinality from the arithmetic mean `μ` of the register ranks:
//! `alpha * m * 2^μ`, with a single bias constant for every register count.
//!
//! [Durand and Flajolet, "Loglog Counting of Large Cardinalities"](https://algo.inria.fr/flajolet/Publications/DuFl03-LNCS.pdf)

use crate::register::RegisterArray;
use crate::variant::VariantTrait;

/// Asymptotic LogLog bias correction constant
pub const LOGLOG_ALPHA: f64 = 0.39701;

/// LogLog variant marker
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogLog;

impl VariantTrait for LogLog {
    #[inline]
    fn alpha(&self, _m: usize) -> f64 {
        LOGLOG_ALPHA
    }

    /// Return `alpha * m * 2^mean(registers)`
    #[inline]
    fn estimate(&self, registers: &RegisterArray, alpha: f64) -> f64 {
        let m = registers.len() as f64;
        let sum: u64 = registers.iter().map(u64::from).sum();
        let mean = sum as f64 / m;
        alpha * m * 2f64.powf(mean)
    }

    fn name(&self) -> &'static str {
        "LogLog"
    }
}
