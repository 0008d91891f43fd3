//! ## HyperLogLog estimator
//! Raw estimate is the bias-corrected harmonic mean of `2^register` values:
//! `E = alpha * m^2 / sum(2^-register)`.
//!
//! The asymptotic formula is biased at both ends, so two corrections apply:
//! - `E <= 2.5m` with empty registers left: linear counting, `m * ln(m / zeros)`.
//! - `E > 2^32 / 30`: hash space saturation, `-2^32 * ln(1 - E / 2^32)`.
//!
//! [Original HyperLogLog paper](https://algo.inria.fr/flajolet/Publications/FlFuGaMe07.pdf)

use crate::register::RegisterArray;
use crate::variant::VariantTrait;

/// Size of the 32-bit dispersion hash space
const TWO_POW_32: f64 = 4_294_967_296.0;

/// HyperLogLog variant marker
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HyperLogLog;

impl VariantTrait for HyperLogLog {
    #[inline]
    fn alpha(&self, m: usize) -> f64 {
        alpha(m)
    }

    /// Return range corrected HyperLogLog estimate
    fn estimate(&self, registers: &RegisterArray, alpha: f64) -> f64 {
        let m = registers.len() as f64;
        let raw = raw_estimate(registers, alpha);

        // small range correction
        if raw <= 2.5 * m {
            let zeros = registers.zeros();
            if zeros == 0 {
                return raw;
            }
            return m * (m / zeros as f64).ln();
        }

        // large range correction, undefined once the raw estimate covers the whole hash space
        if raw > TWO_POW_32 / 30.0 && raw < TWO_POW_32 {
            return -TWO_POW_32 * (1.0 - raw / TWO_POW_32).ln();
        }

        raw
    }

    fn name(&self) -> &'static str {
        "HyperLogLog"
    }
}

/// Parameter for bias correction
#[inline]
pub fn alpha(m: usize) -> f64 {
    match m {
        16 => 0.673,
        32 => 0.697,
        64 => 0.709,
        _ => 0.7213 / (1.0 + 1.079 / (m as f64)),
    }
}

/// Harmonic mean based estimate without range corrections
#[inline]
pub fn raw_estimate(registers: &RegisterArray, alpha: f64) -> f64 {
    let m = registers.len() as f64;
    let sum: f64 = registers
        .iter()
        .map(|rank| 1.0 / (1u64 << rank) as f64)
        .sum();
    alpha * m * m / sum
}
