//! Estimator variants supported by [`RegisterSketch`](crate::RegisterSketch).
//!
//! Both variants share the register array and its update rule; they only
//! differ in the bias constant and the formula applied over the registers.

use std::fmt::{Display, Formatter};

use enum_dispatch::enum_dispatch;

use crate::hyperloglog::HyperLogLog;
use crate::loglog::LogLog;
use crate::register::RegisterArray;

/// Register sketch variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[enum_dispatch]
pub enum Variant {
    LogLog(LogLog),
    HyperLogLog(HyperLogLog),
}

/// Estimator trait which must be implemented by all variants.
#[enum_dispatch(Variant)]
pub trait VariantTrait {
    /// Bias correction constant for `m` registers
    fn alpha(&self, m: usize) -> f64;
    /// Cardinality estimate over the given registers
    fn estimate(&self, registers: &RegisterArray, alpha: f64) -> f64;
    /// Human readable variant name, used by `Display`
    fn name(&self) -> &'static str;
}

impl Display for Variant {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
