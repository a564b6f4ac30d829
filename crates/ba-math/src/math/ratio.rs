//! Guarded ratios between two rates.

use crate::math::rate::Rate;
use thiserror::Error;

/// Why a ratio between two rates has no finite value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DivisionUndefined {
    /// The denominator rate is exactly zero.
    #[error("denominator rate is zero")]
    ZeroDenominator,
    /// The numerator rate was computed over zero observations.
    #[error("numerator rate has no observations")]
    UnsupportedNumerator,
    /// The denominator rate was computed over zero observations.
    #[error("denominator rate has no observations")]
    UnsupportedDenominator,
}

/// Ratio `numerator.value() / denominator.value()`.
///
/// Fails instead of producing NaN or infinity. A rate whose own denominator
/// is zero (the `0.0` sentinel) is never used as either side of a ratio.
pub fn guarded_ratio(numerator: &Rate, denominator: &Rate) -> Result<f64, DivisionUndefined> {
    if !denominator.is_defined() {
        return Err(DivisionUndefined::UnsupportedDenominator);
    }
    if !numerator.is_defined() {
        return Err(DivisionUndefined::UnsupportedNumerator);
    }
    if denominator.numerator == 0 {
        return Err(DivisionUndefined::ZeroDenominator);
    }
    Ok(numerator.value() / denominator.value())
}
