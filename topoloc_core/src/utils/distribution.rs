// topoloc_core/src/utils/distribution.rs

//! Stateless helpers for discrete probability distributions.

use crate::error::LocalizationError;
use nalgebra::DVector;

/// Tolerance used when checking that a distribution sums to one.
pub const SUM_TOLERANCE: f64 = 1e-9;

/// PURE FUNCTION: Returns a distribution of length `len` with every entry `1/len`.
///
/// An empty distribution is returned for `len == 0`.
pub fn uniform_distribution(len: usize) -> DVector<f64> {
    if len == 0 {
        return DVector::zeros(0);
    }
    DVector::from_element(len, 1.0 / len as f64)
}

/// PURE FUNCTION: Scales `weights` so its entries sum to one.
///
/// Fails with [`LocalizationError::DegenerateBelief`] when the total mass is
/// zero, negative or not finite. The input is never modified.
pub fn normalize(weights: &DVector<f64>) -> Result<DVector<f64>, LocalizationError> {
    let sum = weights.sum();
    if !sum.is_finite() || sum <= 0.0 {
        return Err(LocalizationError::DegenerateBelief { sum });
    }
    Ok(weights / sum)
}

/// Whether `v` is a valid distribution: non-negative finite entries summing to one.
pub fn is_distribution(v: &DVector<f64>) -> bool {
    v.iter().all(|p| p.is_finite() && *p >= 0.0) && (v.sum() - 1.0).abs() <= SUM_TOLERANCE
}
