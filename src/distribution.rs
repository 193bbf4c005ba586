//! Standard normal distribution used by the PERT probability queries.

use statrs::distribution::{ContinuousCDF, Normal};

fn standard_normal() -> Option<Normal> {
    Normal::new(0.0, 1.0).ok()
}

/// `P(Z <= z)` for a standard normal `Z`.
pub fn standard_normal_cdf(z: f64) -> Option<f64> {
    if z.is_nan() {
        return None;
    }
    standard_normal().map(|normal| normal.cdf(z))
}

/// The `z` with `P(Z <= z) = p`, defined for `p` strictly inside `(0, 1)`.
pub fn standard_normal_quantile(p: f64) -> Option<f64> {
    if !(p > 0.0 && p < 1.0) {
        return None;
    }
    standard_normal().map(|normal| normal.inverse_cdf(p))
}
