//! Turning count vectors into percentage shares.

/// Each count as a percentage of the total. All zeros when the total is zero.
pub fn percentages(counts: &[u64]) -> Vec<f64> {
    let total: u64 = counts.iter().sum();
    if total == 0 {
        return vec![0.0; counts.len()];
    }
    counts
        .iter()
        .map(|&c| 100.0 * c as f64 / total as f64)
        .collect()
}

/// Largest value in a slice of finite floats, `0.0` for an empty slice.
pub fn max_or_zero(values: &[f64]) -> f64 {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(0.0, f64::max)
}
