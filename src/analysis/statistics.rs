//! Order statistics for glucose values.
//!
//! Quantiles use linear interpolation between order statistics: for `n`
//! sorted values the `q` quantile sits at rank `q * (n - 1)`.

use std::cmp::Ordering;

/// Copy and sort ascending; NaN compares equal so it stays where it lands
pub fn sorted_copy(data: &[f64]) -> Vec<f64> {
    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    sorted
}

/// Quantile of already sorted data. Returns NaN for an empty slice.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return f64::NAN;
    }
    let rank = q.clamp(0.0, 1.0) * (n - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    if lo == hi {
        sorted[lo]
    } else {
        sorted[lo] + (sorted[hi] - sorted[lo]) * frac
    }
}

/// Quantile of unsorted data
pub fn quantile(data: &[f64], q: f64) -> f64 {
    quantile_sorted(&sorted_copy(data), q)
}

pub fn median(data: &[f64]) -> f64 {
    quantile(data, 0.5)
}

/// Several quantiles from a single sort
pub fn quantiles(data: &[f64], qs: &[f64]) -> Vec<f64> {
    let sorted = sorted_copy(data);
    qs.iter().map(|&q| quantile_sorted(&sorted, q)).collect()
}
