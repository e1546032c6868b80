//! Descriptive statistics over frame-size samples.
//!
//! Definitions match the conventions of the original model's statistics
//! stack: population standard deviation, Fisher excess kurtosis with
//! population moments, and linearly interpolated percentiles.

/// Arithmetic mean. Callers guarantee a non-empty slice.
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Median via sorting; even-length inputs average the two middle values.
pub fn median(values: &[f64]) -> f64 {
    percentile(values, 50.0)
}

/// Population standard deviation (no Bessel correction).
pub fn std_dev(values: &[f64]) -> f64 {
    let m = mean(values);
    let var = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}

/// Excess kurtosis (Fisher definition) with population moments:
/// `m4 / m2^2 - 3`. A normal distribution scores 0.
pub fn kurtosis(values: &[f64]) -> f64 {
    let m = mean(values);
    let n = values.len() as f64;
    let m2 = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / n;
    let m4 = values.iter().map(|v| (v - m).powi(4)).sum::<f64>() / n;
    m4 / (m2 * m2) - 3.0
}

/// Interquartile range: P75 − P25.
pub fn iqr(values: &[f64]) -> f64 {
    percentile(values, 75.0) - percentile(values, 25.0)
}

/// Percentile with linear interpolation between order statistics
/// (rank = p/100 · (n−1)).
pub fn percentile(values: &[f64], p: f64) -> f64 {
    debug_assert!(!values.is_empty());
    debug_assert!((0.0..=100.0).contains(&p));

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// The 0th, 10th, … 100th percentiles (11 values).
pub fn decile_percentiles(values: &[f64]) -> [f64; 11] {
    let mut out = [0.0; 11];
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = percentile(values, 10.0 * i as f64);
    }
    out
}
