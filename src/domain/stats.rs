//! Descriptive statistics over price and return values.

/// Arithmetic mean. Returns 0.0 for an empty slice; callers guard emptiness
/// at the analyzer boundary.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n-1 denominator). Returns 0.0 for fewer than
/// two values.
pub fn stddev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>()
        / (values.len() - 1) as f64;
    variance.sqrt()
}
