/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Like [`mean`], but an empty slice has no mean.
pub fn mean_opt(values: &[f64]) -> Option<f64> {
    (!values.is_empty()).then(|| mean(values))
}
