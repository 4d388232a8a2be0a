/// Arithmetic mean, `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation (divides by `n`), `0.0` for an empty slice
pub fn std_dev(values: &[f64]) -> f64 {
    let Some(mean) = mean(values) else {
        return 0.0;
    };
    let variance = values
        .iter()
        .map(|&v| (v - mean).powi(2))
        .sum::<f64>()
        / values.len() as f64;

    variance.sqrt()
}
