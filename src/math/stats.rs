//! Goodness-of-fit statistics.

/// Arithmetic mean. `NaN` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sum of squared differences.
pub fn sse(actual: &[f64], predicted: &[f64]) -> f64 {
    actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p) * (a - p))
        .sum()
}

/// Mean squared error, `mean((actual - predicted)^2)`.
pub fn mse(actual: &[f64], predicted: &[f64]) -> f64 {
    sse(actual, predicted) / actual.len() as f64
}

/// `1 - SSE / SST`.
///
/// This is the residual-based proxy used for model comparison, not a proper
/// coefficient of determination for nonlinear models. A constant `y` has
/// `SST = 0` and yields a non-finite value; callers compare such values as-is.
pub fn r_squared(y: &[f64], y_fit: &[f64]) -> f64 {
    let y_bar = mean(y);
    let ss_res = sse(y, y_fit);
    let ss_tot: f64 = y.iter().map(|v| (v - y_bar) * (v - y_bar)).sum();
    1.0 - ss_res / ss_tot
}
