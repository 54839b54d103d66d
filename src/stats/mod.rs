//! Descriptive statistics over numeric series.
//!
//! Every function in this module is total over its numeric domain: degenerate
//! inputs (empty series, fewer than two samples, constant series) return the
//! neutral value 0 instead of raising or producing NaN.

/// Arithmetic mean. Returns 0 for an empty series.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample variance with Bessel's correction (denominator `n - 1`).
///
/// Returns 0 when fewer than two samples are available.
pub fn variance(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let avg = mean(values);
    let sum_squared_diff: f64 = values.iter().map(|&x| (x - avg).powi(2)).sum();
    sum_squared_diff / (n - 1) as f64
}

/// Sample standard deviation
pub fn stddev(values: &[f64]) -> f64 {
    variance(values).sqrt()
}

/// Median of the series. Even-length series average the two central
/// elements; an empty series returns 0.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

/// Pearson product-moment correlation coefficient between two series.
///
/// Pairs are taken up to the shorter series length. Returns 0 when fewer
/// than two pairs exist or either series is constant (zero denominator),
/// never NaN.
pub fn correlation(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n < 2 {
        return 0.0;
    }

    let x = &x[..n];
    let y = &y[..n];
    let n = n as f64;

    let sum_x: f64 = x.iter().sum();
    let sum_y: f64 = y.iter().sum();
    let sum_xy: f64 = x.iter().zip(y).map(|(&a, &b)| a * b).sum();
    let sum_x_sq: f64 = x.iter().map(|&a| a * a).sum();
    let sum_y_sq: f64 = y.iter().map(|&b| b * b).sum();

    let denominator =
        ((n * sum_x_sq - sum_x * sum_x) * (n * sum_y_sq - sum_y * sum_y)).sqrt();
    if denominator == 0.0 || !denominator.is_finite() {
        return 0.0;
    }

    (n * sum_xy - sum_x * sum_y) / denominator
}
