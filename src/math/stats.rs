//! Window and dispersion statistics over plain value slices.
//!
//! Degenerate inputs (empty slices, zero windows, zero ranges) resolve to
//! defined defaults rather than errors.

use serde::{Deserialize, Serialize};

use super::rounding::{round2, round3};

/// Minimum and maximum of a series.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

/// Trailing-window means, rounded to 2 decimals.
///
/// Returns `len - window + 1` values, or nothing when `window` is zero or
/// longer than the input. The output is not paired with dates; the value at
/// index `i` covers inputs `i..i + window`.
pub fn moving_average(values: &[f64], window: usize) -> Vec<f64> {
    if window == 0 || window > values.len() {
        return Vec::new();
    }

    values
        .windows(window)
        .map(|w| round2(w.iter().sum::<f64>() / window as f64))
        .collect()
}

/// Sample standard deviation (n - 1), rounded to 3 decimals; `0` below two values.
pub fn volatility(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);

    round3(variance.sqrt())
}

/// `{0, 0}` for an empty slice.
pub fn range(values: &[f64]) -> ValueRange {
    if values.is_empty() {
        return ValueRange::default();
    }

    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in values {
        min = min.min(v);
        max = max.max(v);
    }

    ValueRange { min, max }
}

/// Min-max scaling to `[0, 1]`, rounded to 3 decimals.
///
/// A zero-width range maps every value to `0`.
pub fn normalize(values: &[f64]) -> Vec<f64> {
    let ValueRange { min, max } = range(values);
    let width = max - min;
    if width == 0.0 {
        return vec![0.0; values.len()];
    }

    values.iter().map(|v| round3((v - min) / width)).collect()
}
