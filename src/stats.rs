//! Descriptive statistics over lap-time and speed samples
//!
//! Mean and variance go through trueno's SIMD reductions. trueno works in
//! `f32`, which cannot hold millisecond differences on a ~100 s lap, so
//! values are shifted before the cast (by the first sample for the mean, by
//! the mean for the variance) and the shift is handled in `f64`. Median,
//! min and max are order statistics and are computed exactly in `f64`: a
//! lap sitting on the median must compare equal to it.
//!
//! Every function returns `None` on empty input instead of a sentinel value.

use trueno::Vector;

/// Summary of a sample
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1); `None` for a single value
    pub std_dev: Option<f64>,
    pub min: f64,
    pub max: f64,
    pub median: f64,
}

/// Residuals around `pivot` as an `f32` vector
fn residuals(values: &[f64], pivot: f64) -> Vector<f32> {
    let shifted: Vec<f32> = values.iter().map(|&x| (x - pivot) as f32).collect();
    Vector::from_slice(&shifted)
}

/// Arithmetic mean
pub fn mean(values: &[f64]) -> Option<f64> {
    let pivot = *values.first()?;
    let offset = residuals(values, pivot).mean().ok()?;
    Some(pivot + f64::from(offset))
}

/// Median, averaging the two middle values on even length
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

/// Sample standard deviation with Bessel's correction
///
/// trueno reports population variance, so it is rescaled by n / (n - 1).
/// Variance is shift-invariant; centring on the mean keeps trueno's
/// `E[x^2] - mean^2` from cancelling in `f32`.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let population = f64::from(residuals(values, mean(values)?).variance().ok()?);
    Some((population.max(0.0) * n / (n - 1.0)).sqrt())
}

pub fn min(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

pub fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

/// Compute all summary statistics in one pass over the input
pub fn summarize(values: &[f64]) -> Option<Summary> {
    Some(Summary {
        count: values.len(),
        mean: mean(values)?,
        std_dev: sample_std_dev(values),
        min: min(values)?,
        max: max(values)?,
        median: median(values)?,
    })
}
