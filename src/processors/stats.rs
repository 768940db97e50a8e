//! Descriptive statistics over extracted sample series.
//!
//! The aggregates follow the conventions of the original analysis tooling:
//! values are rounded to 6 decimals before aggregation, the standard
//! deviation is the sample estimate (ddof = 1, NaN for a single sample) and
//! percentiles use linear interpolation between order statistics.

use std::fmt;

/// Number of decimal digits values are rounded to before aggregation.
const ROUND_DIGITS: i32 = 6;

/// Descriptive statistics of one numeric sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptiveStats {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (ddof = 1); NaN when count == 1.
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl fmt::Display for DescriptiveStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "count  {:>14.6}", self.count as f64)?;
        writeln!(f, "mean   {:>14.6}", self.mean)?;
        writeln!(f, "std    {:>14.6}", self.std)?;
        writeln!(f, "min    {:>14.6}", self.min)?;
        writeln!(f, "25%    {:>14.6}", self.q25)?;
        writeln!(f, "50%    {:>14.6}", self.median)?;
        writeln!(f, "75%    {:>14.6}", self.q75)?;
        write!(f, "max    {:>14.6}", self.max)
    }
}

/// Round a value to [`ROUND_DIGITS`] decimals.
#[inline]
fn round6(value: f64) -> f64 {
    let factor = 10f64.powi(ROUND_DIGITS);
    (value * factor).round() / factor
}

/// Compute descriptive statistics over a sequence.
///
/// Values are rounded to 6 decimals before aggregation. Returns `None` for
/// an empty input.
pub fn describe(values: &[f64]) -> Option<DescriptiveStats> {
    if values.is_empty() {
        return None;
    }

    let n = values.len();
    let rounded: Vec<f64> = values.iter().map(|&v| round6(v)).collect();

    let mean = rounded.iter().sum::<f64>() / n as f64;

    let std = if n > 1 {
        let sum_sq: f64 = rounded.iter().map(|&v| (v - mean) * (v - mean)).sum();
        (sum_sq / (n - 1) as f64).sqrt()
    } else {
        f64::NAN
    };

    let mut sorted = rounded;
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    Some(DescriptiveStats {
        count: n,
        mean,
        std,
        min: sorted[0],
        q25: percentile_sorted(&sorted, 0.25),
        median: percentile_sorted(&sorted, 0.50),
        q75: percentile_sorted(&sorted, 0.75),
        max: sorted[n - 1],
    })
}

/// Linear-interpolation percentile of an ascending-sorted slice.
///
/// `q` is a fraction in `[0, 1]`. The slice must be non-empty.
fn percentile_sorted(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }

    let pos = q * (n - 1) as f64;
    let lower = pos.floor() as usize;
    let frac = pos - lower as f64;

    if lower + 1 < n {
        sorted[lower] + frac * (sorted[lower + 1] - sorted[lower])
    } else {
        sorted[lower]
    }
}

/// First-difference sequence: `[x1 - x0, x2 - x1, ..., xn - x(n-1)]`.
///
/// The result is one element shorter than the input; an input with fewer
/// than two elements yields an empty sequence.
pub fn first_difference(values: &[f64]) -> Vec<f64> {
    values.windows(2).map(|w| w[1] - w[0]).collect()
}
