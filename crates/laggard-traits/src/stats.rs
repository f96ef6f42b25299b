//! Statistical utility functions for cross-sectional filtering.
//!
//! Quantiles here are always computed over one month's cross-section, never
//! across time. Non-finite inputs are ignored by every function.

use ndarray::ArrayView1;

/// Minimum threshold for standard deviation to avoid division by zero.
/// Values below this threshold are treated as zero variance.
pub const MIN_STD_THRESHOLD: f64 = 1e-10;

fn finite_sorted(values: &[f64]) -> Vec<f64> {
    let mut finite: Vec<f64> = values.iter().copied().filter(|x| x.is_finite()).collect();
    finite.sort_by(f64::total_cmp);
    finite
}

/// Quantile with linear interpolation between closest ranks.
///
/// For sorted values `v` of length `n` the result is
/// `v[lo] + (v[hi] - v[lo]) * (pos - lo)` with `pos = q * (n - 1)`, matching
/// the default definition used by most dataframe libraries.
///
/// Returns `None` for an empty input or `q` outside `[0, 1]`.
///
/// # Examples
///
/// ```
/// use laggard_traits::stats::quantile;
///
/// let values = vec![4.0, 1.0, 3.0, 2.0];
/// assert_eq!(quantile(&values, 0.5), Some(2.5));
/// assert_eq!(quantile(&values, 1.0), Some(4.0));
/// ```
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if !(0.0..=1.0).contains(&q) {
        return None;
    }

    let sorted = finite_sorted(values);
    if sorted.is_empty() {
        return None;
    }

    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;

    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Number of distinct finite values.
pub fn distinct_count(values: &[f64]) -> usize {
    let sorted = finite_sorted(values);
    let mut count = 0;
    let mut last: Option<f64> = None;
    for v in sorted {
        if last != Some(v) {
            count += 1;
            last = Some(v);
        }
    }
    count
}

/// Whether a cross-section is too degenerate to filter on.
///
/// A threshold over fewer than two distinct values cannot separate anything,
/// so quantile filters treat such a cross-section as a no-op.
pub fn is_degenerate(values: &[f64]) -> bool {
    distinct_count(values) < 2
}

/// Arithmetic mean of the finite values, `None` when there are none.
pub fn mean(values: &[f64]) -> Option<f64> {
    let finite: Vec<f64> = values.iter().copied().filter(|x| x.is_finite()).collect();
    if finite.is_empty() {
        return None;
    }
    ArrayView1::from(&finite[..]).mean()
}

/// Sample standard deviation (N-1 denominator) of the finite values.
///
/// Returns `None` with fewer than two observations.
///
/// # Examples
///
/// ```
/// use laggard_traits::stats::sample_std;
///
/// let std = sample_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
/// assert!((std - 2.138).abs() < 1e-3);
/// assert_eq!(sample_std(&[1.0]), None);
/// ```
pub fn sample_std(values: &[f64]) -> Option<f64> {
    let finite: Vec<f64> = values.iter().copied().filter(|x| x.is_finite()).collect();
    if finite.len() < 2 {
        return None;
    }
    Some(ArrayView1::from(&finite[..]).std(1.0))
}

/// Round to a fixed number of decimals.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
