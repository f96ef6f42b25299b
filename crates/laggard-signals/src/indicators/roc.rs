//! Rate of change.

/// Percentage change versus the value `period` steps earlier.
///
/// `roc[t] = (v[t] - v[t-period]) / v[t-period] * 100`. The first `period`
/// outputs are `None`; a zero or non-finite base also yields `None` rather
/// than an infinite value.
pub fn roc(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let n = values.len();
    let mut result = vec![None; n];

    if period == 0 {
        return result;
    }

    for i in period..n {
        let prev = values[i - period];
        let curr = values[i];
        if prev.is_finite() && curr.is_finite() && prev != 0.0 {
            result[i] = Some((curr - prev) / prev * 100.0);
        }
    }

    result
}
