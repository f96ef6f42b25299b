//! Day-over-day percent change and its sign.

/// Percent change of a forward-filled series.
///
/// Missing (non-finite) values are replaced by the last finite value before
/// differencing. The first output, and any output without a finite
/// predecessor or with a zero predecessor, is `None`.
pub fn pct_change(values: &[f64]) -> Vec<Option<f64>> {
    let mut result = Vec::with_capacity(values.len());
    let mut last: Option<f64> = None;

    for &v in values {
        let current = if v.is_finite() { Some(v) } else { last };
        let change = match (last, current) {
            (Some(prev), Some(curr)) if prev != 0.0 => Some((curr - prev) / prev * 100.0),
            _ => None,
        };
        result.push(change);
        last = current;
    }

    result
}

/// Sign of each change: `-1`, `0` or `+1`, `None` where the change is undefined.
pub fn sign_of_change(changes: &[Option<f64>]) -> Vec<Option<i8>> {
    changes
        .iter()
        .map(|c| {
            c.map(|v| {
                if v > 0.0 {
                    1
                } else if v < 0.0 {
                    -1
                } else {
                    0
                }
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn pct_change_basic() {
        let result = pct_change(&[100.0, 110.0, 99.0]);
        assert!(result[0].is_none());
        assert_relative_eq!(result[1].unwrap(), 10.0, epsilon = 1e-10);
        assert_relative_eq!(result[2].unwrap(), -10.0, epsilon = 1e-10);
    }

    #[test]
    fn pct_change_forward_fills_gaps() {
        let result = pct_change(&[100.0, f64::NAN, 110.0]);
        // The gap repeats 100, so the change across it is 0 then 10%.
        assert_relative_eq!(result[1].unwrap(), 0.0);
        assert_relative_eq!(result[2].unwrap(), 10.0, epsilon = 1e-10);
    }

    #[test]
    fn pct_change_leading_gap() {
        let result = pct_change(&[f64::NAN, 100.0, 105.0]);
        assert!(result[0].is_none());
        assert!(result[1].is_none());
        assert_relative_eq!(result[2].unwrap(), 5.0, epsilon = 1e-10);
    }

    #[test]
    fn sign_values() {
        let signs = sign_of_change(&[None, Some(2.5), Some(-0.1), Some(0.0)]);
        assert_eq!(signs, vec![None, Some(1), Some(-1), Some(0)]);
    }
}
