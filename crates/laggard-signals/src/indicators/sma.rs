//! Simple moving average.

/// Trailing mean over `window` values.
///
/// The first `window - 1` outputs are `None`, as is any output whose window
/// contains a non-finite value. A zero window yields all `None`.
pub fn sma(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let n = values.len();
    let mut result = vec![None; n];

    if window == 0 || n < window {
        return result;
    }

    let mut sum = 0.0;
    let mut bad = 0usize;

    for i in 0..n {
        let entering = values[i];
        if entering.is_finite() {
            sum += entering;
        } else {
            bad += 1;
        }

        if i >= window {
            let leaving = values[i - window];
            if leaving.is_finite() {
                sum -= leaving;
            } else {
                bad -= 1;
            }
        }

        if i + 1 >= window && bad == 0 {
            result[i] = Some(sum / window as f64);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sma_5_basic() {
        let result = sma(&[10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0], 5);

        assert_eq!(result.len(), 7);
        assert!(result[..4].iter().all(Option::is_none));
        assert_relative_eq!(result[4].unwrap(), 12.0);
        assert_relative_eq!(result[5].unwrap(), 13.0);
        assert_relative_eq!(result[6].unwrap(), 14.0);
    }

    #[test]
    fn sma_1_is_identity() {
        let result = sma(&[100.0, 200.0, 300.0], 1);
        assert_eq!(result, vec![Some(100.0), Some(200.0), Some(300.0)]);
    }

    #[test]
    fn sma_nan_in_window() {
        let result = sma(&[10.0, 11.0, f64::NAN, 13.0, 14.0, 15.0], 3);
        assert!(result[2].is_none());
        assert!(result[3].is_none());
        assert!(result[4].is_none());
        assert_relative_eq!(result[5].unwrap(), 14.0);
    }

    #[test]
    fn sma_too_few_values() {
        assert!(sma(&[10.0, 11.0], 5).iter().all(Option::is_none));
        assert!(sma(&[10.0], 0).iter().all(Option::is_none));
    }

    #[test]
    fn sma_flat_series() {
        let flat = vec![100.0; 400];
        let result = sma(&flat, 100);
        assert!(result[98].is_none());
        assert_relative_eq!(result[99].unwrap(), 100.0);
        assert_relative_eq!(result[399].unwrap(), 100.0, epsilon = 1e-9);
    }
}
