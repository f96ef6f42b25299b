//! Aroon oscillator.

use laggard_traits::Bar;

/// Aroon up minus Aroon down over a `period + 1` bar window, in `[-100, 100]`.
///
/// Aroon up is `100 * (period - bars_since_high) / period`, Aroon down is the
/// same for the low. On ties the most recent extreme wins.
pub fn aroon_oscillator(bars: &[Bar], period: usize) -> Vec<Option<f64>> {
    let n = bars.len();
    let mut result = vec![None; n];
    if period == 0 {
        return result;
    }

    let p = period as f64;
    for i in period..n {
        let window = &bars[i - period..=i];
        if window.iter().any(|b| !b.high.is_finite() || !b.low.is_finite()) {
            continue;
        }

        let mut high_idx = 0;
        let mut low_idx = 0;
        for (j, bar) in window.iter().enumerate() {
            if bar.high >= window[high_idx].high {
                high_idx = j;
            }
            if bar.low <= window[low_idx].low {
                low_idx = j;
            }
        }

        let since_high = (period - high_idx) as f64;
        let since_low = (period - low_idx) as f64;
        let up = 100.0 * (p - since_high) / p;
        let down = 100.0 * (p - since_low) / p;
        result[i] = Some(up - down);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;
    use approx::assert_relative_eq;

    #[test]
    fn aroon_uptrend() {
        let closes: Vec<f64> = (0..10).map(|i| 100.0 + f64::from(i)).collect();
        let result = aroon_oscillator(&make_bars(&closes), 4);
        assert!(result[3].is_none());
        // Newest bar holds the high, oldest the low.
        assert_relative_eq!(result[4].unwrap(), 100.0);
    }

    #[test]
    fn aroon_downtrend() {
        let closes: Vec<f64> = (0..10).map(|i| 100.0 - f64::from(i)).collect();
        let result = aroon_oscillator(&make_bars(&closes), 4);
        assert_relative_eq!(result[9].unwrap(), -100.0);
    }

    #[test]
    fn aroon_flat_ties_to_latest() {
        let result = aroon_oscillator(&make_bars(&[50.0; 6]), 3);
        assert_relative_eq!(result[5].unwrap(), 0.0);
    }
}
