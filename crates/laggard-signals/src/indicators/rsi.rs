//! Relative Strength Index with Wilder smoothing.

/// RSI over `period` close-to-close moves, in `[0, 100]`.
///
/// Average gain and loss are seeded from the simple mean of the first
/// `period` moves and then Wilder-smoothed. The first value lands at index
/// `period`. A window with no movement reads 50, no losses reads 100 and no
/// gains reads 0.
pub fn rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let n = closes.len();
    let mut result = vec![None; n];
    if period == 0 || n <= period {
        return result;
    }
    if closes[..=period].iter().any(|c| !c.is_finite()) {
        return result;
    }

    let p = period as f64;
    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    for i in 1..=period {
        let delta = closes[i] - closes[i - 1];
        if delta > 0.0 {
            avg_gain += delta;
        } else {
            avg_loss -= delta;
        }
    }
    avg_gain /= p;
    avg_loss /= p;
    result[period] = Some(from_averages(avg_gain, avg_loss));

    for i in (period + 1)..n {
        let delta = closes[i] - closes[i - 1];
        if !delta.is_finite() {
            break;
        }
        let (gain, loss) = if delta > 0.0 { (delta, 0.0) } else { (0.0, -delta) };
        avg_gain = (avg_gain * (p - 1.0) + gain) / p;
        avg_loss = (avg_loss * (p - 1.0) + loss) / p;
        result[i] = Some(from_averages(avg_gain, avg_loss));
    }

    result
}

fn from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_gain == 0.0 && avg_loss == 0.0 {
        50.0
    } else if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rsi_only_gains() {
        let closes: Vec<f64> = (0..10).map(|i| 100.0 + f64::from(i)).collect();
        let result = rsi(&closes, 3);
        assert!(result[2].is_none());
        assert_relative_eq!(result[3].unwrap(), 100.0);
        assert_relative_eq!(result[9].unwrap(), 100.0);
    }

    #[test]
    fn rsi_only_losses() {
        let closes: Vec<f64> = (0..10).map(|i| 100.0 - f64::from(i)).collect();
        let result = rsi(&closes, 3);
        assert_relative_eq!(result[3].unwrap(), 0.0);
    }

    #[test]
    fn rsi_flat_is_neutral() {
        let result = rsi(&[100.0; 8], 3);
        assert_relative_eq!(result[5].unwrap(), 50.0);
    }

    #[test]
    fn rsi_balanced_moves() {
        // +1, -1 alternating: equal seed averages.
        let result = rsi(&[10.0, 11.0, 10.0, 11.0, 10.0], 4);
        assert_relative_eq!(result[4].unwrap(), 50.0, epsilon = 1e-12);
    }

    #[test]
    fn rsi_stays_in_range() {
        let closes = [44.0, 44.3, 44.1, 43.6, 44.3, 44.8, 45.1, 45.4, 45.8, 46.1, 45.9];
        for value in rsi(&closes, 5).into_iter().flatten() {
            assert!((0.0..=100.0).contains(&value));
        }
    }
}
