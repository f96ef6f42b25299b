//! Average True Range with Wilder smoothing.
//!
//! True range is `max(high - low, |high - prev_close|, |low - prev_close|)`.
//! The first TR value has no previous close and is left undefined, so the
//! smoothing is seeded from the mean of TR[1..=period].

use laggard_traits::Bar;

/// True range per bar; index 0 is `None`.
pub fn true_range(bars: &[Bar]) -> Vec<Option<f64>> {
    let mut result = vec![None; bars.len()];
    for i in 1..bars.len() {
        let bar = &bars[i];
        let prev_close = bars[i - 1].close;
        if !bar.is_tradable() || !prev_close.is_finite() {
            continue;
        }
        let tr = (bar.high - bar.low)
            .max((bar.high - prev_close).abs())
            .max((bar.low - prev_close).abs());
        result[i] = Some(tr);
    }
    result
}

/// Wilder-smoothed ATR over `period` bars.
///
/// The first value lands at index `period`. A missing TR after the seed ends
/// the series and later outputs stay `None`.
pub fn atr(bars: &[Bar], period: usize) -> Vec<Option<f64>> {
    let n = bars.len();
    let mut result = vec![None; n];
    if period == 0 || n <= period {
        return result;
    }

    let tr = true_range(bars);
    let seed: Option<f64> = tr[1..=period].iter().copied().sum();
    let Some(seed) = seed else {
        return result;
    };

    let p = period as f64;
    let mut prev = seed / p;
    result[period] = Some(prev);

    for i in (period + 1)..n {
        match tr[i] {
            Some(value) => {
                prev = (prev * (p - 1.0) + value) / p;
                result[i] = Some(prev);
            }
            None => break,
        }
    }

    result
}

/// ATR expressed as a percentage of the close.
pub fn atr_percent(bars: &[Bar], period: usize) -> Vec<Option<f64>> {
    atr(bars, period)
        .into_iter()
        .zip(bars)
        .map(|(value, bar)| match value {
            Some(a) if bar.close != 0.0 => Some(a / bar.close * 100.0),
            _ => None,
        })
        .collect()
}
