//! Rolling technical indicators over one symbol's daily series.
//!
//! Every function returns one value per input element, `None` while the
//! rolling window is warming up or when the value is mathematically undefined
//! (e.g. a zero denominator). Inputs are never reordered.

mod aroon;
mod atr;
mod change;
mod roc;
mod rsi;
mod sma;

pub use aroon::aroon_oscillator;
pub use atr::{atr, atr_percent, true_range};
pub use change::{pct_change, sign_of_change};
pub use roc::roc;
pub use rsi::rsi;
pub use sma::sma;

/// Create synthetic bars from close prices for testing.
///
/// open = previous close, high/low = max/min(open, close) ± 1, volume = 1000.
#[cfg(test)]
pub(crate) fn make_bars(closes: &[f64]) -> Vec<laggard_traits::Bar> {
    use laggard_traits::Bar;
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar::new(
                base_date + chrono::Duration::days(i as i64),
                open,
                open.max(close) + 1.0,
                open.min(close) - 1.0,
                close,
                1000.0,
            )
        })
        .collect()
}
