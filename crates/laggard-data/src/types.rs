//! Wire types of the price API.

use chrono::NaiveDate;
use laggard_traits::Bar;
use serde::{Deserialize, Serialize};

/// One end-of-day price record.
///
/// Price fields may be null or absent in the payload. They become NaN on the
/// bar, which drops that single bar from the indicator series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalPrice {
    /// Date.
    pub date: String,
    /// Open price.
    pub open: Option<f64>,
    /// High price.
    pub high: Option<f64>,
    /// Low price.
    pub low: Option<f64>,
    /// Close price.
    pub close: Option<f64>,
    /// Volume.
    pub volume: Option<f64>,
}

impl HistoricalPrice {
    /// Parse the date string into a NaiveDate.
    #[must_use]
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }

    /// Convert to a bar, `None` if the date does not parse.
    #[must_use]
    pub fn to_bar(&self) -> Option<Bar> {
        let date = self.parsed_date()?;
        let or_nan = |v: Option<f64>| v.unwrap_or(f64::NAN);
        Some(Bar::new(
            date,
            or_nan(self.open),
            or_nan(self.high),
            or_nan(self.low),
            or_nan(self.close),
            or_nan(self.volume),
        ))
    }
}

/// Convert API records to bars in ascending date order.
///
/// Records with an unparseable date are dropped. Records with a missing
/// price are kept as untradable bars.
#[must_use]
pub fn to_bars(prices: &[HistoricalPrice]) -> Vec<Bar> {
    let mut bars: Vec<Bar> = prices.iter().filter_map(HistoricalPrice::to_bar).collect();
    bars.sort_by_key(|b| b.date);
    bars
}
