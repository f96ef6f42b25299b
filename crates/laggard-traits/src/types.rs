//! Common types used throughout the laggard workspace.
//!
//! This module defines the daily price bar, the calendar month key used for
//! monthly aggregation and the symbol/date aliases.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::LaggardError;

// Re-export date type from chrono
pub use chrono::NaiveDate as Date;

/// A market symbol identifier, e.g. `"AAPL"`.
pub type Symbol = String;

/// One symbol's trading day.
///
/// Bars are immutable once ingested. A bar only takes part in indicator
/// computation when [`Bar::is_tradable`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Trading date
    pub date: Date,
    /// Opening price
    pub open: f64,
    /// Session high
    pub high: f64,
    /// Session low
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Traded volume
    pub volume: f64,
}

impl Bar {
    /// Create a new bar.
    #[must_use]
    pub const fn new(date: Date, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Whether this bar is usable.
    ///
    /// Rejects bars with a missing (non-finite) OHLCV field, an inverted range
    /// (`high < low`) and flat ticks where `high == low`.
    #[must_use]
    pub fn is_tradable(&self) -> bool {
        let fields = [self.open, self.high, self.low, self.close, self.volume];
        fields.iter().all(|v| v.is_finite()) && self.high > self.low
    }
}

/// A calendar month, ordered chronologically.
///
/// Displayed and parsed as `yy-mm` (e.g. `24-03`), the key format used in
/// every report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    /// Create a month from a year and a 1-based month number.
    ///
    /// Returns `None` if `month` is not in `1..=12`.
    #[must_use]
    pub const fn new(year: i32, month: u32) -> Option<Self> {
        if month >= 1 && month <= 12 {
            Some(Self { year, month })
        } else {
            None
        }
    }

    /// The month containing `date`.
    #[must_use]
    pub fn from_date(date: Date) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Calendar year.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Month number, 1-based.
    #[must_use]
    pub const fn month(&self) -> u32 {
        self.month
    }

    /// The first calendar day of the month.
    #[must_use]
    pub fn first_day(&self) -> Date {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// The following calendar month.
    #[must_use]
    pub const fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// The preceding calendar month.
    #[must_use]
    pub const fn prev(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.year.rem_euclid(100), self.month)
    }
}

impl FromStr for Month {
    type Err = LaggardError;

    /// Parse a `yy-mm` key. Two-digit years map to 2000-2099.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LaggardError::InvalidDate(format!("Invalid month key: '{s}'"));

        let (yy, mm) = s.trim().split_once('-').ok_or_else(invalid)?;
        if yy.len() != 2 || mm.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = yy.parse().map_err(|_| invalid())?;
        let month: u32 = mm.parse().map_err(|_| invalid())?;

        Self::new(2000 + year, month).ok_or_else(invalid)
    }
}

impl From<Date> for Month {
    fn from(date: Date) -> Self {
        Self::from_date(date)
    }
}
