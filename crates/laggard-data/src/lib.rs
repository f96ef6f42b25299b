//! Input data for laggard: prices and the membership roster.
//!
//! - [`FmpClient`]: end-of-day prices from
//!   [Financial Modeling Prep](https://financialmodelingprep.com/)
//! - [`CsvBarStore`]: one CSV per symbol, refreshed when older than a
//!   freshness window; implements [`laggard_traits::BarSource`]
//! - [`load_roster`]: the dated constituent file
//!
//! # Usage
//!
//! ```rust,ignore
//! use laggard_data::{CsvBarStore, FmpClient, load_roster, default_since, refresh};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let roster = load_roster("data/sp500.csv", default_since())?;
//!     let store = CsvBarStore::new("data/bars");
//!     let client = FmpClient::from_env()?;
//!
//!     refresh(&client, &store, &roster.all_symbols(), default_since()).await;
//!     Ok(())
//! }
//! ```
//!
//! # Environment Variables
//!
//! Set `FMP_API_KEY` in your environment or `.env` file:
//!
//! ```bash
//! FMP_API_KEY=your_api_key_here
//! ```

mod client;
mod error;
mod roster;
mod store;
mod sync;
mod types;

pub use client::FmpClient;
pub use error::DataError;
pub use roster::{default_since, load_roster, parse_roster};
pub use store::{CsvBarStore, DEFAULT_MAX_AGE_HOURS};
pub use sync::{SyncReport, refresh};
pub use types::{HistoricalPrice, to_bars};

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;
