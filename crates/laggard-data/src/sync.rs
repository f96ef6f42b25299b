//! Refresh of the bar store from the price API.

use std::collections::BTreeSet;
use std::time::SystemTime;

use chrono::NaiveDate;
use laggard_traits::Symbol;
use tracing::{info, warn};

use crate::client::FmpClient;
use crate::error::DataError;
use crate::store::CsvBarStore;

/// Outcome of a refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Symbols downloaded and written
    pub fetched: Vec<Symbol>,
    /// Symbols whose file was still fresh
    pub fresh: Vec<Symbol>,
    /// Symbols that failed, with the reason
    pub failed: Vec<(Symbol, String)>,
}

/// Download every stale symbol into the store.
///
/// Symbols are fetched one at a time. A failure for one symbol is logged and
/// recorded; hitting the rate limit stops the refresh and marks the remaining
/// symbols as failed.
pub async fn refresh(
    client: &FmpClient,
    store: &CsvBarStore,
    symbols: &BTreeSet<Symbol>,
    from: NaiveDate,
) -> SyncReport {
    let now = SystemTime::now();
    let stale: BTreeSet<&Symbol> = store.stale(symbols, now).into_iter().collect();
    let mut report = SyncReport {
        fresh: symbols.iter().filter(|s| !stale.contains(s)).cloned().collect(),
        ..SyncReport::default()
    };

    let mut pending = stale.into_iter();
    while let Some(symbol) = pending.next() {
        let result = match client.daily_bars(symbol, from).await {
            Ok(bars) => store.write(symbol, &bars),
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => report.fetched.push(symbol.clone()),
            Err(DataError::RateLimitExceeded) => {
                warn!(%symbol, "Rate limit hit, stopping refresh");
                report
                    .failed
                    .push((symbol.clone(), DataError::RateLimitExceeded.to_string()));
                report.failed.extend(
                    pending.map(|s| (s.clone(), "Not attempted after rate limit".to_string())),
                );
                break;
            }
            Err(e) => {
                warn!(%symbol, error = %e, "Skipping symbol");
                report.failed.push((symbol.clone(), e.to_string()));
            }
        }
    }

    info!(
        fetched = report.fetched.len(),
        fresh = report.fresh.len(),
        failed = report.failed.len(),
        "Bar store refreshed"
    );
    report
}
