//! Loader for the dated constituent file.
//!
//! The file is a CSV with header `date,tickers`; each row lists every member
//! effective from that date, comma-separated inside one quoted field.

use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use laggard_traits::{MembershipRoster, RosterEntry};
use serde::Deserialize;
use tracing::info;

use crate::{Result, error::DataError};

/// Earliest effective date kept by default.
#[must_use]
pub fn default_since() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or(NaiveDate::MIN)
}

#[derive(Debug, Deserialize)]
struct RosterRow {
    date: String,
    tickers: String,
}

/// Load the roster from a file, keeping entries dated on or after `since`.
///
/// # Errors
///
/// A missing, unreadable or malformed file is an error; callers must not fall
/// back to an unrestricted universe.
pub fn load_roster(path: impl AsRef<Path>, since: NaiveDate) -> Result<MembershipRoster> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(DataError::Roster(format!("File not found: {}", path.display())));
    }
    let file = std::fs::File::open(path)?;
    let roster = parse_roster(file, since)?;
    info!(
        path = %path.display(),
        entries = roster.len(),
        first = ?roster.first_date(),
        last = ?roster.last_date(),
        "Loaded membership roster"
    );
    Ok(roster)
}

/// Parse roster CSV from any reader.
///
/// # Errors
///
/// Returns [`DataError::Roster`] for a bad header, date or an empty result.
pub fn parse_roster<R: Read>(reader: R, since: NaiveDate) -> Result<MembershipRoster> {
    let mut csv = csv::Reader::from_reader(reader);
    let mut entries = Vec::new();

    for (line, record) in csv.deserialize::<RosterRow>().enumerate() {
        let row = record.map_err(|e| DataError::Roster(format!("Row {}: {e}", line + 1)))?;
        let date = NaiveDate::parse_from_str(row.date.trim(), "%Y-%m-%d")
            .map_err(|e| DataError::Roster(format!("Row {}: bad date '{}': {e}", line + 1, row.date)))?;
        if date < since {
            continue;
        }
        let members = row
            .tickers
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_uppercase);
        entries.push(RosterEntry::new(date, members));
    }

    if entries.is_empty() {
        return Err(DataError::Roster(format!("No entries on or after {since}")));
    }
    Ok(MembershipRoster::new(entries))
}
