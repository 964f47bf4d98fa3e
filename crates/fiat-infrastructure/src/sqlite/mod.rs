//! On-device store backed by a single SQLite file.
//!
//! # Module Structure
//!
//! - `database`: lazily opened shared connection and idempotent schema
//! - `mood_store`: `SqliteMoodStore`, the local half of the mood pair
//! - `journal_repository`: `SqliteJournalRepository` over the `entries` table

mod database;
mod journal_repository;
mod mood_store;

pub use database::LocalDatabase;
pub use journal_repository::SqliteJournalRepository;
pub use mood_store::SqliteMoodStore;

use chrono::{DateTime, SecondsFormat, Utc};
use fiat_core::FiatError;

fn store_error(err: rusqlite::Error) -> FiatError {
    FiatError::local_store(err.to_string())
}

/// Fixed-width UTC timestamps so text order matches time order.
fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(column: &str, value: &str) -> Result<DateTime<Utc>, FiatError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| FiatError::local_store(format!("bad {column} '{value}': {e}")))
}
