pub mod auth;
pub mod confession;
pub mod journal;
pub mod mood;
pub mod truth;

use chrono::{DateTime, Local, NaiveDate, Utc};
use colored::Colorize;
use fiat_application::SyncWarning;
use fiat_core::date::require_date;

/// Today's calendar day on this machine.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// `--date` value or today.
pub fn day_or_today(input: Option<&str>) -> fiat_core::Result<NaiveDate> {
    match input {
        Some(text) => require_date("date", text),
        None => Ok(today()),
    }
}

pub fn print_warnings(warnings: &[SyncWarning]) {
    for warning in warnings {
        eprintln!("{} {}", "warning:".yellow().bold(), warning);
    }
}

pub fn local_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}
