//! Calendar-day exchange format.
//!
//! Calendar days travel as `YYYY-MM-DD` strings everywhere: storage, the
//! remote API and user input. A day is a plain calendar date with no time zone
//! attached, so formatting and parsing never drift across zones.

use chrono::NaiveDate;

use crate::error::{FiatError, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Hint shown to users alongside a rejected date.
pub const DATE_INPUT_HINT: &str = "use YYYY-MM-DD, e.g. 2025-08-14";

/// Parses user input in the exact `YYYY-MM-DD` shape.
///
/// Returns `None` for anything else: wrong separators, unpadded fields,
/// surrounding text, or out-of-range values such as `2025-13-40`.
pub fn parse_date_input(input: &str) -> Option<NaiveDate> {
    let bytes = input.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    let digits_ok = bytes
        .iter()
        .enumerate()
        .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !digits_ok {
        return None;
    }

    let year: i32 = input[0..4].parse().ok()?;
    let month: u32 = input[5..7].parse().ok()?;
    let day: u32 = input[8..10].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Formats a calendar day as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Like [`parse_date_input`] but yields a user-facing validation error.
pub fn require_date(field: &'static str, input: &str) -> Result<NaiveDate> {
    parse_date_input(input.trim())
        .ok_or_else(|| FiatError::validation(field, format!("invalid date, {DATE_INPUT_HINT}")))
}

/// Parses an optional date field: blank input means "no date".
pub fn optional_date(field: &'static str, input: Option<&str>) -> Result<Option<NaiveDate>> {
    match input.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => require_date(field, s).map(Some),
    }
}
