//! Elapsed shift hours from clock times.

use chrono::{NaiveDate, NaiveTime};

use crate::error::ValidationError;

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Hours between two clock times on the same calendar date.
///
/// An end earlier than the start is read as falling on the next day, so
/// `23:00 -> 01:00` is 2 hours. Equal times are zero hours, never 24.
pub fn compute_hours(start: NaiveTime, end: NaiveTime) -> f64 {
    let mut secs = (end - start).num_seconds();
    if secs < 0 {
        secs += SECONDS_PER_DAY;
    }
    secs as f64 / 3600.0
}

/// Parse `HH:MM` or `HH:MM:SS`.
pub fn parse_clock(input: &str) -> Result<NaiveTime, ValidationError> {
    let s = input.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|_| ValidationError::Unparsable {
            input: input.to_string(),
            expected: "a clock time (HH:MM)",
        })
}

/// Parse an ISO `YYYY-MM-DD` date.
pub fn parse_date(input: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| ValidationError::Unparsable {
        input: input.to_string(),
        expected: "a date (YYYY-MM-DD)",
    })
}
