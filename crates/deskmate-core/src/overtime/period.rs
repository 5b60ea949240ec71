//! Pay periods (21st of one month through the 20th of the next) and
//! per-period aggregation.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::record::OvertimeRecord;
use crate::error::ValidationError;

/// First day of a period within the previous month.
pub const PERIOD_START_DAY: u32 = 21;
/// Last day of a period within the target month.
pub const PERIOD_END_DAY: u32 = 20;

/// Inclusive date range `[start, end]` named by its target month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayPeriod {
    pub year: i32,
    pub month: u32,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl PayPeriod {
    /// Period for target `(year, month)`: previous month's 21st through this
    /// month's 20th.
    ///
    /// # Errors
    /// Returns [`ValidationError::InvalidMonth`] for a month outside 1..=12.
    pub fn for_month(year: i32, month: u32) -> Result<Self, ValidationError> {
        let end = NaiveDate::from_ymd_opt(year, month, PERIOD_END_DAY)
            .ok_or(ValidationError::InvalidMonth { month })?;
        let (prev_year, prev_month) = if month == 1 {
            (year - 1, 12)
        } else {
            (year, month - 1)
        };
        let start = NaiveDate::from_ymd_opt(prev_year, prev_month, PERIOD_START_DAY)
            .ok_or(ValidationError::InvalidMonth { month })?;
        Ok(Self {
            year,
            month,
            start,
            end,
        })
    }

    /// The period a given date belongs to: from the 21st on, the next
    /// month's period.
    ///
    /// # Errors
    /// Returns a validation error only when that period falls outside the
    /// representable calendar (the last days of `NaiveDate::MAX`'s year).
    pub fn containing(date: NaiveDate) -> Result<Self, ValidationError> {
        let (year, month) = if date.day() < PERIOD_START_DAY {
            (date.year(), date.month())
        } else if date.month() == 12 {
            (date.year() + 1, 1)
        } else {
            (date.year(), date.month() + 1)
        };
        Self::for_month(year, month)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl fmt::Display for PayPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for PayPeriod {
    type Err = ValidationError;

    /// Parse a `YYYY-MM` target month.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unparsable = || ValidationError::Unparsable {
            input: s.to_string(),
            expected: "a pay period (YYYY-MM)",
        };
        let (y, m) = s.trim().split_once('-').ok_or_else(unparsable)?;
        let year = y.parse::<i32>().map_err(|_| unparsable())?;
        let month = m.parse::<u32>().map_err(|_| unparsable())?;
        Self::for_month(year, month)
    }
}

/// Totals over the records that fall inside a period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodSummary {
    pub period: PayPeriod,
    pub total_hours: f64,
    pub total_pay: i64,
    pub record_count: usize,
}

/// Fold `records` that fall within `period`. Records outside it are ignored.
pub fn summarize<'a, I>(period: PayPeriod, records: I) -> PeriodSummary
where
    I: IntoIterator<Item = &'a OvertimeRecord>,
{
    let mut summary = PeriodSummary {
        period,
        total_hours: 0.0,
        total_pay: 0,
        record_count: 0,
    };
    for rec in records.into_iter().filter(|r| period.contains(r.date)) {
        summary.total_hours += rec.total_hours;
        summary.total_pay += rec.total_pay;
        summary.record_count += 1;
    }
    summary
}
