//! Overtime records.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::hours::compute_hours;
use super::tiers::{bucket, pay, DayKind};
use crate::error::ValidationError;

/// One submitted overtime entry. Derived fields are computed once at
/// creation; records are never edited, only deleted and re-created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OvertimeRecord {
    pub date: NaiveDate,
    pub owner_key: String,
    pub day_kind: DayKind,
    pub total_hours: f64,
    pub hourly_wage: f64,
    pub tier_a_hours: f64,
    pub tier_b_hours: f64,
    pub tier_c_hours: f64,
    pub total_pay: i64,
}

impl OvertimeRecord {
    /// Build a record from a start/end clock-time pair.
    ///
    /// # Errors
    /// Returns a validation error for a blank owner key, an owner key with
    /// control characters (line breaks would split a ledger row), or a
    /// negative or non-finite wage.
    pub fn from_shift(
        owner_key: impl Into<String>,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
        day_kind: DayKind,
        hourly_wage: f64,
    ) -> Result<Self, ValidationError> {
        Self::from_hours(owner_key, date, compute_hours(start, end), day_kind, hourly_wage)
    }

    /// Build a record from an already-known number of hours.
    ///
    /// # Errors
    /// Same as [`OvertimeRecord::from_shift`], plus negative or non-finite
    /// hours.
    pub fn from_hours(
        owner_key: impl Into<String>,
        date: NaiveDate,
        total_hours: f64,
        day_kind: DayKind,
        hourly_wage: f64,
    ) -> Result<Self, ValidationError> {
        let owner_key = owner_key.into();
        if owner_key.trim().is_empty() {
            return Err(ValidationError::invalid("owner_key", "must not be empty"));
        }
        if owner_key.chars().any(char::is_control) {
            return Err(ValidationError::invalid(
                "owner_key",
                "must not contain control characters such as line breaks",
            ));
        }
        if !hourly_wage.is_finite() || hourly_wage < 0.0 {
            return Err(ValidationError::invalid(
                "hourly_wage",
                format!("must be a non-negative number, got {hourly_wage}"),
            ));
        }
        if !total_hours.is_finite() || total_hours < 0.0 {
            return Err(ValidationError::invalid(
                "total_hours",
                format!("must be a non-negative number, got {total_hours}"),
            ));
        }

        let tiers = bucket(total_hours, day_kind);
        Ok(Self {
            date,
            owner_key,
            day_kind,
            total_hours,
            hourly_wage,
            tier_a_hours: tiers.tier_a,
            tier_b_hours: tiers.tier_b,
            tier_c_hours: tiers.tier_c,
            total_pay: pay(tiers, hourly_wage),
        })
    }
}
