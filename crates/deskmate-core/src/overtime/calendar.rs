//! Default day-kind inference from a holiday calendar.
//!
//! A date defaults to [`DayKind::Holiday`] when it falls on a weekend day
//! (unless listed as a make-up workday), on a fixed national holiday of the
//! configured jurisdiction, or on an explicitly configured extra holiday.
//! Callers may always override the default.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::tiers::DayKind;
use crate::storage::CalendarConfig;

/// Source of fixed-date national holidays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Jurisdiction {
    /// Weekends and configured dates only.
    None,
    #[default]
    Taiwan,
}

impl Jurisdiction {
    /// Fixed (month, day) national holidays. Lunar-calendar holidays move
    /// every year and belong in `extra_holidays`.
    pub fn fixed_holidays(&self) -> &'static [(u32, u32)] {
        match self {
            Jurisdiction::None => &[],
            Jurisdiction::Taiwan => &[(1, 1), (2, 28), (4, 4), (4, 5), (5, 1), (10, 10)],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolidayCalendar {
    jurisdiction: Jurisdiction,
    weekend: Vec<Weekday>,
    extra_holidays: BTreeSet<NaiveDate>,
    makeup_workdays: BTreeSet<NaiveDate>,
}

impl Default for HolidayCalendar {
    fn default() -> Self {
        Self::new(Jurisdiction::default())
    }
}

impl HolidayCalendar {
    pub fn new(jurisdiction: Jurisdiction) -> Self {
        Self {
            jurisdiction,
            weekend: vec![Weekday::Sat, Weekday::Sun],
            extra_holidays: BTreeSet::new(),
            makeup_workdays: BTreeSet::new(),
        }
    }

    pub fn from_config(config: &CalendarConfig) -> Self {
        Self {
            jurisdiction: config.jurisdiction,
            weekend: config.weekend.clone(),
            extra_holidays: config.extra_holidays.iter().copied().collect(),
            makeup_workdays: config.makeup_workdays.iter().copied().collect(),
        }
    }

    pub fn with_extra_holiday(mut self, date: NaiveDate) -> Self {
        self.extra_holidays.insert(date);
        self
    }

    pub fn with_makeup_workday(mut self, date: NaiveDate) -> Self {
        self.makeup_workdays.insert(date);
        self
    }

    /// Public holiday of the jurisdiction or an extra configured holiday.
    /// Weekends are not considered here.
    pub fn is_public_holiday(&self, date: NaiveDate) -> bool {
        self.extra_holidays.contains(&date)
            || self
                .jurisdiction
                .fixed_holidays()
                .contains(&(date.month(), date.day()))
    }

    pub fn is_weekend(&self, date: NaiveDate) -> bool {
        self.weekend.contains(&date.weekday())
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        if self.is_public_holiday(date) {
            return true;
        }
        self.is_weekend(date) && !self.makeup_workdays.contains(&date)
    }

    pub fn default_day_kind(&self, date: NaiveDate) -> DayKind {
        if self.is_holiday(date) {
            DayKind::Holiday
        } else {
            DayKind::Workday
        }
    }
}
