//! Statutory overtime tiers and pay.
//!
//! | day kind | tier A (x1.33)      | tier B (x1.66)       | tier C (x2.0) |
//! |----------|---------------------|----------------------|---------------|
//! | workday  | first 2 hours       | hours beyond 2       | 0             |
//! | holiday  | 0                   | 0                    | all hours     |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const TIER_A_RATE: f64 = 1.33;
pub const TIER_B_RATE: f64 = 1.66;
pub const TIER_C_RATE: f64 = 2.0;

/// Workday hours paid at the tier A rate before tier B starts.
pub const TIER_A_CAP_HOURS: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayKind {
    Workday,
    Holiday,
}

impl DayKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DayKind::Workday => "workday",
            DayKind::Holiday => "holiday",
        }
    }
}

impl fmt::Display for DayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DayKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "workday" => Ok(DayKind::Workday),
            "holiday" => Ok(DayKind::Holiday),
            _ => Err(ValidationError::Unparsable {
                input: s.to_string(),
                expected: "a day kind (workday|holiday)",
            }),
        }
    }
}

/// Hours split across the three pay tiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TierHours {
    pub tier_a: f64,
    pub tier_b: f64,
    pub tier_c: f64,
}

impl TierHours {
    pub fn total(&self) -> f64 {
        self.tier_a + self.tier_b + self.tier_c
    }

    /// Rate-weighted hours before any rounding.
    pub fn weighted(&self) -> f64 {
        self.tier_a * TIER_A_RATE + self.tier_b * TIER_B_RATE + self.tier_c * TIER_C_RATE
    }
}

/// Split `total_hours` into tiers for the given day kind. Negative input is
/// treated as zero.
pub fn bucket(total_hours: f64, day_kind: DayKind) -> TierHours {
    let total = total_hours.max(0.0);
    match day_kind {
        DayKind::Workday => TierHours {
            tier_a: total.min(TIER_A_CAP_HOURS),
            tier_b: (total - TIER_A_CAP_HOURS).max(0.0),
            tier_c: 0.0,
        },
        DayKind::Holiday => TierHours {
            tier_a: 0.0,
            tier_b: 0.0,
            tier_c: total,
        },
    }
}

/// Total pay in whole currency units.
///
/// The rate-weighted hours are rounded to a whole number first, then
/// multiplied by the wage and rounded again. Both roundings are
/// half-away-from-zero (`f64::round`), so 2.5 weighted hours count as 3.
///
/// The conversion to `i64` saturates: a product beyond `i64::MAX` yields
/// `i64::MAX`, and NaN yields 0. Wages are validated as finite and
/// non-negative before a record is built, so only absurd wages reach the
/// ceiling.
pub fn pay(tiers: TierHours, hourly_wage: f64) -> i64 {
    (tiers.weighted().round() * hourly_wage).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn workday_under_cap() {
        assert_eq!(
            bucket(1.5, DayKind::Workday),
            TierHours { tier_a: 1.5, tier_b: 0.0, tier_c: 0.0 }
        );
    }

    #[test]
    fn workday_over_cap() {
        assert_eq!(
            bucket(3.0, DayKind::Workday),
            TierHours { tier_a: 2.0, tier_b: 1.0, tier_c: 0.0 }
        );
    }

    #[test]
    fn holiday_is_all_tier_c() {
        assert_eq!(
            bucket(5.0, DayKind::Holiday),
            TierHours { tier_a: 0.0, tier_b: 0.0, tier_c: 5.0 }
        );
    }

    #[test]
    fn zero_and_negative_hours() {
        assert_eq!(bucket(0.0, DayKind::Workday), TierHours::default());
        assert_eq!(bucket(-1.0, DayKind::Holiday), TierHours::default());
    }

    #[test]
    fn pay_rounds_weighted_hours_then_total() {
        let tiers = bucket(3.0, DayKind::Workday);
        let expected = ((2.0_f64 * 1.33 + 1.0 * 1.66).round() * 218.0).round() as i64;
        assert_eq!(pay(tiers, 218.0), expected);
        assert_eq!(pay(tiers, 218.0), 872);
    }

    #[test]
    fn holiday_pay() {
        assert_eq!(pay(bucket(4.0, DayKind::Holiday), 200.0), 1600);
        assert_eq!(pay(TierHours::default(), 200.0), 0);
    }

    #[test]
    fn fractional_wage_is_rounded() {
        // 1.33 weighted -> 1, times 190.5
        assert_eq!(pay(bucket(1.0, DayKind::Workday), 190.5), 191);
    }

    #[test]
    fn pay_saturates_instead_of_wrapping() {
        let day = bucket(24.0, DayKind::Holiday);
        assert_eq!(pay(day, f64::MAX), i64::MAX);
        assert_eq!(pay(day, 1e300), i64::MAX);
        assert_eq!(pay(day, f64::NAN), 0);
    }

    #[test]
    fn day_kind_parses_and_displays() {
        assert_eq!("Holiday".parse::<DayKind>().unwrap(), DayKind::Holiday);
        assert_eq!(DayKind::Workday.to_string(), "workday");
        assert!("weekend".parse::<DayKind>().is_err());
    }

    proptest! {
        #[test]
        fn tiers_sum_to_total(hours in 0.0f64..48.0, holiday in any::<bool>()) {
            let kind = if holiday { DayKind::Holiday } else { DayKind::Workday };
            let tiers = bucket(hours, kind);
            prop_assert!((tiers.total() - hours).abs() < 1e-9);
            prop_assert!(tiers.tier_a >= 0.0 && tiers.tier_b >= 0.0 && tiers.tier_c >= 0.0);
            if holiday {
                prop_assert_eq!(tiers.tier_a, 0.0);
                prop_assert_eq!(tiers.tier_b, 0.0);
            } else {
                prop_assert_eq!(tiers.tier_c, 0.0);
                prop_assert!(tiers.tier_a <= TIER_A_CAP_HOURS);
            }
        }
    }
}
