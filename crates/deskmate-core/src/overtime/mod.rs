//! Overtime tracking: shift hours, tier bucketing, pay, default day-kind
//! inference, pay periods and tabular export.

pub mod calendar;
pub mod export;
pub mod hours;
pub mod period;
pub mod record;
pub mod tiers;

pub use calendar::{HolidayCalendar, Jurisdiction};
pub use export::{export_csv, export_xlsx, ExportFormat, CSV_HEADER};
pub use hours::{compute_hours, parse_clock, parse_date};
pub use period::{summarize, PayPeriod, PeriodSummary};
pub use record::OvertimeRecord;
pub use tiers::{bucket, pay, DayKind, TierHours, TIER_A_RATE, TIER_B_RATE, TIER_C_RATE};
