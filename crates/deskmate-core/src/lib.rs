//! # Deskmate Core Library
//!
//! Business logic for two small desk tools that share a CLI: an AI quiz
//! runner and an overtime-pay tracker. Front ends own all state and pass it
//! in; nothing here keeps process-wide globals.
//!
//! ## Architecture
//!
//! - **Quiz**: model output parsing, tolerant answer grading, explicit quiz
//!   sessions, the wrong-answer pool, prompt building and a Gemini client
//! - **Overtime**: shift hours, statutory tier bucketing, pay, holiday-calendar
//!   day-kind inference, 21st-to-20th pay periods and CSV or Excel export
//! - **Storage**: TOML configuration plus SQLite and flat-file record stores
//!
//! ## Key Components
//!
//! - [`grade`]: Answer normalization and matching
//! - [`QuizSession`]: Answers in, [`ScoreReport`] out
//! - [`bucket`] / [`pay`]: Tier split and pay for a shift
//! - [`OvertimeStore`]: Append/list/delete persistence seam
//! - [`Config`]: Application configuration management

pub mod error;
pub mod overtime;
pub mod quiz;
pub mod storage;

pub use error::{
    ConfigError, CoreError, DatabaseError, ModelError, QuizError, StorageError, ValidationError,
};
pub use overtime::{
    bucket, compute_hours, pay, DayKind, HolidayCalendar, OvertimeRecord, PayPeriod, PeriodSummary,
    TierHours,
};
pub use quiz::{grade, grade_with, MatchMode, Question, QuizSession, ScoreReport, WrongPool};
pub use storage::{Config, LedgerStore, OvertimeStore, SqliteStore};
