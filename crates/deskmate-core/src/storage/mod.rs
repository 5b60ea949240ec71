//! Persistence: configuration, the SQLite record store and the flat-file
//! ledger.
//!
//! Both record stores implement [`OvertimeStore`]. Mutating methods take
//! `&mut self`, so a single handle serializes every read-modify-write.

mod config;
pub mod database;
pub mod ledger;

pub use config::{
    CalendarConfig, Config, ModelConfig, OvertimeConfig, QuizConfig, StorageBackend,
};
pub use database::SqliteStore;
pub use ledger::LedgerStore;

use std::path::PathBuf;

use chrono::NaiveDate;

use crate::error::{Result, StorageError};
use crate::overtime::{OvertimeRecord, PayPeriod};

pub const DATA_DIR_ENV: &str = "DESKMATE_DATA_DIR";

/// Returns `$DESKMATE_DATA_DIR` if set, otherwise `~/.config/deskmate[-dev]/`
/// based on DESKMATE_ENV.
///
/// Set DESKMATE_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os(DATA_DIR_ENV) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("DESKMATE_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("deskmate-dev")
            } else {
                base_dir.join("deskmate")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StorageError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}

/// Append/list/delete access to overtime records.
pub trait OvertimeStore {
    fn append(&mut self, record: &OvertimeRecord) -> Result<()>;

    /// Records ordered by date then insertion, optionally for one owner.
    fn list(&self, owner_key: Option<&str>) -> Result<Vec<OvertimeRecord>>;

    /// Delete every record matching `(owner_key, date)`; returns how many
    /// were removed.
    fn delete(&mut self, owner_key: &str, date: NaiveDate) -> Result<usize>;

    fn list_in_period(
        &self,
        owner_key: Option<&str>,
        period: &PayPeriod,
    ) -> Result<Vec<OvertimeRecord>> {
        Ok(self
            .list(owner_key)?
            .into_iter()
            .filter(|r| period.contains(r.date))
            .collect())
    }
}

/// Open the store selected by `overtime.backend` inside the data directory.
pub fn open_store(config: &OvertimeConfig) -> Result<Box<dyn OvertimeStore>> {
    let dir = data_dir()?;
    Ok(match config.backend {
        StorageBackend::Sqlite => Box::new(SqliteStore::open(&dir.join("overtime.db"))?),
        StorageBackend::Ledger => Box::new(LedgerStore::open(dir.join("overtime.csv"))?),
    })
}
