//! SQLite-based overtime record storage.
//!
//! Records go into a single append-only table; the autoincrement id keeps
//! insertion order for records sharing a date.

use std::path::Path;

use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use tracing::{debug, warn};

use super::OvertimeStore;
use crate::error::{DatabaseError, Result};
use crate::overtime::{DayKind, OvertimeRecord};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open (creating if needed) the database at `path`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS overtime_records (
                id            INTEGER PRIMARY KEY AUTOINCREMENT,
                date          TEXT NOT NULL,
                owner_key     TEXT NOT NULL,
                day_kind      TEXT NOT NULL,
                total_hours   REAL NOT NULL,
                hourly_wage   REAL NOT NULL,
                tier_a_hours  REAL NOT NULL,
                tier_b_hours  REAL NOT NULL,
                tier_c_hours  REAL NOT NULL,
                total_pay     INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_overtime_owner_date ON overtime_records(owner_key, date);",
        )?;
        Ok(())
    }

    fn read_row(row: &Row<'_>) -> rusqlite::Result<StoredRow> {
        Ok(StoredRow {
            id: row.get(0)?,
            date: row.get(1)?,
            owner_key: row.get(2)?,
            day_kind: row.get(3)?,
            total_hours: row.get(4)?,
            hourly_wage: row.get(5)?,
            tier_a_hours: row.get(6)?,
            tier_b_hours: row.get(7)?,
            tier_c_hours: row.get(8)?,
            total_pay: row.get(9)?,
        })
    }
}

/// A row as stored; date and kind stay text until validated.
struct StoredRow {
    id: i64,
    date: String,
    owner_key: String,
    day_kind: String,
    total_hours: f64,
    hourly_wage: f64,
    tier_a_hours: f64,
    tier_b_hours: f64,
    tier_c_hours: f64,
    total_pay: i64,
}

impl StoredRow {
    fn into_record(self) -> Result<OvertimeRecord, DatabaseError> {
        let corrupt = |message: String| DatabaseError::CorruptRow {
            row: self.id,
            message,
        };
        let date = NaiveDate::parse_from_str(&self.date, DATE_FORMAT)
            .map_err(|e| corrupt(format!("date '{}': {e}", self.date)))?;
        let day_kind = self
            .day_kind
            .parse::<DayKind>()
            .map_err(|e| corrupt(e.to_string()))?;
        Ok(OvertimeRecord {
            date,
            owner_key: self.owner_key,
            day_kind,
            total_hours: self.total_hours,
            hourly_wage: self.hourly_wage,
            tier_a_hours: self.tier_a_hours,
            tier_b_hours: self.tier_b_hours,
            tier_c_hours: self.tier_c_hours,
            total_pay: self.total_pay,
        })
    }
}

impl OvertimeStore for SqliteStore {
    fn append(&mut self, record: &OvertimeRecord) -> Result<()> {
        self.conn.execute(
            "INSERT INTO overtime_records
                (date, owner_key, day_kind, total_hours, hourly_wage,
                 tier_a_hours, tier_b_hours, tier_c_hours, total_pay)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                record.date.format(DATE_FORMAT).to_string(),
                record.owner_key,
                record.day_kind.as_str(),
                record.total_hours,
                record.hourly_wage,
                record.tier_a_hours,
                record.tier_b_hours,
                record.tier_c_hours,
                record.total_pay,
            ],
        )?;
        debug!(owner = %record.owner_key, date = %record.date, "appended overtime record");
        Ok(())
    }

    fn list(&self, owner_key: Option<&str>) -> Result<Vec<OvertimeRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, date, owner_key, day_kind, total_hours, hourly_wage,
                    tier_a_hours, tier_b_hours, tier_c_hours, total_pay
             FROM overtime_records
             WHERE ?1 IS NULL OR owner_key = ?1
             ORDER BY date, id",
        )?;
        let rows = stmt.query_map(params![owner_key], Self::read_row)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?.into_record()?);
        }
        Ok(records)
    }

    fn delete(&mut self, owner_key: &str, date: NaiveDate) -> Result<usize> {
        let removed = self.conn.execute(
            "DELETE FROM overtime_records WHERE owner_key = ?1 AND date = ?2",
            params![owner_key, date.format(DATE_FORMAT).to_string()],
        )?;
        if removed > 1 {
            warn!(owner = owner_key, %date, removed, "deleted several records sharing one date");
        }
        Ok(removed)
    }
}
