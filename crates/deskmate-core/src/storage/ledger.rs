//! Flat-file overtime ledger.
//!
//! A CSV file with the export header: writes append one line, deletes
//! rewrite the whole file through a temporary sibling and a rename.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{debug, warn};

use super::OvertimeStore;
use crate::error::{Result, StorageError};
use crate::overtime::export::{decode_row, encode_row, export_csv, header_line, logical_rows};
use crate::overtime::OvertimeRecord;

pub struct LedgerStore {
    path: PathBuf,
}

impl LedgerStore {
    /// Open the ledger at `path`, writing the header if the file is new.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            fs::write(&path, format!("{}\n", header_line())).map_err(|e| io_err(&path, e))?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Vec<OvertimeRecord>> {
        let content = fs::read_to_string(&self.path).map_err(|e| io_err(&self.path, e))?;
        let mut records = Vec::new();
        for (line, row) in logical_rows(&content) {
            if line == 1 || row.trim().is_empty() {
                continue;
            }
            let record = decode_row(&row).map_err(|message| StorageError::MalformedRow {
                path: self.path.clone(),
                line,
                message,
            })?;
            records.push(record);
        }
        Ok(records)
    }

    fn rewrite(&self, records: &[OvertimeRecord]) -> Result<()> {
        let tmp = self.path.with_extension("csv.tmp");
        let file = fs::File::create(&tmp).map_err(|e| io_err(&tmp, e))?;
        export_csv(file, records).map_err(|e| io_err(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| io_err(&self.path, e))?;
        Ok(())
    }
}

fn io_err(path: &Path, source: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl OvertimeStore for LedgerStore {
    fn append(&mut self, record: &OvertimeRecord) -> Result<()> {
        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| io_err(&self.path, e))?;
        writeln!(file, "{}", encode_row(record)).map_err(|e| io_err(&self.path, e))?;
        debug!(owner = %record.owner_key, date = %record.date, "appended ledger row");
        Ok(())
    }

    fn list(&self, owner_key: Option<&str>) -> Result<Vec<OvertimeRecord>> {
        let mut records = self.read_all()?;
        if let Some(owner) = owner_key {
            records.retain(|r| r.owner_key == owner);
        }
        // Stable sort keeps insertion order within a date.
        records.sort_by_key(|r| r.date);
        Ok(records)
    }

    fn delete(&mut self, owner_key: &str, date: NaiveDate) -> Result<usize> {
        let mut records = self.read_all()?;
        let before = records.len();
        records.retain(|r| !(r.owner_key == owner_key && r.date == date));
        let removed = before - records.len();
        if removed == 0 {
            return Ok(0);
        }
        if removed > 1 {
            warn!(owner = owner_key, %date, removed, "deleted several records sharing one date");
        }
        self.rewrite(&records)?;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overtime::DayKind;

    fn rec(owner: &str, day: u32, hours: f64) -> OvertimeRecord {
        OvertimeRecord::from_hours(
            owner,
            NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            hours,
            DayKind::Holiday,
            150.0,
        )
        .unwrap()
    }

    #[test]
    fn new_ledger_has_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let store = LedgerStore::open(dir.path().join("ot.csv")).unwrap();
        let text = fs::read_to_string(store.path()).unwrap();
        assert_eq!(text, format!("{}\n", header_line()));
        assert!(store.list(None).unwrap().is_empty());
    }

    #[test]
    fn append_list_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ot.csv");
        {
            let mut store = LedgerStore::open(&path).unwrap();
            store.append(&rec("alice", 9, 2.0)).unwrap();
            store.append(&rec("alice", 2, 1.5)).unwrap();
            store.append(&rec("bob", 3, 4.0)).unwrap();
        }
        let store = LedgerStore::open(&path).unwrap();
        let alice = store.list(Some("alice")).unwrap();
        assert_eq!(alice.len(), 2);
        assert_eq!(alice[0], rec("alice", 2, 1.5));
        assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 4);
    }

    #[test]
    fn delete_rewrites_without_matches() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = LedgerStore::open(dir.path().join("ot.csv")).unwrap();
        store.append(&rec("alice", 5, 1.0)).unwrap();
        store.append(&rec("alice", 5, 2.0)).unwrap();
        store.append(&rec("bob", 5, 2.0)).unwrap();

        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(store.delete("alice", date).unwrap(), 2);
        assert_eq!(store.delete("alice", date).unwrap(), 0);
        assert_eq!(store.list(None).unwrap(), vec![rec("bob", 5, 2.0)]);
    }

    #[test]
    fn quoted_line_break_does_not_poison_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ot.csv");
        let mut store = LedgerStore::open(&path).unwrap();
        store.append(&rec("bob", 4, 1.0)).unwrap();

        // Validation refuses the owner outright.
        let bad = OvertimeRecord::from_hours(
            "ali\nce",
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            1.0,
            DayKind::Holiday,
            150.0,
        );
        assert!(bad.is_err());

        // A hand-edited file with a quoted multi-line owner still reads.
        let mut text = fs::read_to_string(&path).unwrap();
        text.push_str("2024-03-05,\"ali\nce\",holiday,1,150,0,0,1,300\n");
        fs::write(&path, text).unwrap();
        store.append(&rec("carol", 6, 2.0)).unwrap();

        assert_eq!(store.list(Some("bob")).unwrap(), vec![rec("bob", 4, 1.0)]);
        let all = store.list(None).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[1].owner_key, "ali\nce");

        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(store.delete("ali\nce", date).unwrap(), 1);
        assert_eq!(store.list(None).unwrap().len(), 2);
    }

    #[test]
    fn malformed_row_reports_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ot.csv");
        fs::write(&path, format!("{}\nnot,a,row\n", header_line())).unwrap();
        let store = LedgerStore::open(&path).unwrap();
        let err = store.list(None).unwrap_err();
        assert!(err.to_string().contains("row 2"), "{err}");
    }
}
