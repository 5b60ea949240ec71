//! Tabular encoding of overtime records: CSV and Excel workbooks.
//!
//! The same row layout backs the flat-file ledger and both export formats:
//! one header row, then one row per record. CSV fields containing a comma,
//! quote, CR or LF are quoted with embedded quotes doubled.

use std::fmt;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, XlsxError};

use super::hours::parse_date;
use super::record::OvertimeRecord;
use super::tiers::DayKind;
use crate::error::Result;

pub const CSV_HEADER: [&str; 9] = [
    "date",
    "owner_key",
    "type",
    "total_hours",
    "hourly_wage",
    "tier_a_hours",
    "tier_b_hours",
    "tier_c_hours",
    "total_pay",
];

/// Write the header and one row per record.
pub fn export_csv<'a, W, I>(mut writer: W, records: I) -> std::io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a OvertimeRecord>,
{
    writeln!(writer, "{}", CSV_HEADER.join(","))?;
    for rec in records {
        writeln!(writer, "{}", encode_row(rec))?;
    }
    writer.flush()
}

/// Download format for `export`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Csv,
    Xlsx,
}

impl ExportFormat {
    /// `.xlsx` (any case) means a workbook; anything else is CSV.
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("xlsx") => ExportFormat::Xlsx,
            _ => ExportFormat::Csv,
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        })
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "xlsx" | "excel" => Ok(ExportFormat::Xlsx),
            other => Err(format!("unknown export format: {other} (expected csv or xlsx)")),
        }
    }
}

/// One worksheet cell before it is written.
#[derive(Debug, Clone, PartialEq)]
enum SheetCell {
    Text(String),
    Number(f64),
}

/// Header row followed by one row per record, in [`CSV_HEADER`] order.
/// Hours, wage and pay stay numeric so the sheet can sum them.
fn sheet_rows<'a, I>(records: I) -> Vec<Vec<SheetCell>>
where
    I: IntoIterator<Item = &'a OvertimeRecord>,
{
    let header = CSV_HEADER
        .iter()
        .map(|name| SheetCell::Text((*name).to_string()))
        .collect();
    let mut rows = vec![header];
    for rec in records {
        rows.push(vec![
            SheetCell::Text(rec.date.format("%Y-%m-%d").to_string()),
            SheetCell::Text(rec.owner_key.clone()),
            SheetCell::Text(rec.day_kind.as_str().to_string()),
            SheetCell::Number(rec.total_hours),
            SheetCell::Number(rec.hourly_wage),
            SheetCell::Number(rec.tier_a_hours),
            SheetCell::Number(rec.tier_b_hours),
            SheetCell::Number(rec.tier_c_hours),
            SheetCell::Number(rec.total_pay as f64),
        ]);
    }
    rows
}

/// Build an "Overtime" workbook with a bold, frozen header row.
pub fn overtime_workbook<'a, I>(records: I) -> std::result::Result<Workbook, XlsxError>
where
    I: IntoIterator<Item = &'a OvertimeRecord>,
{
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Overtime")?;

    let header_format = Format::new()
        .set_bold()
        .set_align(FormatAlign::Center)
        .set_border(FormatBorder::Thin);
    let number_format = Format::new().set_num_format("0.00");

    for (r, row) in sheet_rows(records).into_iter().enumerate() {
        let r = r as u32;
        for (c, cell) in row.into_iter().enumerate() {
            let c = c as u16;
            match cell {
                SheetCell::Text(text) if r == 0 => {
                    worksheet.write_string_with_format(r, c, text, &header_format)?;
                }
                SheetCell::Text(text) => {
                    worksheet.write_string(r, c, text)?;
                }
                SheetCell::Number(n) => {
                    worksheet.write_number_with_format(r, c, n, &number_format)?;
                }
            }
        }
    }
    worksheet.set_freeze_panes(1, 0)?;
    worksheet.set_column_width(1, 16)?;

    Ok(workbook)
}

/// Write records as an `.xlsx` workbook at `path`.
pub fn export_xlsx<'a, I>(path: &Path, records: I) -> Result<()>
where
    I: IntoIterator<Item = &'a OvertimeRecord>,
{
    overtime_workbook(records)?.save(path)?;
    Ok(())
}

pub fn header_line() -> String {
    CSV_HEADER.join(",")
}

pub fn encode_row(rec: &OvertimeRecord) -> String {
    let fields = [
        rec.date.format("%Y-%m-%d").to_string(),
        escape(&rec.owner_key),
        rec.day_kind.to_string(),
        rec.total_hours.to_string(),
        rec.hourly_wage.to_string(),
        rec.tier_a_hours.to_string(),
        rec.tier_b_hours.to_string(),
        rec.tier_c_hours.to_string(),
        rec.total_pay.to_string(),
    ];
    fields.join(",")
}

/// Group physical lines into logical rows, joining lines while a quoted
/// field is still open. Each row carries the 1-based line it starts on.
pub fn logical_rows(content: &str) -> Vec<(usize, String)> {
    let mut rows = Vec::new();
    let mut pending: Option<(usize, String)> = None;

    for (i, line) in content.lines().enumerate() {
        let (start, row) = match pending.take() {
            Some((start, mut row)) => {
                row.push('\n');
                row.push_str(line);
                (start, row)
            }
            None => (i + 1, line.to_string()),
        };
        // An odd quote count means a quoted field runs onto the next line.
        if row.matches('"').count() % 2 == 1 {
            pending = Some((start, row));
        } else {
            rows.push((start, row));
        }
    }
    rows.extend(pending);
    rows
}

/// Decode one logical row back into a record. Stored derived values are taken
/// as-is rather than recomputed.
pub fn decode_row(line: &str) -> std::result::Result<OvertimeRecord, String> {
    let fields = split_line(line)?;
    if fields.len() != CSV_HEADER.len() {
        return Err(format!(
            "expected {} fields, found {}",
            CSV_HEADER.len(),
            fields.len()
        ));
    }

    let num = |i: usize| -> std::result::Result<f64, String> {
        fields[i]
            .parse::<f64>()
            .map_err(|_| format!("{}: '{}' is not a number", CSV_HEADER[i], fields[i]))
    };

    Ok(OvertimeRecord {
        date: parse_date(&fields[0]).map_err(|e| e.to_string())?,
        owner_key: fields[1].clone(),
        day_kind: fields[2].parse::<DayKind>().map_err(|e| e.to_string())?,
        total_hours: num(3)?,
        hourly_wage: num(4)?,
        tier_a_hours: num(5)?,
        tier_b_hours: num(6)?,
        tier_c_hours: num(7)?,
        total_pay: fields[8]
            .parse::<i64>()
            .map_err(|_| format!("total_pay: '{}' is not an integer", fields[8]))?,
    })
}

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn split_line(line: &str) -> std::result::Result<Vec<String>, String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, in_quotes) {
            ('"', true) if chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            ('"', true) => in_quotes = false,
            ('"', false) if current.is_empty() => in_quotes = true,
            (',', false) => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    if in_quotes {
        return Err("unterminated quoted field".into());
    }
    fields.push(current);
    Ok(fields)
}
