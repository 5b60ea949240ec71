use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::Subcommand;
use deskmate_core::overtime::{export_csv, export_xlsx, parse_clock, summarize, ExportFormat};
use deskmate_core::storage::open_store;
use deskmate_core::{Config, DayKind, HolidayCalendar, OvertimeRecord, PayPeriod};

#[derive(Subcommand)]
pub enum OvertimeAction {
    /// Record an overtime shift
    Add {
        /// Shift date, YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Start time, HH:MM
        #[arg(long)]
        start: String,
        /// End time, HH:MM (earlier than start means past midnight)
        #[arg(long)]
        end: String,
        /// Employee key (default: overtime.default_owner)
        #[arg(long)]
        owner: Option<String>,
        /// Hourly wage (default: overtime.hourly_wage)
        #[arg(long)]
        wage: Option<f64>,
        /// workday or holiday (default: inferred from the calendar)
        #[arg(long)]
        kind: Option<DayKind>,
    },
    /// List records
    List {
        #[arg(long)]
        owner: Option<String>,
        /// Pay period, YYYY-MM (21st of the previous month to the 20th)
        #[arg(long)]
        period: Option<PayPeriod>,
    },
    /// Delete every record for an owner on a date
    Delete {
        #[arg(long)]
        date: NaiveDate,
        #[arg(long)]
        owner: Option<String>,
    },
    /// Total hours and pay for a pay period
    Summary {
        /// Pay period, YYYY-MM (default: the period containing today)
        #[arg(long)]
        period: Option<PayPeriod>,
        #[arg(long)]
        owner: Option<String>,
    },
    /// Export records as CSV or an Excel workbook
    Export {
        #[arg(long)]
        out: PathBuf,
        /// csv or xlsx (default: from the --out extension)
        #[arg(long)]
        format: Option<ExportFormat>,
        #[arg(long)]
        owner: Option<String>,
        #[arg(long)]
        period: Option<PayPeriod>,
    },
    /// Show the default day kind for a date
    Kind { date: NaiveDate },
}

pub fn run(action: OvertimeAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    match action {
        OvertimeAction::Add {
            date,
            start,
            end,
            owner,
            wage,
            kind,
        } => {
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let owner = resolve_owner(&config, owner)?;
            let wage = wage
                .or(config.overtime.hourly_wage)
                .ok_or("no hourly wage: pass --wage or set overtime.hourly_wage")?;
            let kind = kind.unwrap_or_else(|| {
                HolidayCalendar::from_config(&config.calendar).default_day_kind(date)
            });

            let record = OvertimeRecord::from_shift(
                owner,
                date,
                parse_clock(&start)?,
                parse_clock(&end)?,
                kind,
                wage,
            )?;
            let mut store = open_store(&config.overtime)?;
            store.append(&record)?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        OvertimeAction::List { owner, period } => {
            let store = open_store(&config.overtime)?;
            let records = match period {
                Some(period) => store.list_in_period(owner.as_deref(), &period)?,
                None => store.list(owner.as_deref())?,
            };
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        OvertimeAction::Delete { date, owner } => {
            let owner = resolve_owner(&config, owner)?;
            let mut store = open_store(&config.overtime)?;
            let removed = store.delete(&owner, date)?;
            if removed == 0 {
                return Err(format!("no record for {owner} on {date}").into());
            }
            println!("deleted {removed} record(s)");
        }
        OvertimeAction::Summary { period, owner } => {
            let period = match period {
                Some(period) => period,
                None => PayPeriod::containing(Local::now().date_naive())?,
            };
            let owner = owner.or_else(|| config.overtime.default_owner.clone());
            let store = open_store(&config.overtime)?;
            let records = store.list_in_period(owner.as_deref(), &period)?;
            let summary = summarize(period, &records);
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        OvertimeAction::Export {
            out,
            format,
            owner,
            period,
        } => {
            let store = open_store(&config.overtime)?;
            let records = match period {
                Some(period) => store.list_in_period(owner.as_deref(), &period)?,
                None => store.list(owner.as_deref())?,
            };
            match format.unwrap_or_else(|| ExportFormat::for_path(&out)) {
                ExportFormat::Csv => export_csv(BufWriter::new(File::create(&out)?), &records)?,
                ExportFormat::Xlsx => export_xlsx(&out, &records)?,
            }
            println!("exported {} record(s) to {}", records.len(), out.display());
        }
        OvertimeAction::Kind { date } => {
            let calendar = HolidayCalendar::from_config(&config.calendar);
            println!("{}", calendar.default_day_kind(date));
        }
    }
    Ok(())
}

fn resolve_owner(
    config: &Config,
    owner: Option<String>,
) -> Result<String, Box<dyn std::error::Error>> {
    owner
        .or_else(|| config.overtime.default_owner.clone())
        .ok_or_else(|| "no owner: pass --owner or set overtime.default_owner".into())
}
