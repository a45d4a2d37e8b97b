//! Calendar command implementation.
//!
//! Lists exchange holidays, checks single dates and counts business days.

use anyhow::{bail, Result};
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use ntnb_core::calendars::{BrazilCalendar, BusinessDayConvention, Calendar};

use crate::cli::OutputFormat;
use crate::commands::{parse_date, today};
use crate::output::{print_header, print_output, print_success, print_warning, KeyValue};

/// Arguments for the calendar command.
#[derive(Args, Debug)]
pub struct CalendarArgs {
    /// List the holidays of a year
    #[arg(short, long)]
    pub year: Option<i32>,

    /// Check whether a date (YYYY-MM-DD) is a business day
    #[arg(long)]
    pub check: Option<String>,

    /// Start of a business-day count (inclusive)
    #[arg(long, requires = "to")]
    pub from: Option<String>,

    /// End of a business-day count (exclusive)
    #[arg(long, requires = "from")]
    pub to: Option<String>,
}

/// One holiday for display.
#[derive(Debug, Serialize, Tabled)]
pub struct HolidayRow {
    #[tabled(rename = "Date")]
    pub date: String,
    #[tabled(rename = "Weekday")]
    pub weekday: String,
    #[tabled(rename = "Holiday")]
    pub name: String,
}

/// Execute the calendar command.
pub fn execute(args: CalendarArgs, format: OutputFormat) -> Result<()> {
    let cal = BrazilCalendar;

    if let Some(s) = args.check.as_deref() {
        return check_date(&cal, s, format);
    }
    if let (Some(from), Some(to)) = (args.from.as_deref(), args.to.as_deref()) {
        return count_days(&cal, from, to, format);
    }

    let year = args.year.unwrap_or_else(|| today().year());
    if !(1583..=9999).contains(&year) {
        bail!("Year {year} is outside the Gregorian range supported (1583-9999)");
    }

    let rows: Vec<HolidayRow> = cal
        .holidays(year)
        .into_iter()
        .map(|h| HolidayRow {
            date: h.date.to_string(),
            weekday: h.date.weekday().to_string(),
            name: h.name.to_string(),
        })
        .collect();

    if format == OutputFormat::Table {
        print_header(&format!("{} holidays {year}", cal.name()));
    }
    print_output(&rows, format)
}

fn check_date(cal: &BrazilCalendar, s: &str, format: OutputFormat) -> Result<()> {
    let date = parse_date(s)?;
    let business = cal.is_business_day(date);

    if format == OutputFormat::Table {
        if business {
            print_success(&format!("{date} is a business day"));
        } else {
            let reason = cal
                .holiday_name(date)
                .map_or_else(|| "weekend".to_string(), str::to_string);
            print_warning(&format!("{date} is not a business day ({reason})"));
        }
    }

    let rows = vec![
        KeyValue::new("Date", date.to_string()),
        KeyValue::new("Business Day", business.to_string()),
        KeyValue::new(
            "Adjusted (Following)",
            cal.adjust(date, BusinessDayConvention::Following).to_string(),
        ),
        KeyValue::new("Next Business Day", cal.next_business_day(date).to_string()),
        KeyValue::new(
            "Previous Business Day",
            cal.previous_business_day(date).to_string(),
        ),
    ];
    match format {
        OutputFormat::Minimal => println!("{business}"),
        _ => print_output(&rows, format)?,
    }
    Ok(())
}

fn count_days(cal: &BrazilCalendar, from: &str, to: &str, format: OutputFormat) -> Result<()> {
    let start = parse_date(from)?;
    let end = parse_date(to)?;
    let count = cal.business_days_between(start, end);

    match format {
        OutputFormat::Minimal => println!("{count}"),
        _ => print_output(
            &[
                KeyValue::new("From", start.to_string()),
                KeyValue::new("To (exclusive)", end.to_string()),
                KeyValue::new("Business Days", count.to_string()),
            ],
            format,
        )?,
    }
    Ok(())
}
