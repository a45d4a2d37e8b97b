//! Portfolio command implementation.
//!
//! Reads bond rows from a CSV or JSON file, prices them as a batch and
//! prints the per-year consolidation.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use ntnb_portfolio::{
    positions_from_rows, price_batch_with, PortfolioConfig, PortfolioResult, YearlyFlow,
};
use ntnb_pricing::BondRow;

use crate::cli::OutputFormat;
use crate::commands::{load_index, FileKind};
use crate::error::CliError;
use crate::output::{format_amount, print_header, print_output, KeyValue};

/// Arguments for the portfolio command.
#[derive(Args, Debug)]
pub struct PortfolioArgs {
    /// Positions file (.csv with a header row, or a .json array)
    pub input: PathBuf,

    /// Index table with published VNAs and inflation projections (JSON or TOML)
    #[arg(long)]
    pub index: Option<PathBuf>,

    /// Force sequential pricing
    #[arg(long)]
    pub sequential: bool,
}

/// One position for display.
#[derive(Debug, Serialize, Tabled)]
pub struct EntryRow {
    #[tabled(rename = "Id")]
    pub id: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Qty")]
    pub quantity: String,
    #[tabled(rename = "PU")]
    pub unit_price: String,
    #[tabled(rename = "Invested")]
    pub invested: String,
    #[tabled(rename = "Returned")]
    pub returned: String,
    #[tabled(rename = "Duration")]
    pub duration: String,
}

/// One year for display.
#[derive(Debug, Serialize, Tabled)]
pub struct YearRow {
    #[tabled(rename = "Year")]
    pub year: i32,
    #[tabled(rename = "Coupons")]
    pub coupons: String,
    #[tabled(rename = "Principal")]
    pub principal: String,
    #[tabled(rename = "Custody Fee")]
    pub custody_fee: String,
    #[tabled(rename = "Total")]
    pub total: String,
    #[tabled(rename = "Events")]
    pub events: usize,
}

impl From<&YearlyFlow> for YearRow {
    fn from(flow: &YearlyFlow) -> Self {
        Self {
            year: flow.year,
            coupons: format_amount(flow.coupon_total, 2),
            principal: format_amount(flow.principal_total, 2),
            custody_fee: format_amount(flow.custody_fee_total, 2),
            total: format_amount(flow.combined_total, 2),
            events: flow.event_count,
        }
    }
}

/// Execute the portfolio command.
pub fn execute(args: PortfolioArgs, config: &PortfolioConfig, format: OutputFormat) -> Result<()> {
    let rows = read_rows(&args.input)
        .with_context(|| format!("reading positions from {}", args.input.display()))?;
    let index = load_index(args.index.as_deref())?;
    tracing::debug!(rows = rows.len(), "positions loaded");

    let mut config = config.clone();
    if args.sequential {
        config.parallel = false;
    }

    let positions = positions_from_rows(&rows, &index)?;
    let result = price_batch_with(&positions, &config)?;

    match format {
        OutputFormat::Table => {
            print_header("Positions");
            print_output(&entry_rows(&result), format)?;
            print_header("Cash Flows by Year");
            print_output(&year_rows(&result), format)?;
            print_header("Totals");
            print_output(&totals(&result), format)?;
        }
        OutputFormat::Json => crate::output::print_json_document(&result)?,
        OutputFormat::Csv => print_output(&year_rows(&result), format)?,
        OutputFormat::Minimal => println!("{}", result.total_invested),
    }

    Ok(())
}

/// Reads bond rows from CSV or JSON.
pub fn read_rows(path: &Path) -> Result<Vec<BondRow>> {
    match FileKind::from_path(path)? {
        FileKind::Csv => {
            let file = File::open(path)?;
            let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(file);
            let rows = reader
                .deserialize()
                .collect::<std::result::Result<Vec<BondRow>, _>>()?;
            Ok(rows)
        }
        FileKind::Json => {
            let file = File::open(path)?;
            Ok(serde_json::from_reader(file)?)
        }
        FileKind::Toml => Err(CliError::UnsupportedFile(path.display().to_string()).into()),
    }
}

fn entry_rows(result: &PortfolioResult) -> Vec<EntryRow> {
    result
        .entries
        .iter()
        .map(|entry| {
            let r = &entry.result;
            EntryRow {
                id: entry.id.clone(),
                name: entry.name.clone(),
                quantity: r.input.quantity.to_string(),
                unit_price: format_amount(r.unit_price, 2),
                invested: format_amount(r.total_investment, 2),
                returned: format_amount(r.gross_amount_returned, 2),
                duration: format!("{:.4}", r.duration),
            }
        })
        .collect()
}

fn year_rows(result: &PortfolioResult) -> Vec<YearRow> {
    result.yearly.iter().map(YearRow::from).collect()
}

fn totals(result: &PortfolioResult) -> Vec<KeyValue> {
    vec![
        KeyValue::new("Positions", result.len().to_string()),
        KeyValue::from_amount("Total Invested", result.total_invested, 2),
        KeyValue::from_amount("Total Returned", result.total_returned, 2),
        KeyValue::from_amount("Total Profit", result.total_profit, 2),
        KeyValue::from_amount("Custody Fees", result.total_custody_fee, 2),
        KeyValue::new("Duration (years)", format!("{:.4}", result.duration)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_csv_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(
            file,
            "id,name,quantity,settlement,maturity,contracted_yield,vna_previous,monthly_inflation"
        )
        .unwrap();
        writeln!(file, "a, NTN-B 2035 ,2,2025-11-25,2035-05-15,6.1,4000.5,0.45").unwrap();
        writeln!(file, "b,,1,2025-11-25,2050-08-15,6.3,,").unwrap();

        let rows = read_rows(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name.as_deref(), Some("NTN-B 2035"));
        assert!(rows[1].vna_previous.is_none());
        assert!(rows[1].name.is_none());
    }

    #[test]
    fn test_rejects_unknown_extension() {
        assert!(read_rows(Path::new("rows.xlsx")).is_err());
    }
}
