//! Price command implementation.
//!
//! Prices a single NTN-B position and optionally lists its cash flows.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde::Serialize;
use tabled::Tabled;

use ntnb_core::CashFlowEvent;
use ntnb_portfolio::PortfolioConfig;
use ntnb_pricing::{BondRow, CouponPolicy, Pricer, PricingConfig, PricingResult};

use crate::cli::OutputFormat;
use crate::commands::{load_index, parse_date, today};
use crate::output::{format_amount, print_header, print_output, print_warning, KeyValue};

/// Arguments for the price command.
#[derive(Args, Debug)]
pub struct PriceArgs {
    /// Settlement date (YYYY-MM-DD). Defaults to today.
    #[arg(short, long)]
    pub settlement: Option<String>,

    /// Maturity date (YYYY-MM-DD)
    #[arg(short, long)]
    pub maturity: String,

    /// Contracted real yield (annual percent, e.g. 6.0)
    #[arg(short = 'y', long = "yield")]
    pub yield_pct: Decimal,

    /// VNA at the last publication before settlement
    #[arg(long)]
    pub vna: Option<Decimal>,

    /// Projected inflation for the settlement month (percent)
    #[arg(short, long)]
    pub inflation: Option<Decimal>,

    /// Number of bonds
    #[arg(short = 'n', long, default_value = "1")]
    pub quantity: Decimal,

    /// Index table with published VNAs and inflation projections (JSON or TOML)
    #[arg(long)]
    pub index: Option<PathBuf>,

    /// Semiannual coupon split, overriding the configuration
    #[arg(long, value_enum)]
    pub policy: Option<PolicyArg>,

    /// Pay a pro-rata first coupon when settling mid-period
    #[arg(long)]
    pub pro_rata: bool,

    /// Do not deduct the custody fee
    #[arg(long)]
    pub no_custody_fee: bool,

    /// List the cash flows
    #[arg(long)]
    pub flows: bool,
}

/// Coupon policy choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    /// Half the annual rate per period
    Simple,
    /// `(1 + annual)^0.5 - 1` per period
    Compounded,
}

impl From<PolicyArg> for CouponPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Simple => CouponPolicy::Simple,
            PolicyArg::Compounded => CouponPolicy::Compounded,
        }
    }
}

/// One cash flow for display.
#[derive(Debug, Serialize, Tabled)]
pub struct FlowRow {
    #[tabled(rename = "Date")]
    pub date: String,
    #[tabled(rename = "Kind")]
    pub kind: String,
    #[tabled(rename = "BD")]
    pub business_days: u32,
    #[tabled(rename = "Rate %")]
    pub coupon_rate: String,
    #[tabled(rename = "Nominal")]
    pub nominal: String,
    #[tabled(rename = "Present Value")]
    pub present_value: String,
    #[tabled(rename = "Cumulative PV")]
    pub cumulative: String,
}

impl From<&CashFlowEvent> for FlowRow {
    fn from(event: &CashFlowEvent) -> Self {
        Self {
            date: event.date.to_string(),
            kind: event.kind.to_string(),
            business_days: event.business_days,
            coupon_rate: format!("{:.4}", event.coupon_rate),
            nominal: format_amount(event.nominal_value, 2),
            present_value: format_amount(event.present_value, 2),
            cumulative: format_amount(event.cumulative_present_value, 2),
        }
    }
}

/// Execute the price command.
pub fn execute(args: PriceArgs, config: &PortfolioConfig, format: OutputFormat) -> Result<()> {
    let settlement = match args.settlement.as_deref() {
        Some(s) => parse_date(s)?,
        None => today(),
    };
    let maturity = parse_date(&args.maturity)?;
    let index = load_index(args.index.as_deref())?;

    let row = BondRow {
        quantity: Some(args.quantity),
        settlement: Some(settlement.to_string()),
        maturity: Some(maturity.to_string()),
        contracted_yield: Some(args.yield_pct),
        vna_previous: args.vna,
        monthly_inflation: args.inflation,
        ..BondRow::default()
    };

    let pricing = apply_overrides(config.pricing.clone(), &args);
    tracing::debug!(?pricing, "pricing configuration");
    let result = Pricer::with_config(pricing).price_row(&row, &index)?;

    match format {
        OutputFormat::Table => {
            print_header("NTN-B Pricing");
            print_output(&summary(&result), format)?;
            if result.custody_fee > Decimal::ZERO {
                print_warning(&format!(
                    "custody fee of {} deducted at maturity",
                    format_amount(result.custody_fee, 2)
                ));
            }
            if args.flows {
                print_header("Cash Flows");
                print_output(&flow_rows(&result), format)?;
            }
        }
        OutputFormat::Json => crate::output::print_json_document(&result)?,
        OutputFormat::Csv => print_output(&flow_rows(&result), format)?,
        OutputFormat::Minimal => println!("{}", result.unit_price),
    }

    Ok(())
}

fn apply_overrides(mut pricing: PricingConfig, args: &PriceArgs) -> PricingConfig {
    if let Some(policy) = args.policy {
        pricing = pricing.with_coupon_policy(policy.into());
    }
    if args.pro_rata {
        pricing = pricing.with_pro_rata_first_coupon(true);
    }
    if args.no_custody_fee {
        pricing = pricing.without_custody_fee();
    }
    pricing
}

fn summary(result: &PricingResult) -> Vec<KeyValue> {
    let input = &result.input;
    let mut rows = vec![
        KeyValue::new("Settlement", input.settlement.to_string()),
        KeyValue::new("Maturity", input.maturity.to_string()),
        KeyValue::new("Coupon Cycle", result.coupon_cycle.to_string()),
        KeyValue::new("Quantity", input.quantity.to_string()),
        KeyValue::new("Contracted Yield", format!("{}%", input.contracted_yield)),
        KeyValue::from_amount("VNA", result.vna, 6),
        KeyValue::from_percent("Quotation", result.quotation, 4),
        KeyValue::from_amount("Unit Price (PU)", result.unit_price, 2),
        KeyValue::from_amount("Total Investment", result.total_investment, 2),
        KeyValue::from_amount("Gross Amount Returned", result.gross_amount_returned, 2),
        KeyValue::from_amount("Gross Profit", result.gross_profit, 2),
    ];
    if result.custody_fee > Decimal::ZERO {
        rows.push(KeyValue::from_amount("Custody Fee", result.custody_fee, 2));
    }
    rows.push(KeyValue::new("Duration (years)", format!("{:.4}", result.duration)));
    rows.push(KeyValue::new("Cash Flows", result.cash_flows.len().to_string()));
    rows
}

fn flow_rows(result: &PricingResult) -> Vec<FlowRow> {
    result.cash_flows.iter().map(FlowRow::from).collect()
}
