//! CLI argument definitions.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use crate::commands::{CalendarArgs, PortfolioArgs, PriceArgs};

/// NTN-B - Inflation-linked Treasury bond pricing
#[derive(Parser)]
#[command(name = "ntnb")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Engine configuration file (TOML or JSON)
    #[arg(short, long, global = true, env = "NTNB_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Price one bond: VNA, quotation, unit price, duration and cash flows
    Price(PriceArgs),

    /// Price a list of positions and consolidate flows by year
    Portfolio(PortfolioArgs),

    /// Exchange calendar: holidays, business-day checks and counts
    Calendar(CalendarArgs),
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
    /// Minimal output (just the value)
    Minimal,
}
