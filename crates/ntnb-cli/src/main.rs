//! NTN-B CLI - Command-line pricing of inflation-linked Treasury bonds.
//!
//! # Usage
//!
//! ```bash
//! # Price a single bond
//! ntnb price --settlement 2025-11-25 --maturity 2055-05-15 \
//!     --yield 6.0 --vna 4000 --inflation 0.5 --flows
//!
//! # Price a portfolio from CSV or JSON rows
//! ntnb portfolio positions.csv --index index.json
//!
//! # List exchange holidays
//! ntnb calendar --year 2026
//! ```
//!
//! Logging goes to stderr. Set `RUST_LOG` or pass `-v` for more detail.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod error;
mod output;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let format = cli.format;
    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Price(args) => commands::price::execute(args, &config, format)?,
        Commands::Portfolio(args) => commands::portfolio::execute(args, &config, format)?,
        Commands::Calendar(args) => commands::calendar::execute(args, format)?,
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    let default_level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
