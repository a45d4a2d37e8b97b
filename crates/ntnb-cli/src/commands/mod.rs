//! CLI command implementations.

pub mod calendar;
pub mod portfolio;
pub mod price;

// Re-export submodules for convenience
pub use calendar::CalendarArgs;
pub use portfolio::PortfolioArgs;
pub use price::PriceArgs;

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;

use ntnb_core::Date;
use ntnb_portfolio::PortfolioConfig;
use ntnb_pricing::IndexTable;

use crate::error::{CliError, CliResult};

/// Parses a date string in YYYY-MM-DD format.
pub fn parse_date(s: &str) -> CliResult<Date> {
    Date::parse(s).map_err(|_| CliError::InvalidDate(s.to_string()))
}

/// Today's date on the UTC calendar.
pub fn today() -> Date {
    Date::from(chrono::Utc::now().date_naive())
}

/// Structured file formats read by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// `.json`
    Json,
    /// `.toml`
    Toml,
    /// `.csv`
    Csv,
}

impl FileKind {
    /// Detects the format from the file extension.
    pub fn from_path(path: &Path) -> CliResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("json") => Ok(FileKind::Json),
            Some("toml") => Ok(FileKind::Toml),
            Some("csv") => Ok(FileKind::Csv),
            _ => Err(CliError::UnsupportedFile(path.display().to_string())),
        }
    }
}

/// Reads a JSON or TOML document.
pub fn read_document<T: DeserializeOwned>(path: &Path) -> CliResult<T> {
    let text = fs::read_to_string(path)?;
    match FileKind::from_path(path)? {
        FileKind::Json => {
            serde_json::from_str(&text).map_err(|e| CliError::Serialization(e.to_string()))
        }
        FileKind::Toml => toml::from_str(&text).map_err(|e| CliError::Serialization(e.to_string())),
        FileKind::Csv => Err(CliError::UnsupportedFile(path.display().to_string())),
    }
}

/// Loads the engine configuration, or the defaults when no file is given.
///
/// The file holds a `PortfolioConfig`; its `pricing` table configures the
/// engine for every command.
pub fn load_config(path: Option<&Path>) -> CliResult<PortfolioConfig> {
    let Some(path) = path else {
        return Ok(PortfolioConfig::default());
    };

    let config: PortfolioConfig =
        read_document(path).map_err(|e| CliError::Config(format!("{}: {e}", path.display())))?;
    config
        .validate()
        .map_err(|e| CliError::Config(e.to_string()))?;

    tracing::debug!(path = %path.display(), "loaded configuration");
    Ok(config)
}

/// Loads an index table, or an empty one when no file is given.
pub fn load_index(path: Option<&Path>) -> CliResult<IndexTable> {
    let Some(path) = path else {
        return Ok(IndexTable::new());
    };

    let table: IndexTable = read_document(path)?;
    tracing::debug!(
        path = %path.display(),
        reference_values = table.reference_value_count(),
        projections = table.projection_count(),
        "loaded index table"
    );
    Ok(table)
}
