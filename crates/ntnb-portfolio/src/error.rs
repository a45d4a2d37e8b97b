//! Error types for portfolio pricing.

use thiserror::Error;

use ntnb_pricing::{EngineError, ErrorKind};

/// Result type for portfolio operations.
pub type BatchResult<T> = Result<T, PortfolioError>;

/// Errors that can occur while pricing a portfolio.
///
/// A failing position fails the whole batch; no partial portfolio is
/// returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PortfolioError {
    /// A position could not be priced.
    #[error("Position '{id}' failed: {source}")]
    Position {
        /// The position id.
        id: String,
        /// The pricing error.
        #[source]
        source: EngineError,
    },

    /// A position could not be built from its imported row.
    #[error("Row {row} could not be imported: {source}")]
    Import {
        /// Zero-based row index in the import.
        row: usize,
        /// The resolution error.
        #[source]
        source: EngineError,
    },

    /// Invalid portfolio configuration.
    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },

    /// A consolidated total left the decimal range.
    #[error("Numeric overflow while consolidating {operation}")]
    Overflow {
        /// The total being computed.
        operation: String,
    },
}

impl PortfolioError {
    /// Create a position error.
    #[must_use]
    pub fn position(id: impl Into<String>, source: EngineError) -> Self {
        Self::Position {
            id: id.into(),
            source,
        }
    }

    /// Create an import error.
    #[must_use]
    pub fn import(row: usize, source: EngineError) -> Self {
        Self::Import { row, source }
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Create an overflow error.
    #[must_use]
    pub fn overflow(operation: impl Into<String>) -> Self {
        Self::Overflow {
            operation: operation.into(),
        }
    }

    /// Pricing error category, when the failure came from the engine.
    #[must_use]
    pub fn engine_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Position { source, .. } | Self::Import { source, .. } => Some(source.kind()),
            Self::InvalidConfig { .. } | Self::Overflow { .. } => None,
        }
    }
}
