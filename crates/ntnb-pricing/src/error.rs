//! Error types for the pricing engine.
//!
//! Every variant is an input error detected before any projection step
//! runs, except `NumericOverflow`, which reports a figure that cannot be
//! represented as a decimal.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use ntnb_core::Date;

/// A specialized Result type for pricing operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Machine-readable category of an [`EngineError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// A required date or number is absent.
    MissingField,
    /// A date is not in `YYYY-MM-DD` form.
    InvalidDateFormat,
    /// Quantity is zero or negative.
    NonPositiveQuantity,
    /// Reference value (VNA) is zero or negative.
    NonPositiveReferenceValue,
    /// Contracted yield is negative.
    NegativeYield,
    /// Maturity is on or before settlement.
    MaturityNotAfterSettlement,
    /// Settlement falls on a weekend or holiday.
    SettlementNotBusinessDay,
    /// Monthly inflation rate at or below -100%.
    InvalidInflationRate,
    /// Engine configuration is unusable.
    InvalidConfig,
    /// A computed figure does not fit a decimal.
    NumericOverflow,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Errors reported by the pricing engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Missing required field.
    #[error("Missing required field: {field}")]
    MissingField {
        /// The missing field name.
        field: String,
    },

    /// Unparseable date.
    #[error("Invalid date format for {field}: '{value}' (expected YYYY-MM-DD)")]
    InvalidDateFormat {
        /// The field holding the date.
        field: String,
        /// The rejected text.
        value: String,
    },

    /// Quantity must be positive.
    #[error("Quantity must be positive, got {quantity}")]
    NonPositiveQuantity {
        /// The rejected quantity.
        quantity: Decimal,
    },

    /// VNA must be positive.
    #[error("Reference value (VNA) must be positive, got {value}")]
    NonPositiveReferenceValue {
        /// The rejected VNA.
        value: Decimal,
    },

    /// Yield must not be negative.
    #[error("Contracted yield must not be negative, got {value}%")]
    NegativeYield {
        /// The rejected yield, in percent.
        value: Decimal,
    },

    /// Maturity on or before settlement.
    #[error("Maturity {maturity} is not after settlement {settlement}")]
    MaturityNotAfterSettlement {
        /// Settlement date.
        settlement: Date,
        /// Maturity date.
        maturity: Date,
    },

    /// Settlement on a non-business day.
    #[error("Settlement {settlement} is not a business day")]
    SettlementNotBusinessDay {
        /// Settlement date.
        settlement: Date,
    },

    /// Inflation rate that would make the index negative.
    #[error("Monthly inflation rate must be above -100%, got {value}%")]
    InvalidInflationRate {
        /// The rejected rate, in percent.
        value: Decimal,
    },

    /// Invalid engine configuration.
    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },

    /// Arithmetic result outside the decimal range.
    #[error("Numeric overflow while computing {operation}")]
    NumericOverflow {
        /// The step that overflowed.
        operation: String,
    },
}

impl EngineError {
    /// Returns the category of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingField { .. } => ErrorKind::MissingField,
            Self::InvalidDateFormat { .. } => ErrorKind::InvalidDateFormat,
            Self::NonPositiveQuantity { .. } => ErrorKind::NonPositiveQuantity,
            Self::NonPositiveReferenceValue { .. } => ErrorKind::NonPositiveReferenceValue,
            Self::NegativeYield { .. } => ErrorKind::NegativeYield,
            Self::MaturityNotAfterSettlement { .. } => ErrorKind::MaturityNotAfterSettlement,
            Self::SettlementNotBusinessDay { .. } => ErrorKind::SettlementNotBusinessDay,
            Self::InvalidInflationRate { .. } => ErrorKind::InvalidInflationRate,
            Self::InvalidConfig { .. } => ErrorKind::InvalidConfig,
            Self::NumericOverflow { .. } => ErrorKind::NumericOverflow,
        }
    }

    /// Creates a missing field error.
    #[must_use]
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Creates an invalid date format error.
    #[must_use]
    pub fn invalid_date_format(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidDateFormat {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Creates a numeric overflow error.
    #[must_use]
    pub fn overflow(operation: impl Into<String>) -> Self {
        Self::NumericOverflow {
            operation: operation.into(),
        }
    }
}
