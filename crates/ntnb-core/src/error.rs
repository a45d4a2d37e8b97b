//! Error types for core operations.
//!
//! Calendar queries never fail; the only fallible core operations are
//! date construction and parsing.

use thiserror::Error;

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// The error type for core operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A year/month/day triple that does not name a calendar date.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },

    /// A string that is not an ISO `YYYY-MM-DD` date.
    #[error("Invalid date format '{input}': expected YYYY-MM-DD")]
    InvalidDateFormat {
        /// The rejected input.
        input: String,
    },
}

impl CoreError {
    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }

    /// Creates an invalid date format error.
    #[must_use]
    pub fn invalid_date_format(input: impl Into<String>) -> Self {
        Self::InvalidDateFormat {
            input: input.into(),
        }
    }
}
