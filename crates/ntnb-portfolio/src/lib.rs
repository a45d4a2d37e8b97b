//! # NTN-B Portfolio
//!
//! Batch pricing of NTN-B positions with a per-year view of their cash
//! flows.
//!
//! ## Design Philosophy
//!
//! - **Pure functions**: positions in, results out, no shared state
//! - **Independent positions**: each bond runs the full pricing pipeline on
//!   its own, so batches parallelize without coordination
//! - **Config-driven parallelism**: optional rayon support with
//!   threshold-based switching
//!
//! ## Quick Start
//!
//! ```rust
//! use ntnb_portfolio::prelude::*;
//! use rust_decimal_macros::dec;
//!
//! let input = BondInput::builder()
//!     .quantity(dec!(10))
//!     .settlement(Date::from_ymd(2025, 11, 25).unwrap())
//!     .maturity(Date::from_ymd(2035, 5, 15).unwrap())
//!     .contracted_yield(dec!(6.2))
//!     .vna_previous(dec!(4000.00))
//!     .monthly_inflation(dec!(0.50))
//!     .build()
//!     .unwrap();
//!
//! let positions = vec![BondPosition::new(input).with_name("NTN-B 2035")];
//! let portfolio = price_batch(&positions).unwrap();
//!
//! for year in &portfolio.yearly {
//!     println!("{}: {}", year.year, year.combined_total);
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `parallel` (default): price large batches on the rayon thread pool

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod parallel;
pub mod portfolio;
pub mod position;
pub mod yearly;

pub use config::PortfolioConfig;
pub use error::{BatchResult, PortfolioError};
pub use portfolio::{consolidate, price_batch, price_batch_with, PortfolioEntry, PortfolioResult};
pub use position::{positions_from_rows, BondPosition};
pub use yearly::{YearlyFlow, YearlyTable};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::PortfolioConfig;
    pub use crate::error::{BatchResult, PortfolioError};
    pub use crate::portfolio::{price_batch, price_batch_with, PortfolioEntry, PortfolioResult};
    pub use crate::position::{positions_from_rows, BondPosition};
    pub use crate::yearly::YearlyFlow;

    pub use ntnb_pricing::prelude::*;
}
