//! # NTN-B Pricing
//!
//! Valuation of Brazilian inflation-linked Treasury bonds (NTN-B).
//!
//! The pipeline runs leaf first:
//!
//! 1. [`vna`]: project the VNA from its last publication to settlement
//! 2. [`schedule`]: pick the coupon cycle and list the adjusted payment dates
//! 3. [`cashflows`]: compute nominal and discounted flows per bond
//! 4. [`pricing`]: derive quotation, unit price, totals and duration
//!
//! Index history is never held here. Callers pass an [`IndexSource`] when
//! resolving imported rows, or supply the figures directly on a
//! [`BondInput`].
//!
//! ## Quick Start
//!
//! ```rust
//! use ntnb_pricing::prelude::*;
//! use rust_decimal_macros::dec;
//!
//! let input = BondInput::builder()
//!     .quantity(dec!(2))
//!     .settlement(Date::from_ymd(2025, 11, 25).unwrap())
//!     .maturity(Date::from_ymd(2055, 5, 15).unwrap())
//!     .contracted_yield(dec!(6.00))
//!     .vna_previous(dec!(4000.00))
//!     .monthly_inflation(dec!(0.50))
//!     .build()
//!     .unwrap();
//!
//! let result = price_bond(&input).unwrap();
//! println!("PU {} ({}%)", result.unit_price, result.quotation);
//! for flow in &result.cash_flows {
//!     println!("{flow}");
//! }
//! ```
//!
//! ## Money
//!
//! Amounts are `rust_decimal::Decimal` and are truncated, never rounded:
//! VNA to 6 places, quotation to 4, unit price and each flow to 2.
//! Only the exponentials (VNA growth, discount factors) go through `f64`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::return_self_not_must_use)]

pub mod cashflows;
pub mod config;
pub mod error;
pub mod index;
pub mod input;
pub mod pricing;
pub mod schedule;
pub mod vna;

pub use config::{CouponPolicy, CustodyFeeConfig, PricingConfig};
pub use error::{EngineError, EngineResult, ErrorKind};
pub use index::{IndexSource, IndexTable, NoIndexData};
pub use input::{BondInput, BondInputBuilder, BondRow};
pub use pricing::{price_bond, price_bond_with, Pricer, PricingResult};
pub use schedule::{CouponCycle, CouponSchedule};
pub use vna::{project_vna, VnaProjection};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::{CouponPolicy, CustodyFeeConfig, PricingConfig};
    pub use crate::error::{EngineError, EngineResult, ErrorKind};
    pub use crate::index::{IndexSource, IndexTable, NoIndexData};
    pub use crate::input::{BondInput, BondRow};
    pub use crate::pricing::{price_bond, price_bond_with, Pricer, PricingResult};
    pub use crate::schedule::CouponCycle;

    pub use ntnb_core::prelude::*;
}
