//! # NTN-B Core
//!
//! Core types and calendar arithmetic for the NTN-B pricing engine.
//!
//! This crate provides the foundational building blocks used by the pricing
//! and portfolio crates:
//!
//! - **Types**: `Date`, `CashFlowEvent`, `CashFlowKind`
//! - **Business Day Calendar**: Brazilian national holidays plus exchange closures,
//!   with Easter-based movable feasts computed for any year
//! - **Money**: floor truncation helpers at the precisions used by the Treasury
//!
//! ## Design Philosophy
//!
//! - **Pure functions**: nothing here performs I/O or holds mutable state
//! - **Decimal money**: monetary values are `rust_decimal::Decimal`, never `f64`
//! - **Explicit Over Implicit**: truncation happens only where it is named
//!
//! ## Example
//!
//! ```rust
//! use ntnb_core::prelude::*;
//!
//! let cal = BrazilCalendar;
//! let carnival = Date::from_ymd(2024, 2, 13).unwrap();
//! assert!(!cal.is_business_day(carnival));
//! assert_eq!(cal.next_business_day(carnival), Date::from_ymd(2024, 2, 14).unwrap());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::return_self_not_must_use)]

pub mod calendars;
pub mod error;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::calendars::{
        easter_sunday, holidays_in_year, BrazilCalendar, BusinessDayConvention, Calendar, Holiday,
    };
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::types::{floor_to, CashFlowEvent, CashFlowKind, Date};
}

// Re-export commonly used types at crate root
pub use error::{CoreError, CoreResult};
pub use types::{CashFlowEvent, CashFlowKind, Date};
