//! Domain types for NTN-B calculations.

mod cashflow;
mod date;
mod money;

pub use cashflow::{CashFlowEvent, CashFlowKind};
pub use date::Date;
pub use money::{
    decimal_from_f64, floor_to, CASH_DECIMALS, QUOTATION_DECIMALS, VNA_DECIMALS,
};
