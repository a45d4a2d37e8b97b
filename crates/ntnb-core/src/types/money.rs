//! Money precision and floor truncation.
//!
//! Treasury figures are truncated toward negative infinity at fixed
//! precisions, never rounded. The helpers here are the only place where
//! precision is dropped.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places kept on the projected VNA.
pub const VNA_DECIMALS: u32 = 6;

/// Decimal places kept on the quotation (percent of VNA).
pub const QUOTATION_DECIMALS: u32 = 4;

/// Decimal places kept on the unit price and on every cash amount.
pub const CASH_DECIMALS: u32 = 2;

/// Truncates `value` to `decimals` places, rounding toward negative infinity.
///
/// ```rust
/// use ntnb_core::types::floor_to;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(floor_to(dec!(4019.999999), 2), dec!(4019.99));
/// assert_eq!(floor_to(dec!(-12.341), 2), dec!(-12.35));
/// ```
#[must_use]
pub fn floor_to(value: Decimal, decimals: u32) -> Decimal {
    value.round_dp_with_strategy(decimals, RoundingStrategy::ToNegativeInfinity)
}

/// Converts a float produced by a transcendental step into a `Decimal`.
///
/// Uses the shortest round-trip representation so `0.1_f64` becomes `0.1`
/// rather than its binary expansion. Returns `None` for NaN, infinities and
/// magnitudes a `Decimal` cannot hold.
#[must_use]
pub fn decimal_from_f64(value: f64) -> Option<Decimal> {
    if value.is_finite() {
        Decimal::from_f64(value)
    } else {
        None
    }
}
