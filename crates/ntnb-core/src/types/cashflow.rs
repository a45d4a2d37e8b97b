//! Cash flow event type for NTN-B schedules.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use super::Date;

/// Kind of a dated cash flow.
///
/// The declaration order is the tie-break for events sharing a payment
/// date: interest is listed before principal, and the custody fee last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CashFlowKind {
    /// Semiannual coupon (full or pro-rata).
    Interest,
    /// Redemption of the VNA at maturity.
    Principal,
    /// Custody fee charged over the holding period (negative amount).
    CustodyFee,
}

impl CashFlowKind {
    /// Returns true for flows paid by the bond itself (interest and principal).
    #[must_use]
    pub fn is_bond_flow(&self) -> bool {
        matches!(self, CashFlowKind::Interest | CashFlowKind::Principal)
    }
}

impl fmt::Display for CashFlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CashFlowKind::Interest => "Interest",
            CashFlowKind::Principal => "Principal",
            CashFlowKind::CustodyFee => "Custody Fee",
        };
        write!(f, "{name}")
    }
}

/// A single dated cash flow with its discounting metadata.
///
/// Monetary fields are already scaled by the position quantity;
/// `coupon_rate` is a per-period percentage and is never scaled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlowEvent {
    /// Payment date, already adjusted to a business day.
    pub date: Date,
    /// Kind of flow.
    pub kind: CashFlowKind,
    /// Business days from settlement to `date`, both ends counted.
    pub business_days: u32,
    /// Coupon rate applied for the period, in percent (zero for principal).
    pub coupon_rate: Decimal,
    /// Future value paid on `date`.
    pub nominal_value: Decimal,
    /// Value discounted back to settlement.
    pub present_value: Decimal,
    /// Running sum of `present_value` up to and including this event.
    pub cumulative_present_value: Decimal,
}

impl CashFlowEvent {
    /// Time to payment in years under a `days_per_year` business-day basis.
    #[must_use]
    pub fn years(&self, days_per_year: u32) -> f64 {
        f64::from(self.business_days) / f64::from(days_per_year)
    }

    /// Schedule ordering: by date, then by kind.
    #[must_use]
    pub fn schedule_cmp(&self, other: &Self) -> Ordering {
        self.date
            .cmp(&other.date)
            .then_with(|| self.kind.cmp(&other.kind))
    }
}

impl fmt::Display for CashFlowEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:<11} {:>5}bd  {:>14}  pv {:>14}",
            self.date, self.kind, self.business_days, self.nominal_value, self.present_value
        )
    }
}
