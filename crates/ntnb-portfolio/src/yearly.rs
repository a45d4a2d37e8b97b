//! Year-keyed consolidation of cash flows.
//!
//! The fold only adds, so totals do not depend on the order in which
//! bonds or flows are visited.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ntnb_core::{CashFlowEvent, CashFlowKind};

use crate::error::{BatchResult, PortfolioError};

/// Nominal cash flows paid in one calendar year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearlyFlow {
    /// Calendar year of payment.
    pub year: i32,
    /// Sum of coupons.
    pub coupon_total: Decimal,
    /// Sum of redemptions.
    pub principal_total: Decimal,
    /// Sum of custody fees (zero or negative).
    pub custody_fee_total: Decimal,
    /// All of the above.
    pub combined_total: Decimal,
    /// Number of events folded in.
    pub event_count: usize,
}

impl YearlyFlow {
    fn empty(year: i32) -> Self {
        Self {
            year,
            ..Self::default()
        }
    }

    /// Adds one event.
    pub fn add(&mut self, event: &CashFlowEvent) -> BatchResult<()> {
        let (bucket, operation) = match event.kind {
            CashFlowKind::Interest => (&mut self.coupon_total, "coupon total"),
            CashFlowKind::Principal => (&mut self.principal_total, "principal total"),
            CashFlowKind::CustodyFee => (&mut self.custody_fee_total, "custody fee total"),
        };
        *bucket = checked_add(*bucket, event.nominal_value, operation)?;
        self.combined_total =
            checked_add(self.combined_total, event.nominal_value, "combined total")?;
        self.event_count += 1;
        Ok(())
    }

    /// Adds another year's totals into this one.
    pub fn merge(&mut self, other: &YearlyFlow) -> BatchResult<()> {
        self.coupon_total = checked_add(self.coupon_total, other.coupon_total, "coupon total")?;
        self.principal_total =
            checked_add(self.principal_total, other.principal_total, "principal total")?;
        self.custody_fee_total = checked_add(
            self.custody_fee_total,
            other.custody_fee_total,
            "custody fee total",
        )?;
        self.combined_total =
            checked_add(self.combined_total, other.combined_total, "combined total")?;
        self.event_count += other.event_count;
        Ok(())
    }
}

pub(crate) fn checked_add(a: Decimal, b: Decimal, operation: &str) -> BatchResult<Decimal> {
    a.checked_add(b)
        .ok_or_else(|| PortfolioError::overflow(format!("{operation} ({a} + {b})")))
}

/// Running year table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct YearlyTable {
    years: BTreeMap<i32, YearlyFlow>,
}

impl YearlyTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds a bond's flows into the table.
    pub fn add_flows<'a>(
        &mut self,
        events: impl IntoIterator<Item = &'a CashFlowEvent>,
    ) -> BatchResult<()> {
        for event in events {
            let year = event.date.year();
            self.years
                .entry(year)
                .or_insert_with(|| YearlyFlow::empty(year))
                .add(event)?;
        }
        Ok(())
    }

    /// Merges another table into this one.
    pub fn merge(&mut self, other: &YearlyTable) -> BatchResult<()> {
        for (year, flow) in &other.years {
            self.years
                .entry(*year)
                .or_insert_with(|| YearlyFlow::empty(*year))
                .merge(flow)?;
        }
        Ok(())
    }

    /// Rows sorted by year.
    #[must_use]
    pub fn into_rows(self) -> Vec<YearlyFlow> {
        self.years.into_values().collect()
    }

    /// Number of years with at least one event.
    #[must_use]
    pub fn len(&self) -> usize {
        self.years.len()
    }

    /// Returns true if nothing has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }
}
