//! Semiannual coupon schedule.
//!
//! NTN-B coupons fall on the 15th of two fixed months. The maturity month
//! selects the cycle; anchors are filtered on their unadjusted dates and
//! only then moved to a business day, so adjustment never changes which
//! coupons are paid.

use serde::{Deserialize, Serialize};
use std::fmt;

use ntnb_core::calendars::{BusinessDayConvention, Calendar};
use ntnb_core::{CashFlowKind, Date};

/// Day of month on which coupons are paid.
pub const COUPON_DAY: u32 = 15;

/// The two semiannual coupon cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CouponCycle {
    /// February 15 and August 15.
    FebruaryAugust,
    /// May 15 and November 15.
    MayNovember,
}

impl CouponCycle {
    /// Picks the cycle from the maturity month.
    ///
    /// February and August maturities pay on Feb/Aug; every other month
    /// pays on May/Nov.
    #[must_use]
    pub fn for_maturity(maturity: Date) -> Self {
        match maturity.month() {
            2 | 8 => CouponCycle::FebruaryAugust,
            _ => CouponCycle::MayNovember,
        }
    }

    /// Coupon months in calendar order.
    #[must_use]
    pub fn months(&self) -> [u32; 2] {
        match self {
            CouponCycle::FebruaryAugust => [2, 8],
            CouponCycle::MayNovember => [5, 11],
        }
    }

    /// Unadjusted anchors from January of `first_year` to December of
    /// `last_year`, ascending.
    pub fn anchors(&self, first_year: i32, last_year: i32) -> impl Iterator<Item = Date> + '_ {
        (first_year..=last_year).flat_map(move |year| {
            self.months()
                .into_iter()
                .filter_map(move |month| Date::from_ymd(year, month, COUPON_DAY).ok())
        })
    }
}

impl fmt::Display for CouponCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CouponCycle::FebruaryAugust => write!(f, "Feb/Aug"),
            CouponCycle::MayNovember => write!(f, "May/Nov"),
        }
    }
}

/// A payment date before and after adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledPayment {
    /// Contractual date.
    pub unadjusted: Date,
    /// Business day on which the payment is made.
    pub date: Date,
    /// What is paid.
    pub kind: CashFlowKind,
}

/// Coupon and principal dates of a bond held from settlement to maturity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponSchedule {
    /// Cycle implied by the maturity month.
    pub cycle: CouponCycle,
    /// Last anchor on or before settlement (unadjusted).
    pub previous_anchor: Date,
    /// Coupons strictly after settlement and on or before maturity.
    pub coupons: Vec<ScheduledPayment>,
    /// Redemption at the adjusted maturity date.
    pub principal: ScheduledPayment,
}

impl CouponSchedule {
    /// Builds the schedule for a holding from `settlement` to `maturity`.
    ///
    /// Coupon anchors satisfy `settlement < anchor <= maturity` on their
    /// unadjusted dates. The principal is always present, even when it
    /// shares its date with the last coupon.
    pub fn build<C: Calendar + ?Sized>(
        settlement: Date,
        maturity: Date,
        calendar: &C,
        convention: BusinessDayConvention,
    ) -> Self {
        let cycle = CouponCycle::for_maturity(maturity);
        let first_year = settlement.year() - 1;
        let last_year = maturity.year().max(settlement.year());

        let mut previous_anchor = None;
        let mut coupons = Vec::new();
        for anchor in cycle.anchors(first_year, last_year) {
            if anchor <= settlement {
                previous_anchor = Some(anchor);
            } else if anchor <= maturity {
                coupons.push(ScheduledPayment {
                    unadjusted: anchor,
                    date: calendar.adjust(anchor, convention),
                    kind: CashFlowKind::Interest,
                });
            }
        }

        let principal = ScheduledPayment {
            unadjusted: maturity,
            date: calendar.adjust(maturity, convention),
            kind: CashFlowKind::Principal,
        };

        log::debug!(
            "{} schedule {}..{}: {} coupons, principal on {}",
            cycle,
            settlement,
            maturity,
            coupons.len(),
            principal.date
        );

        Self {
            cycle,
            // The scan starts a full year before settlement, so an anchor
            // on or before it always exists.
            previous_anchor: previous_anchor.unwrap_or(settlement),
            coupons,
            principal,
        }
    }

    /// First coupon anchor after settlement, unadjusted.
    #[must_use]
    pub fn next_anchor(&self) -> Option<Date> {
        self.coupons.first().map(|p| p.unadjusted)
    }

    /// All payments: coupons first, then the principal.
    pub fn payments(&self) -> impl Iterator<Item = &ScheduledPayment> {
        self.coupons.iter().chain(std::iter::once(&self.principal))
    }

    /// Number of payments including the principal.
    #[must_use]
    pub fn len(&self) -> usize {
        self.coupons.len() + 1
    }

    /// Always false: a schedule carries at least the principal.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }
}
