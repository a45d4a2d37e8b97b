//! Cash-flow generation and discounting.
//!
//! Flows are first produced per unit of bond ([`UnitFlow`]) so the
//! quotation can be taken from the unit figures, then scaled by the
//! position quantity into [`CashFlowEvent`]s.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use ntnb_core::calendars::Calendar;
use ntnb_core::types::{decimal_from_f64, floor_to, CASH_DECIMALS, QUOTATION_DECIMALS};
use ntnb_core::{CashFlowEvent, CashFlowKind, Date};

use crate::config::PricingConfig;
use crate::error::{EngineError, EngineResult};
use crate::schedule::{CouponSchedule, ScheduledPayment};

/// A cash flow for a single bond, before quantity scaling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitFlow {
    /// Payment date (adjusted).
    pub date: Date,
    /// Kind of flow.
    pub kind: CashFlowKind,
    /// Business days from settlement, both ends counted.
    pub business_days: u32,
    /// Fraction of the VNA paid: the period rate for interest, one for
    /// principal.
    pub factor: Decimal,
    /// Amount paid per bond, truncated to cents.
    pub nominal: Decimal,
    /// `(1 + yield)^(business_days / days_per_year)`.
    pub discount_factor: Decimal,
}

impl UnitFlow {
    /// Discounted factor, the flow's share of the quotation.
    pub fn discounted_factor(&self) -> EngineResult<Decimal> {
        self.factor
            .checked_div(self.discount_factor)
            .ok_or_else(|| EngineError::overflow("discounted factor"))
    }

    /// Scales the flow to `quantity` bonds.
    ///
    /// The cumulative present value is left at zero; see
    /// [`accumulate_present_values`].
    pub fn to_event(&self, quantity: Decimal) -> EngineResult<CashFlowEvent> {
        let nominal_value = self
            .nominal
            .checked_mul(quantity)
            .ok_or_else(|| EngineError::overflow("cash flow nominal"))?;
        let present_value = nominal_value
            .checked_div(self.discount_factor)
            .ok_or_else(|| EngineError::overflow("cash flow present value"))?;
        let coupon_rate = match self.kind {
            CashFlowKind::Interest => self
                .factor
                .checked_mul(Decimal::ONE_HUNDRED)
                .map(|v| floor_to(v, QUOTATION_DECIMALS))
                .ok_or_else(|| EngineError::overflow("coupon rate"))?,
            _ => Decimal::ZERO,
        };

        Ok(CashFlowEvent {
            date: self.date,
            kind: self.kind,
            business_days: self.business_days,
            coupon_rate,
            nominal_value,
            present_value,
            cumulative_present_value: Decimal::ZERO,
        })
    }
}

/// Discount factor `(1 + yield_pct/100)^(business_days / days_per_year)`.
///
/// The power is taken in `f64`; the result is brought back to a decimal.
pub fn discount_factor(
    yield_pct: Decimal,
    business_days: u32,
    days_per_year: u32,
) -> EngineResult<Decimal> {
    let base = (Decimal::ONE + yield_pct / Decimal::ONE_HUNDRED)
        .to_f64()
        .ok_or_else(|| EngineError::overflow("discount base"))?;
    let exponent = f64::from(business_days) / f64::from(days_per_year);
    decimal_from_f64(base.powf(exponent)).ok_or_else(|| EngineError::overflow("discount factor"))
}

/// Per-unit flows for a schedule.
///
/// With `pro_rata_first_coupon` set and settlement strictly inside a coupon
/// period, the first coupon pays only the unexpired share of the period,
/// measured in calendar days between the unadjusted anchors. It replaces
/// the full coupon rather than adding to it.
pub fn generate_unit_flows<C: Calendar + ?Sized>(
    schedule: &CouponSchedule,
    settlement: Date,
    vna: Decimal,
    yield_pct: Decimal,
    calendar: &C,
    config: &PricingConfig,
) -> EngineResult<Vec<UnitFlow>> {
    let period_rate = config.semiannual_rate()?;
    let first_rate = first_coupon_rate(schedule, settlement, period_rate, config);

    let mut flows = Vec::with_capacity(schedule.len());
    for (i, payment) in schedule.payments().enumerate() {
        let factor = match payment.kind {
            CashFlowKind::Interest if i == 0 => first_rate,
            CashFlowKind::Interest => period_rate,
            _ => Decimal::ONE,
        };
        flows.push(unit_flow(payment, factor, settlement, vna, yield_pct, calendar, config)?);
    }

    Ok(flows)
}

fn first_coupon_rate(
    schedule: &CouponSchedule,
    settlement: Date,
    period_rate: Decimal,
    config: &PricingConfig,
) -> Decimal {
    if !config.pro_rata_first_coupon {
        return period_rate;
    }
    let Some(next) = schedule.next_anchor() else {
        return period_rate;
    };
    let previous = schedule.previous_anchor;
    if !(previous < settlement && settlement < next) {
        return period_rate;
    }

    let remaining = Decimal::from(settlement.days_between(&next));
    let period = Decimal::from(previous.days_between(&next));
    let rate = period_rate * remaining / period;
    log::debug!(
        "pro-rata first coupon on {}: {} of {} days, rate {}",
        next,
        remaining,
        period,
        rate
    );
    rate
}

fn unit_flow<C: Calendar + ?Sized>(
    payment: &ScheduledPayment,
    factor: Decimal,
    settlement: Date,
    vna: Decimal,
    yield_pct: Decimal,
    calendar: &C,
    config: &PricingConfig,
) -> EngineResult<UnitFlow> {
    let business_days = calendar.business_days_between(settlement, payment.date) + 1;
    let nominal = vna
        .checked_mul(factor)
        .map(|v| floor_to(v, CASH_DECIMALS))
        .ok_or_else(|| EngineError::overflow("unit cash flow"))?;

    Ok(UnitFlow {
        date: payment.date,
        kind: payment.kind,
        business_days,
        factor,
        nominal,
        discount_factor: discount_factor(yield_pct, business_days, config.business_days_per_year)?,
    })
}

/// Orders events by date, interest before principal before fees.
pub fn sort_events(events: &mut [CashFlowEvent]) {
    events.sort_by(CashFlowEvent::schedule_cmp);
}

/// Fills `cumulative_present_value` as a running sum in list order.
pub fn accumulate_present_values(events: &mut [CashFlowEvent]) -> EngineResult<()> {
    let mut running = Decimal::ZERO;
    for event in events {
        running = running
            .checked_add(event.present_value)
            .ok_or_else(|| EngineError::overflow("cumulative present value"))?;
        event.cumulative_present_value = running;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CouponPolicy;
    use ntnb_core::calendars::{BrazilCalendar, BusinessDayConvention};
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn schedule(settlement: Date, maturity: Date) -> CouponSchedule {
        CouponSchedule::build(
            settlement,
            maturity,
            &BrazilCalendar,
            BusinessDayConvention::Following,
        )
    }

    #[test]
    fn test_discount_factor() {
        assert_eq!(discount_factor(dec!(6), 0, 252).unwrap(), Decimal::ONE);
        assert_eq!(discount_factor(dec!(0), 1000, 252).unwrap(), Decimal::ONE);

        let one_year = discount_factor(dec!(6), 252, 252).unwrap();
        assert!((one_year - dec!(1.06)).abs() < dec!(0.000000000001));

        let half_year = discount_factor(dec!(6), 126, 252).unwrap().to_f64().unwrap();
        approx::assert_relative_eq!(half_year, 1.06_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_simple_coupon_flows() {
        let settlement = date(2025, 11, 25);
        let sched = schedule(settlement, date(2027, 5, 15));
        let flows = generate_unit_flows(
            &sched,
            settlement,
            dec!(4006.648003),
            dec!(6),
            &BrazilCalendar,
            &PricingConfig::default(),
        )
        .unwrap();

        // Coupons 2026-05, 2026-11, 2027-05 plus principal
        assert_eq!(flows.len(), 4);
        assert_eq!(flows[0].factor, dec!(0.03));
        assert_eq!(flows[0].nominal, dec!(120.19));
        assert_eq!(flows[3].kind, CashFlowKind::Principal);
        assert_eq!(flows[3].nominal, dec!(4006.64));
        assert_eq!(flows[3].factor, Decimal::ONE);

        for pair in flows.windows(2) {
            assert!(pair[0].business_days <= pair[1].business_days);
            assert!(pair[0].discount_factor <= pair[1].discount_factor);
        }
    }

    #[test]
    fn test_business_days_count_both_ends() {
        let settlement = date(2025, 11, 25);
        let sched = schedule(settlement, date(2025, 11, 28));
        let flows = generate_unit_flows(
            &sched,
            settlement,
            dec!(4000),
            dec!(6),
            &BrazilCalendar,
            &PricingConfig::default(),
        )
        .unwrap();

        // Tue 25, Wed 26, Thu 27, Fri 28
        assert_eq!(flows[0].business_days, 4);
    }

    #[test]
    fn test_compounded_policy_pays_less() {
        let settlement = date(2025, 11, 25);
        let sched = schedule(settlement, date(2027, 5, 15));
        let config = PricingConfig::default().with_coupon_policy(CouponPolicy::Compounded);
        let flows = generate_unit_flows(
            &sched,
            settlement,
            dec!(4000),
            dec!(6),
            &BrazilCalendar,
            &config,
        )
        .unwrap();

        assert_eq!(flows[0].nominal, dec!(118.25));
    }

    #[test]
    fn test_pro_rata_replaces_first_coupon() {
        let settlement = date(2025, 11, 25);
        let sched = schedule(settlement, date(2027, 5, 15));
        let config = PricingConfig::default().with_pro_rata_first_coupon(true);
        let flows = generate_unit_flows(
            &sched,
            settlement,
            dec!(4000),
            dec!(6),
            &BrazilCalendar,
            &config,
        )
        .unwrap();

        // 171 of 181 days between 2025-11-15 and 2026-05-15
        assert_eq!(flows.len(), 4);
        assert_eq!(flows[0].factor, dec!(0.03) * dec!(171) / dec!(181));
        assert!(flows[0].nominal < dec!(120.00));
        assert_eq!(flows[1].factor, dec!(0.03));

        let event = flows[0].to_event(dec!(1)).unwrap();
        assert_eq!(event.coupon_rate, dec!(2.8342));
    }

    #[test]
    fn test_pro_rata_inactive_on_anchor() {
        let settlement = date(2026, 5, 15);
        let sched = schedule(settlement, date(2027, 5, 15));
        let config = PricingConfig::default().with_pro_rata_first_coupon(true);
        let flows = generate_unit_flows(
            &sched,
            settlement,
            dec!(4000),
            dec!(6),
            &BrazilCalendar,
            &config,
        )
        .unwrap();

        assert_eq!(flows[0].factor, dec!(0.03));
    }

    #[test]
    fn test_scaling_and_accumulation() {
        let flow = UnitFlow {
            date: date(2026, 5, 15),
            kind: CashFlowKind::Interest,
            business_days: 120,
            factor: dec!(0.03),
            nominal: dec!(120.00),
            discount_factor: dec!(1.02),
        };

        let event = flow.to_event(dec!(3)).unwrap();
        assert_eq!(event.nominal_value, dec!(360.00));
        assert_eq!(event.coupon_rate, dec!(3.00));

        let principal = UnitFlow {
            kind: CashFlowKind::Principal,
            factor: Decimal::ONE,
            nominal: dec!(4000.00),
            ..flow.clone()
        };
        let mut events = vec![principal.to_event(dec!(3)).unwrap(), event];
        sort_events(&mut events);
        accumulate_present_values(&mut events).unwrap();

        assert_eq!(events[0].kind, CashFlowKind::Interest);
        assert_eq!(events[1].kind, CashFlowKind::Principal);
        assert_eq!(events[1].coupon_rate, Decimal::ZERO);
        assert_eq!(
            events[1].cumulative_present_value,
            events[0].present_value + events[1].present_value
        );
    }
}
