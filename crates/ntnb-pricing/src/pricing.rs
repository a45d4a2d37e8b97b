//! Pricing aggregator: quotation, unit price, totals and duration.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ntnb_core::calendars::{BrazilCalendar, Calendar};
use ntnb_core::types::{floor_to, CASH_DECIMALS, QUOTATION_DECIMALS};
use ntnb_core::{CashFlowEvent, CashFlowKind};

use crate::cashflows::{accumulate_present_values, generate_unit_flows, sort_events, UnitFlow};
use crate::config::PricingConfig;
use crate::error::{EngineError, EngineResult};
use crate::index::IndexSource;
use crate::input::{BondInput, BondRow};
use crate::schedule::{CouponCycle, CouponSchedule};
use crate::vna::{project_vna, VnaProjection};

/// Complete valuation of one NTN-B position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingResult {
    /// The input that was priced.
    pub input: BondInput,
    /// VNA projected to settlement.
    pub vna: Decimal,
    /// Details of the VNA projection.
    pub vna_projection: VnaProjection,
    /// Coupon cycle implied by the maturity.
    pub coupon_cycle: CouponCycle,
    /// Price as a percentage of the VNA, truncated to four decimals.
    pub quotation: Decimal,
    /// Price per bond (PU), truncated to cents.
    pub unit_price: Decimal,
    /// `unit_price * quantity`.
    pub total_investment: Decimal,
    /// Sum of all nominal flows, custody fee included.
    pub gross_amount_returned: Decimal,
    /// `gross_amount_returned - total_investment`.
    pub gross_profit: Decimal,
    /// Custody fee charged, zero when none applies.
    pub custody_fee: Decimal,
    /// Macaulay duration in years.
    pub duration: f64,
    /// Cash flows in payment order.
    pub cash_flows: Vec<CashFlowEvent>,
}

impl PricingResult {
    /// The redemption flow.
    #[must_use]
    pub fn principal(&self) -> Option<&CashFlowEvent> {
        self.cash_flows
            .iter()
            .find(|e| e.kind == CashFlowKind::Principal)
    }

    /// Interest and principal flows, without fees.
    pub fn bond_flows(&self) -> impl Iterator<Item = &CashFlowEvent> {
        self.cash_flows.iter().filter(|e| e.kind.is_bond_flow())
    }

    /// Sum of coupon payments.
    #[must_use]
    pub fn total_interest(&self) -> Decimal {
        self.cash_flows
            .iter()
            .filter(|e| e.kind == CashFlowKind::Interest)
            .map(|e| e.nominal_value)
            .sum()
    }

    /// Present value of all flows at the contracted yield.
    #[must_use]
    pub fn total_present_value(&self) -> Decimal {
        self.cash_flows
            .last()
            .map_or(Decimal::ZERO, |e| e.cumulative_present_value)
    }
}

/// NTN-B pricer.
///
/// Holds a calendar and a configuration; pricing itself is a pure function
/// of the input, so one pricer can be shared across threads.
///
/// # Example
///
/// ```rust
/// use ntnb_core::Date;
/// use ntnb_pricing::{BondInput, Pricer};
/// use rust_decimal_macros::dec;
///
/// let input = BondInput::builder()
///     .quantity(dec!(1))
///     .settlement(Date::from_ymd(2025, 11, 25).unwrap())
///     .maturity(Date::from_ymd(2035, 5, 15).unwrap())
///     .contracted_yield(dec!(6.00))
///     .vna_previous(dec!(4000.00))
///     .monthly_inflation(dec!(0.50))
///     .build()
///     .unwrap();
///
/// let result = Pricer::new().price(&input).unwrap();
/// assert!(result.vna > dec!(4000.00));
/// assert!(result.duration > 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct Pricer<C: Calendar = BrazilCalendar> {
    calendar: C,
    config: PricingConfig,
}

impl Pricer<BrazilCalendar> {
    /// Creates a pricer on the exchange calendar with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(PricingConfig::default())
    }

    /// Creates a pricer on the exchange calendar.
    #[must_use]
    pub fn with_config(config: PricingConfig) -> Self {
        Self {
            calendar: BrazilCalendar,
            config,
        }
    }
}

impl Default for Pricer<BrazilCalendar> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Calendar> Pricer<C> {
    /// Creates a pricer on a custom calendar.
    #[must_use]
    pub fn with_calendar(calendar: C, config: PricingConfig) -> Self {
        Self { calendar, config }
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// The calendar in use.
    #[must_use]
    pub fn calendar(&self) -> &C {
        &self.calendar
    }

    /// Checks an input without pricing it.
    ///
    /// Checks run in a fixed order and the first failure is returned.
    pub fn validate(&self, input: &BondInput) -> EngineResult<()> {
        self.config.validate()?;

        if input.quantity <= Decimal::ZERO {
            return Err(EngineError::NonPositiveQuantity {
                quantity: input.quantity,
            });
        }
        if input.vna_previous <= Decimal::ZERO {
            return Err(EngineError::NonPositiveReferenceValue {
                value: input.vna_previous,
            });
        }
        if input.contracted_yield < Decimal::ZERO {
            return Err(EngineError::NegativeYield {
                value: input.contracted_yield,
            });
        }
        if input.monthly_inflation <= -Decimal::ONE_HUNDRED {
            return Err(EngineError::InvalidInflationRate {
                value: input.monthly_inflation,
            });
        }
        if input.maturity <= input.settlement {
            return Err(EngineError::MaturityNotAfterSettlement {
                settlement: input.settlement,
                maturity: input.maturity,
            });
        }
        if !self.calendar.is_business_day(input.settlement) {
            log::warn!(
                "settlement {} rejected: not a business day on {}",
                input.settlement,
                self.calendar.name()
            );
            return Err(EngineError::SettlementNotBusinessDay {
                settlement: input.settlement,
            });
        }

        Ok(())
    }

    /// Prices one position.
    ///
    /// # Errors
    ///
    /// Any validation failure, before any figure is computed, or
    /// `NumericOverflow` if an amount leaves the decimal range.
    pub fn price(&self, input: &BondInput) -> EngineResult<PricingResult> {
        self.validate(input)?;
        let config = &self.config;

        let projection = project_vna(input.vna_previous, input.monthly_inflation, input.settlement)?;
        let vna = projection.vna;

        let schedule = CouponSchedule::build(
            input.settlement,
            input.maturity,
            &self.calendar,
            config.business_day_convention,
        );
        let unit_flows = generate_unit_flows(
            &schedule,
            input.settlement,
            vna,
            input.contracted_yield,
            &self.calendar,
            config,
        )?;

        let discounted = checked_sum(
            unit_flows
                .iter()
                .map(UnitFlow::discounted_factor)
                .collect::<EngineResult<Vec<_>>>()?,
            "discounted factors",
        )?;
        let quotation = discounted
            .checked_mul(Decimal::ONE_HUNDRED)
            .map(|v| floor_to(v, QUOTATION_DECIMALS))
            .ok_or_else(|| EngineError::overflow("quotation"))?;
        let unit_price = vna
            .checked_mul(quotation)
            .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
            .map(|v| floor_to(v, CASH_DECIMALS))
            .ok_or_else(|| EngineError::overflow("unit price"))?;
        let total_investment = unit_price
            .checked_mul(input.quantity)
            .ok_or_else(|| EngineError::overflow("total investment"))?;

        let mut cash_flows = unit_flows
            .iter()
            .map(|flow| flow.to_event(input.quantity))
            .collect::<EngineResult<Vec<_>>>()?;

        let custody_fee = self.custody_fee_event(&unit_flows, total_investment)?;
        let fee_amount = custody_fee
            .as_ref()
            .map_or(Decimal::ZERO, |e| -e.nominal_value);
        cash_flows.extend(custody_fee);

        sort_events(&mut cash_flows);
        accumulate_present_values(&mut cash_flows)?;

        let gross_amount_returned =
            checked_sum(cash_flows.iter().map(|e| e.nominal_value), "gross amount returned")?;
        let gross_profit = gross_amount_returned
            .checked_sub(total_investment)
            .ok_or_else(|| EngineError::overflow("gross profit"))?;
        let duration = macaulay_duration(&cash_flows, config.business_days_per_year)?;

        log::debug!(
            "priced {}..{} x{}: quotation {}%, PU {}, {} flows, duration {:.4}",
            input.settlement,
            input.maturity,
            input.quantity,
            quotation,
            unit_price,
            cash_flows.len(),
            duration
        );

        Ok(PricingResult {
            input: input.clone(),
            vna,
            vna_projection: projection,
            coupon_cycle: schedule.cycle,
            quotation,
            unit_price,
            total_investment,
            gross_amount_returned,
            gross_profit,
            custody_fee: fee_amount,
            duration,
            cash_flows,
        })
    }

    /// Resolves an imported row against an index source, then prices it.
    pub fn price_row(&self, row: &BondRow, source: &dyn IndexSource) -> EngineResult<PricingResult> {
        self.price(&row.resolve(source)?)
    }

    fn custody_fee_event(
        &self,
        unit_flows: &[UnitFlow],
        total_investment: Decimal,
    ) -> EngineResult<Option<CashFlowEvent>> {
        let Some(fee) = self.config.custody_fee else {
            return Ok(None);
        };
        if !fee.applies_to(total_investment) {
            return Ok(None);
        }
        let Some(principal) = unit_flows
            .iter()
            .find(|f| f.kind == CashFlowKind::Principal)
        else {
            return Ok(None);
        };

        let years = Decimal::from(principal.business_days)
            / Decimal::from(self.config.business_days_per_year);
        let amount = total_investment
            .checked_mul(fee.annual_rate)
            .and_then(|v| v.checked_mul(years))
            .map(|v| floor_to(v, CASH_DECIMALS))
            .ok_or_else(|| EngineError::overflow("custody fee"))?;
        if amount <= Decimal::ZERO {
            return Ok(None);
        }

        log::info!(
            "custody fee {} on investment {} ({} business days)",
            amount,
            total_investment,
            principal.business_days
        );

        let present_value = (-amount)
            .checked_div(principal.discount_factor)
            .ok_or_else(|| EngineError::overflow("custody fee present value"))?;

        Ok(Some(CashFlowEvent {
            date: principal.date,
            kind: CashFlowKind::CustodyFee,
            business_days: principal.business_days,
            coupon_rate: Decimal::ZERO,
            nominal_value: -amount,
            present_value,
            cumulative_present_value: Decimal::ZERO,
        }))
    }
}

fn checked_sum(values: impl IntoIterator<Item = Decimal>, operation: &str) -> EngineResult<Decimal> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(v))
        .ok_or_else(|| EngineError::overflow(operation))
}

/// Macaulay duration in years over interest and principal flows.
///
/// Each flow's business-day time is weighted by its share of the total
/// present value. Returns zero when there are no bond flows or their
/// present values sum to zero.
pub fn macaulay_duration(events: &[CashFlowEvent], business_days_per_year: u32) -> EngineResult<f64> {
    let bond_flows = || events.iter().filter(|e| e.kind.is_bond_flow());

    let total_pv = checked_sum(bond_flows().map(|e| e.present_value), "duration weights")?;
    if total_pv.is_zero() || business_days_per_year == 0 {
        return Ok(0.0);
    }

    let weighted_days = bond_flows()
        .map(|e| {
            e.present_value
                .checked_div(total_pv)
                .and_then(|share| share.checked_mul(Decimal::from(e.business_days)))
        })
        .try_fold(Decimal::ZERO, |acc, v| v.and_then(|v| acc.checked_add(v)))
        .ok_or_else(|| EngineError::overflow("duration"))?;

    Ok(weighted_days.to_f64().unwrap_or(0.0) / f64::from(business_days_per_year))
}

/// Prices a bond with the default configuration.
pub fn price_bond(input: &BondInput) -> EngineResult<PricingResult> {
    Pricer::new().price(input)
}

/// Prices a bond with a custom configuration.
pub fn price_bond_with(input: &BondInput, config: &PricingConfig) -> EngineResult<PricingResult> {
    Pricer::with_config(config.clone()).price(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CustodyFeeConfig;
    use crate::error::ErrorKind;
    use ntnb_core::Date;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn input(quantity: Decimal, maturity: Date) -> BondInput {
        BondInput::builder()
            .quantity(quantity)
            .settlement(date(2025, 11, 25))
            .maturity(maturity)
            .contracted_yield(dec!(6.00))
            .vna_previous(dec!(4000.00))
            .monthly_inflation(dec!(0.50))
            .build()
            .unwrap()
    }

    #[test]
    fn test_reference_example() {
        let result = price_bond(&input(dec!(1), date(2055, 5, 15))).unwrap();

        assert!(result.vna > dec!(4000.00));
        assert!(result.duration > 0.0 && result.duration < 29.5);

        let last = result.cash_flows.last().unwrap();
        assert_eq!(last.kind, CashFlowKind::Principal);
        assert_eq!(last.date, date(2055, 5, 17));

        // Final coupon shares the date and is listed first.
        let before = &result.cash_flows[result.cash_flows.len() - 2];
        assert_eq!(before.kind, CashFlowKind::Interest);
        assert_eq!(before.date, last.date);
    }

    #[test]
    fn test_price_identities() {
        let result = price_bond(&input(dec!(3), date(2035, 5, 15))).unwrap();

        assert_eq!(result.quotation, floor_to(result.quotation, QUOTATION_DECIMALS));
        assert_eq!(
            result.unit_price,
            floor_to(result.vna * result.quotation / dec!(100), CASH_DECIMALS)
        );
        assert_eq!(result.total_investment, result.unit_price * dec!(3));
        assert_eq!(
            result.gross_profit,
            result.gross_amount_returned - result.total_investment
        );
        // 3 bonds of ~R$4,000 are above the fee threshold
        assert!(result.custody_fee > Decimal::ZERO);
        assert_eq!(result.cash_flows.last().unwrap().kind, CashFlowKind::CustodyFee);
    }

    #[test]
    fn test_small_position_has_no_fee() {
        let result = price_bond(&input(dec!(1), date(2035, 5, 15))).unwrap();

        assert!(result.total_investment <= dec!(10000.00));
        assert_eq!(result.custody_fee, Decimal::ZERO);
        assert!(result.cash_flows.iter().all(|e| e.kind.is_bond_flow()));
    }

    #[test]
    fn test_fee_amount() {
        let config = PricingConfig::default().with_custody_fee(CustodyFeeConfig {
            threshold: Decimal::ZERO,
            annual_rate: dec!(0.002),
        });
        let result = price_bond_with(&input(dec!(1), date(2035, 5, 15)), &config).unwrap();

        let principal = result.principal().unwrap();
        let years = Decimal::from(principal.business_days) / dec!(252);
        let expected = floor_to(result.total_investment * dec!(0.002) * years, 2);
        assert_eq!(result.custody_fee, expected);

        let without = price_bond_with(
            &input(dec!(1), date(2035, 5, 15)),
            &PricingConfig::default().without_custody_fee(),
        )
        .unwrap();
        assert_eq!(
            result.gross_amount_returned,
            without.gross_amount_returned - expected
        );
        assert_eq!(result.quotation, without.quotation);
        assert_eq!(result.duration, without.duration);
    }

    #[test]
    fn test_cumulative_present_value() {
        let result = price_bond(&input(dec!(5), date(2030, 8, 15))).unwrap();

        let mut running = Decimal::ZERO;
        for event in &result.cash_flows {
            running += event.present_value;
            assert_eq!(event.cumulative_present_value, running);
        }
        assert_eq!(result.total_present_value(), running);
    }

    #[test]
    fn test_validation_order() {
        let mut bad = input(dec!(0), date(2025, 11, 25));
        let err = price_bond(&bad).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NonPositiveQuantity);

        bad.quantity = dec!(1);
        let err = price_bond(&bad).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MaturityNotAfterSettlement);

        bad.maturity = date(2035, 5, 15);
        bad.settlement = date(2025, 11, 20);
        let err = price_bond(&bad).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SettlementNotBusinessDay);

        bad.settlement = date(2025, 11, 25);
        bad.contracted_yield = dec!(-0.01);
        assert_eq!(price_bond(&bad).unwrap_err().kind(), ErrorKind::NegativeYield);
    }

    #[test]
    fn test_huge_vna_reports_overflow() {
        let mut huge = input(dec!(1), date(2035, 5, 15));
        huge.vna_previous = dec!(1000000000000000000000000000);

        let err = price_bond(&huge).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NumericOverflow);
    }

    #[test]
    fn test_duration_empty_and_zero() {
        assert_eq!(macaulay_duration(&[], 252).unwrap(), 0.0);
    }

    #[test]
    fn test_price_row() {
        let row = BondRow {
            quantity: Some(dec!(1)),
            settlement: Some("2025-11-25".into()),
            maturity: Some("2035-05-15".into()),
            contracted_yield: Some(dec!(6)),
            vna_previous: Some(dec!(4000)),
            monthly_inflation: Some(dec!(0.5)),
            ..BondRow::default()
        };
        let from_row = Pricer::new()
            .price_row(&row, &crate::index::NoIndexData)
            .unwrap();
        let direct = price_bond(&input(dec!(1), date(2035, 5, 15))).unwrap();
        assert_eq!(from_row.quotation, direct.quotation);
    }
}
