//! Configuration for the pricing engine.

use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use ntnb_core::calendars::BusinessDayConvention;

use crate::error::{EngineError, EngineResult};

/// How the annual coupon rate is split into semiannual periods.
///
/// NTN-B pays 6% a year on the VNA. Two splits are in use and they give
/// materially different coupons, so the choice is explicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CouponPolicy {
    /// Half the annual rate per period (6% -> 3.0000%).
    #[default]
    Simple,
    /// Compounded split, `(1 + annual)^0.5 - 1` (6% -> ~2.9563%).
    Compounded,
}

impl CouponPolicy {
    /// Per-period rate as a fraction for an annual rate given as a fraction.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if a compounded split is asked for a rate at
    /// or below -100%.
    pub fn semiannual_rate(&self, annual_rate: Decimal) -> EngineResult<Decimal> {
        match self {
            CouponPolicy::Simple => Ok(annual_rate / Decimal::TWO),
            CouponPolicy::Compounded => (Decimal::ONE + annual_rate)
                .sqrt()
                .map(|root| root - Decimal::ONE)
                .ok_or_else(|| {
                    EngineError::invalid_config(format!(
                        "cannot compound an annual coupon of {annual_rate}"
                    ))
                }),
        }
    }
}

/// Custody fee charged on large positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustodyFeeConfig {
    /// The fee applies only when total investment exceeds this amount.
    pub threshold: Decimal,
    /// Annual rate as a fraction (0.002 = 0.20% a year).
    pub annual_rate: Decimal,
}

impl Default for CustodyFeeConfig {
    fn default() -> Self {
        Self {
            threshold: dec!(10000.00),
            annual_rate: dec!(0.002),
        }
    }
}

impl CustodyFeeConfig {
    /// Returns true if a position of `total_investment` pays the fee.
    #[must_use]
    pub fn applies_to(&self, total_investment: Decimal) -> bool {
        total_investment > self.threshold
    }
}

/// Pricing engine configuration.
///
/// Every field has a default matching Treasury practice, so a partial
/// TOML or JSON document is enough to override a single setting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Annual coupon rate as a fraction of the VNA.
    pub annual_coupon_rate: Decimal,

    /// How the annual rate is split into semiannual coupons.
    pub coupon_policy: CouponPolicy,

    /// Business days per year used for discounting and duration.
    pub business_days_per_year: u32,

    /// Adjustment applied to coupon and maturity dates.
    pub business_day_convention: BusinessDayConvention,

    /// Pay a fractional first coupon when settling mid-period.
    pub pro_rata_first_coupon: bool,

    /// Custody fee deduction, `None` to disable.
    pub custody_fee: Option<CustodyFeeConfig>,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            annual_coupon_rate: dec!(0.06),
            coupon_policy: CouponPolicy::Simple,
            business_days_per_year: 252,
            business_day_convention: BusinessDayConvention::Following,
            pro_rata_first_coupon: false,
            custody_fee: Some(CustodyFeeConfig::default()),
        }
    }
}

impl PricingConfig {
    /// Creates a new config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the coupon policy.
    #[must_use]
    pub fn with_coupon_policy(mut self, policy: CouponPolicy) -> Self {
        self.coupon_policy = policy;
        self
    }

    /// Sets the annual coupon rate (fraction).
    #[must_use]
    pub fn with_annual_coupon_rate(mut self, rate: Decimal) -> Self {
        self.annual_coupon_rate = rate;
        self
    }

    /// Sets the business-day adjustment for coupon dates.
    #[must_use]
    pub fn with_business_day_convention(mut self, convention: BusinessDayConvention) -> Self {
        self.business_day_convention = convention;
        self
    }

    /// Enables or disables the pro-rata first coupon.
    #[must_use]
    pub fn with_pro_rata_first_coupon(mut self, enabled: bool) -> Self {
        self.pro_rata_first_coupon = enabled;
        self
    }

    /// Sets the custody fee.
    #[must_use]
    pub fn with_custody_fee(mut self, fee: CustodyFeeConfig) -> Self {
        self.custody_fee = Some(fee);
        self
    }

    /// Disables the custody fee.
    #[must_use]
    pub fn without_custody_fee(mut self) -> Self {
        self.custody_fee = None;
        self
    }

    /// Per-period coupon rate as a fraction.
    pub fn semiannual_rate(&self) -> EngineResult<Decimal> {
        self.coupon_policy.semiannual_rate(self.annual_coupon_rate)
    }

    /// Checks the configuration for values the engine cannot use.
    pub fn validate(&self) -> EngineResult<()> {
        if self.annual_coupon_rate.is_sign_negative() {
            return Err(EngineError::invalid_config(format!(
                "annual coupon rate must not be negative, got {}",
                self.annual_coupon_rate
            )));
        }
        if self.business_days_per_year == 0 {
            return Err(EngineError::invalid_config(
                "business days per year must be positive",
            ));
        }
        if let Some(fee) = &self.custody_fee {
            if fee.annual_rate.is_sign_negative() || fee.threshold.is_sign_negative() {
                return Err(EngineError::invalid_config(
                    "custody fee rate and threshold must not be negative",
                ));
            }
        }
        Ok(())
    }
}
