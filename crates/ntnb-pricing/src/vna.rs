//! VNA projection to the settlement date.
//!
//! The VNA is published on the 15th of each month. Between two publications
//! it is projected with the month's expected inflation, exponentially in the
//! fraction of calendar days elapsed since the last publication:
//!
//! ```text
//! x   = days(anchor_start, settlement) / days(anchor_start, anchor_end)
//! VNA = floor6(VNA_previous * (1 + inflation)^x)
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ntnb_core::types::{decimal_from_f64, floor_to, VNA_DECIMALS};
use ntnb_core::Date;

use crate::error::{EngineError, EngineResult};

/// Day of month on which the VNA is published.
pub const VNA_ANCHOR_DAY: u32 = 15;

/// Outcome of a VNA projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VnaProjection {
    /// Publication date preceding (or equal to) settlement.
    pub anchor_start: Date,
    /// Next publication date.
    pub anchor_end: Date,
    /// Elapsed fraction of the publication month, in `[0, 1)`.
    pub elapsed_fraction: f64,
    /// Growth factor applied to the previous VNA.
    pub factor: Decimal,
    /// Projected VNA, truncated to six decimals.
    pub vna: Decimal,
}

/// Returns the publication dates bracketing `settlement`.
///
/// On or after the 15th the bracket is this month's 15th to next month's;
/// before the 15th it is last month's 15th to this month's. Neither date is
/// business-day adjusted.
pub fn vna_anchors(settlement: Date) -> EngineResult<(Date, Date)> {
    let month_offset = if settlement.day() >= VNA_ANCHOR_DAY { 0 } else { -1 };
    let anchor_start = settlement
        .add_months(month_offset)
        .and_then(|d| d.with_day(VNA_ANCHOR_DAY))
        .map_err(|_| EngineError::overflow("VNA anchor date"))?;
    let anchor_end = anchor_start
        .add_months(1)
        .map_err(|_| EngineError::overflow("VNA anchor date"))?;
    Ok((anchor_start, anchor_end))
}

/// Projects the VNA to `settlement`.
///
/// `monthly_inflation` is a percentage (0.50 = 0.5% for the month).
///
/// # Errors
///
/// - `NonPositiveReferenceValue` when `vna_previous <= 0`
/// - `InvalidInflationRate` when `monthly_inflation <= -100`
/// - `NumericOverflow` when the projected figure does not fit a decimal
pub fn project_vna(
    vna_previous: Decimal,
    monthly_inflation: Decimal,
    settlement: Date,
) -> EngineResult<VnaProjection> {
    if vna_previous <= Decimal::ZERO {
        return Err(EngineError::NonPositiveReferenceValue {
            value: vna_previous,
        });
    }
    let growth = Decimal::ONE + monthly_inflation / Decimal::ONE_HUNDRED;
    if growth <= Decimal::ZERO {
        return Err(EngineError::InvalidInflationRate {
            value: monthly_inflation,
        });
    }

    let (anchor_start, anchor_end) = vna_anchors(settlement)?;
    let elapsed = anchor_start.days_between(&settlement) as f64;
    let period = anchor_start.days_between(&anchor_end) as f64;
    let elapsed_fraction = elapsed / period;

    let base = growth
        .to_f64()
        .ok_or_else(|| EngineError::overflow("VNA growth"))?;
    let factor = decimal_from_f64(base.powf(elapsed_fraction))
        .ok_or_else(|| EngineError::overflow("VNA growth factor"))?;
    let vna = vna_previous
        .checked_mul(factor)
        .map(|v| floor_to(v, VNA_DECIMALS))
        .ok_or_else(|| EngineError::overflow("VNA"))?;

    log::debug!(
        "VNA {} -> {} over {}..{} (x = {:.6})",
        vna_previous,
        vna,
        anchor_start,
        anchor_end,
        elapsed_fraction
    );

    Ok(VnaProjection {
        anchor_start,
        anchor_end,
        elapsed_fraction,
        factor,
        vna,
    })
}
