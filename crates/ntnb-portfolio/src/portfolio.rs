//! Batch pricing of NTN-B positions.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ntnb_pricing::{Pricer, PricingResult};

use crate::config::PortfolioConfig;
use crate::error::{BatchResult, PortfolioError};
use crate::parallel::maybe_parallel_map;
use crate::position::BondPosition;
use crate::yearly::{checked_add, YearlyFlow, YearlyTable};

/// Priced position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioEntry {
    /// Position id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Full pricing result.
    pub result: PricingResult,
}

/// Priced portfolio with yearly consolidation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioResult {
    /// One entry per position, in input order.
    pub entries: Vec<PortfolioEntry>,
    /// Nominal flows by calendar year, ascending.
    pub yearly: Vec<YearlyFlow>,
    /// Sum of total investments.
    pub total_invested: Decimal,
    /// Sum of gross amounts returned.
    pub total_returned: Decimal,
    /// `total_returned - total_invested`.
    pub total_profit: Decimal,
    /// Sum of custody fees charged.
    pub total_custody_fee: Decimal,
    /// Investment-weighted duration in years.
    pub duration: f64,
}

impl PortfolioResult {
    /// Number of positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true for an empty portfolio.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total cash flow events across all positions.
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.yearly.iter().map(|y| y.event_count).sum()
    }
}

/// Prices positions with the default configuration.
pub fn price_batch(positions: &[BondPosition]) -> BatchResult<PortfolioResult> {
    price_batch_with(positions, &PortfolioConfig::default())
}

/// Prices positions and consolidates their flows.
///
/// Each position is priced independently. If any fails, the error of the
/// first failing position in input order is returned and no portfolio is
/// built.
pub fn price_batch_with(
    positions: &[BondPosition],
    config: &PortfolioConfig,
) -> BatchResult<PortfolioResult> {
    config.validate()?;
    let pricer = Pricer::with_config(config.pricing.clone());

    let priced = maybe_parallel_map(positions, config, |position| {
        pricer
            .price(&position.input)
            .map_err(|e| PortfolioError::position(&position.id, e))
    });

    let mut entries = Vec::with_capacity(positions.len());
    for (position, result) in positions.iter().zip(priced) {
        entries.push(PortfolioEntry {
            id: position.id.clone(),
            name: position.name.clone(),
            result: result?,
        });
    }

    let result = consolidate(entries)?;
    log::debug!(
        "portfolio of {} positions: invested {}, returned {}, {} years",
        result.len(),
        result.total_invested,
        result.total_returned,
        result.yearly.len()
    );
    Ok(result)
}

/// Builds portfolio totals from priced entries.
///
/// Each entry's flows are folded into their own year table, which is then
/// merged into the portfolio table.
///
/// # Errors
///
/// [`PortfolioError::Overflow`] if a total leaves the decimal range.
pub fn consolidate(entries: Vec<PortfolioEntry>) -> BatchResult<PortfolioResult> {
    let mut table = YearlyTable::new();
    let mut total_invested = Decimal::ZERO;
    let mut total_returned = Decimal::ZERO;
    let mut total_custody_fee = Decimal::ZERO;
    let mut weighted_duration = 0.0;

    for entry in &entries {
        let r = &entry.result;
        let mut position_table = YearlyTable::new();
        position_table.add_flows(&r.cash_flows)?;
        table.merge(&position_table)?;

        total_invested = checked_add(total_invested, r.total_investment, "total invested")?;
        total_returned = checked_add(total_returned, r.gross_amount_returned, "total returned")?;
        total_custody_fee = checked_add(total_custody_fee, r.custody_fee, "total custody fee")?;
        weighted_duration += r.total_investment.to_f64().unwrap_or(0.0) * r.duration;
    }

    let invested = total_invested.to_f64().unwrap_or(0.0);
    let duration = if invested > 0.0 {
        weighted_duration / invested
    } else {
        0.0
    };

    let total_profit = total_returned
        .checked_sub(total_invested)
        .ok_or_else(|| PortfolioError::overflow("total profit"))?;

    Ok(PortfolioResult {
        entries,
        yearly: table.into_rows(),
        total_invested,
        total_returned,
        total_profit,
        total_custody_fee,
        duration,
    })
}
