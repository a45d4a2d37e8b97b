//! Bond inputs: the validated [`BondInput`] and the raw imported [`BondRow`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ntnb_core::Date;

use crate::error::{EngineError, EngineResult};
use crate::index::IndexSource;
use crate::vna::vna_anchors;

/// Everything needed to price one NTN-B position.
///
/// Rates are percentages: a contracted yield of `6.00` means 6% a year and
/// a monthly inflation of `0.50` means 0.5% a month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BondInput {
    /// Number of bonds held (fractions allowed).
    pub quantity: Decimal,
    /// Settlement (purchase) date.
    pub settlement: Date,
    /// Maturity date, unadjusted.
    pub maturity: Date,
    /// Contracted real yield, annual percent.
    pub contracted_yield: Decimal,
    /// VNA at the anchor preceding settlement.
    pub vna_previous: Decimal,
    /// Projected inflation for the settlement month, percent.
    pub monthly_inflation: Decimal,
}

impl BondInput {
    /// Creates a new builder.
    #[must_use]
    pub fn builder() -> BondInputBuilder {
        BondInputBuilder::default()
    }
}

/// Builder for [`BondInput`].
///
/// Reports the first absent field as `MissingField`.
#[derive(Debug, Clone, Default)]
pub struct BondInputBuilder {
    quantity: Option<Decimal>,
    settlement: Option<Date>,
    maturity: Option<Date>,
    contracted_yield: Option<Decimal>,
    vna_previous: Option<Decimal>,
    monthly_inflation: Option<Decimal>,
}

impl BondInputBuilder {
    /// Sets the quantity.
    #[must_use]
    pub fn quantity(mut self, quantity: Decimal) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Sets the settlement date.
    #[must_use]
    pub fn settlement(mut self, date: Date) -> Self {
        self.settlement = Some(date);
        self
    }

    /// Sets the maturity date.
    #[must_use]
    pub fn maturity(mut self, date: Date) -> Self {
        self.maturity = Some(date);
        self
    }

    /// Sets the contracted yield (annual percent).
    #[must_use]
    pub fn contracted_yield(mut self, yield_pct: Decimal) -> Self {
        self.contracted_yield = Some(yield_pct);
        self
    }

    /// Sets the previous VNA.
    #[must_use]
    pub fn vna_previous(mut self, vna: Decimal) -> Self {
        self.vna_previous = Some(vna);
        self
    }

    /// Sets the projected monthly inflation (percent).
    #[must_use]
    pub fn monthly_inflation(mut self, rate_pct: Decimal) -> Self {
        self.monthly_inflation = Some(rate_pct);
        self
    }

    /// Builds the input.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` naming the first field that was not set.
    pub fn build(self) -> EngineResult<BondInput> {
        Ok(BondInput {
            quantity: self.quantity.ok_or_else(|| EngineError::missing_field("quantity"))?,
            settlement: self
                .settlement
                .ok_or_else(|| EngineError::missing_field("settlement"))?,
            maturity: self.maturity.ok_or_else(|| EngineError::missing_field("maturity"))?,
            contracted_yield: self
                .contracted_yield
                .ok_or_else(|| EngineError::missing_field("contracted_yield"))?,
            vna_previous: self
                .vna_previous
                .ok_or_else(|| EngineError::missing_field("vna_previous"))?,
            monthly_inflation: self
                .monthly_inflation
                .ok_or_else(|| EngineError::missing_field("monthly_inflation"))?,
        })
    }
}

/// A bond row as delivered by an import source.
///
/// Dates are still text and any field may be absent. [`BondRow::resolve`]
/// turns it into a [`BondInput`], consulting an [`IndexSource`] for the VNA
/// and the inflation projection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BondRow {
    /// Opaque identifier.
    pub id: Option<String>,
    /// Display name (e.g. "NTN-B 2055").
    pub name: Option<String>,
    /// Number of bonds.
    pub quantity: Option<Decimal>,
    /// Settlement date, `YYYY-MM-DD`.
    pub settlement: Option<String>,
    /// Maturity date, `YYYY-MM-DD`.
    pub maturity: Option<String>,
    /// Contracted yield, annual percent.
    pub contracted_yield: Option<Decimal>,
    /// VNA at the anchor preceding settlement.
    pub vna_previous: Option<Decimal>,
    /// Projected monthly inflation, percent.
    pub monthly_inflation: Option<Decimal>,
}

impl BondRow {
    /// Resolves the row into a [`BondInput`].
    ///
    /// The index source is asked first: its reference value at the VNA
    /// anchor and its inflation projection for the settlement date win when
    /// present, and the row's own figures fill the gaps.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` or `InvalidDateFormat` for incomplete rows.
    pub fn resolve(&self, source: &dyn IndexSource) -> EngineResult<BondInput> {
        let settlement = parse_field("settlement", self.settlement.as_deref())?;
        let maturity = parse_field("maturity", self.maturity.as_deref())?;

        let (anchor, _) = vna_anchors(settlement)?;
        let vna_previous = source
            .reference_value(anchor)
            .or(self.vna_previous)
            .ok_or_else(|| EngineError::missing_field("vna_previous"))?;
        let monthly_inflation = source
            .projected_inflation(settlement)
            .or(self.monthly_inflation)
            .ok_or_else(|| EngineError::missing_field("monthly_inflation"))?;

        let mut builder = BondInput::builder()
            .settlement(settlement)
            .maturity(maturity)
            .vna_previous(vna_previous)
            .monthly_inflation(monthly_inflation);
        if let Some(quantity) = self.quantity {
            builder = builder.quantity(quantity);
        }
        if let Some(yield_pct) = self.contracted_yield {
            builder = builder.contracted_yield(yield_pct);
        }
        builder.build()
    }
}

fn parse_field(field: &str, value: Option<&str>) -> EngineResult<Date> {
    let text = value
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| EngineError::missing_field(field))?;
    Date::parse(text).map_err(|_| EngineError::invalid_date_format(field, text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::index::{IndexTable, NoIndexData};
    use rust_decimal_macros::dec;

    fn row() -> BondRow {
        BondRow {
            id: Some("b1".into()),
            name: Some("NTN-B 2055".into()),
            quantity: Some(dec!(2)),
            settlement: Some("2025-11-25".into()),
            maturity: Some("2055-05-15".into()),
            contracted_yield: Some(dec!(6.00)),
            vna_previous: Some(dec!(4000.00)),
            monthly_inflation: Some(dec!(0.50)),
        }
    }

    #[test]
    fn test_builder_reports_missing_field() {
        let err = BondInput::builder().quantity(dec!(1)).build().unwrap_err();
        assert_eq!(err, EngineError::missing_field("settlement"));
    }

    #[test]
    fn test_resolve_complete_row() {
        let input = row().resolve(&NoIndexData).unwrap();
        assert_eq!(input.quantity, dec!(2));
        assert_eq!(input.settlement, Date::from_ymd(2025, 11, 25).unwrap());
        assert_eq!(input.maturity, Date::from_ymd(2055, 5, 15).unwrap());
        assert_eq!(input.vna_previous, dec!(4000.00));
    }

    #[test]
    fn test_resolve_bad_date() {
        let mut bad = row();
        bad.maturity = Some("15/05/2055".into());
        let err = bad.resolve(&NoIndexData).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidDateFormat);
    }

    #[test]
    fn test_resolve_missing_values() {
        let mut bad = row();
        bad.settlement = Some("  ".into());
        assert_eq!(bad.resolve(&NoIndexData).unwrap_err().kind(), ErrorKind::MissingField);

        let mut bad = row();
        bad.contracted_yield = None;
        assert_eq!(
            bad.resolve(&NoIndexData).unwrap_err(),
            EngineError::missing_field("contracted_yield")
        );

        let mut bad = row();
        bad.vna_previous = None;
        assert_eq!(
            bad.resolve(&NoIndexData).unwrap_err(),
            EngineError::missing_field("vna_previous")
        );
    }

    #[test]
    fn test_index_source_takes_precedence() {
        let mut table = IndexTable::new();
        table.add_reference_value(Date::from_ymd(2025, 11, 15).unwrap(), dec!(4500.123456));
        table.add_projected_inflation(2025, 11, dec!(0.33));

        let mut partial = row();
        partial.vna_previous = None;
        let input = partial.resolve(&table).unwrap();
        assert_eq!(input.vna_previous, dec!(4500.123456));
        assert_eq!(input.monthly_inflation, dec!(0.33));
    }
}
