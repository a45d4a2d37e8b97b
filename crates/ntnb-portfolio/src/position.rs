//! Portfolio positions.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ntnb_pricing::{BondInput, BondRow, IndexSource};

use crate::error::{BatchResult, PortfolioError};

/// One bond holding with its identity.
///
/// The id is opaque to the engine; it is carried through to the result so
/// callers can find the position again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BondPosition {
    /// Opaque identifier, unique within a portfolio.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Pricing input.
    pub input: BondInput,
}

impl BondPosition {
    /// Creates a position with a fresh random id.
    ///
    /// The name defaults to `NTN-B <maturity year>`.
    #[must_use]
    pub fn new(input: BondInput) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: default_name(&input),
            input,
        }
    }

    /// Sets the id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Builds a position from an imported row.
    ///
    /// Blank ids and names are replaced the same way [`BondPosition::new`]
    /// fills them.
    pub fn from_row(row: &BondRow, source: &dyn IndexSource) -> BatchResult<Self> {
        let input = row.resolve(source).map_err(|e| match &row.id {
            Some(id) if !id.trim().is_empty() => PortfolioError::position(id.trim(), e),
            _ => PortfolioError::import(0, e),
        })?;

        let mut position = Self::new(input);
        if let Some(id) = non_blank(row.id.as_deref()) {
            position.id = id.to_string();
        }
        if let Some(name) = non_blank(row.name.as_deref()) {
            position.name = name.to_string();
        }
        Ok(position)
    }
}

/// Builds positions from imported rows, reporting the failing row index.
pub fn positions_from_rows(
    rows: &[BondRow],
    source: &dyn IndexSource,
) -> BatchResult<Vec<BondPosition>> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            BondPosition::from_row(row, source).map_err(|e| match e {
                PortfolioError::Import { source, .. } => PortfolioError::import(i, source),
                other => other,
            })
        })
        .collect()
}

fn default_name(input: &BondInput) -> String {
    format!("NTN-B {}", input.maturity.year())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ntnb_core::Date;
    use ntnb_pricing::{ErrorKind, NoIndexData};
    use rust_decimal_macros::dec;

    fn input() -> BondInput {
        BondInput::builder()
            .quantity(dec!(1))
            .settlement(Date::from_ymd(2025, 11, 25).unwrap())
            .maturity(Date::from_ymd(2045, 5, 15).unwrap())
            .contracted_yield(dec!(6))
            .vna_previous(dec!(4000))
            .monthly_inflation(dec!(0.5))
            .build()
            .unwrap()
    }

    fn row() -> BondRow {
        BondRow {
            quantity: Some(dec!(1)),
            settlement: Some("2025-11-25".into()),
            maturity: Some("2045-05-15".into()),
            contracted_yield: Some(dec!(6)),
            vna_previous: Some(dec!(4000)),
            monthly_inflation: Some(dec!(0.5)),
            ..BondRow::default()
        }
    }

    #[test]
    fn test_new_generates_uuid() {
        let a = BondPosition::new(input());
        let b = BondPosition::new(input());

        assert_ne!(a.id, b.id);
        assert!(Uuid::parse_str(&a.id).is_ok());
        assert_eq!(a.name, "NTN-B 2045");
    }

    #[test]
    fn test_builder() {
        let position = BondPosition::new(input()).with_id("P1").with_name("Long IPCA");
        assert_eq!(position.id, "P1");
        assert_eq!(position.name, "Long IPCA");
    }

    #[test]
    fn test_from_row_keeps_identity() {
        let mut r = row();
        r.id = Some(" b-7 ".into());
        r.name = Some("NTN-B 2045 (broker)".into());

        let position = BondPosition::from_row(&r, &NoIndexData).unwrap();
        assert_eq!(position.id, "b-7");
        assert_eq!(position.name, "NTN-B 2045 (broker)");
    }

    #[test]
    fn test_from_row_blank_id() {
        let mut r = row();
        r.id = Some("  ".into());
        let position = BondPosition::from_row(&r, &NoIndexData).unwrap();
        assert!(Uuid::parse_str(&position.id).is_ok());
    }

    #[test]
    fn test_rows_report_index() {
        let mut bad = row();
        bad.maturity = None;
        let err = positions_from_rows(&[row(), bad], &NoIndexData).unwrap_err();

        assert!(matches!(err, PortfolioError::Import { row: 1, .. }));
        assert_eq!(err.engine_kind(), Some(ErrorKind::MissingField));
    }
}
