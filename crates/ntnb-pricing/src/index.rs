//! Reference value and inflation lookups.
//!
//! The engine never owns index history. Callers inject an [`IndexSource`];
//! a `None` answer means "use the figure supplied with the bond".

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ntnb_core::Date;

/// Pure lookup of published and projected index figures.
pub trait IndexSource: Send + Sync {
    /// VNA published for `date`, if known.
    fn reference_value(&self, date: Date) -> Option<Decimal>;

    /// Projected monthly inflation (percent) for the month containing `date`.
    fn projected_inflation(&self, date: Date) -> Option<Decimal>;
}

/// An index source that knows nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoIndexData;

impl IndexSource for NoIndexData {
    fn reference_value(&self, _date: Date) -> Option<Decimal> {
        None
    }

    fn projected_inflation(&self, _date: Date) -> Option<Decimal> {
        None
    }
}

/// A published VNA observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceValueEntry {
    /// Publication date (normally the 15th).
    pub date: Date,
    /// VNA on that date.
    pub value: Decimal,
}

/// A monthly inflation projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InflationEntry {
    /// Calendar year.
    pub year: i32,
    /// Month (1-12).
    pub month: u32,
    /// Projected inflation for the month, percent.
    pub rate: Decimal,
}

/// In-memory index tables.
///
/// Reference values are matched on the exact date, inflation projections
/// on the calendar month.
///
/// # Example
///
/// ```rust
/// use ntnb_core::Date;
/// use ntnb_pricing::index::{IndexSource, IndexTable};
/// use rust_decimal_macros::dec;
///
/// let mut table = IndexTable::new();
/// table.add_projected_inflation(2025, 11, dec!(0.18));
///
/// let date = Date::from_ymd(2025, 11, 25).unwrap();
/// assert_eq!(table.projected_inflation(date), Some(dec!(0.18)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "IndexTableData", into = "IndexTableData")]
pub struct IndexTable {
    reference_values: BTreeMap<Date, Decimal>,
    projected_inflation: BTreeMap<(i32, u32), Decimal>,
}

impl IndexTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a published VNA.
    pub fn add_reference_value(&mut self, date: Date, value: Decimal) {
        self.reference_values.insert(date, value);
    }

    /// Records an inflation projection for a month.
    pub fn add_projected_inflation(&mut self, year: i32, month: u32, rate: Decimal) {
        self.projected_inflation.insert((year, month), rate);
    }

    /// Number of reference values held.
    #[must_use]
    pub fn reference_value_count(&self) -> usize {
        self.reference_values.len()
    }

    /// Number of monthly projections held.
    #[must_use]
    pub fn projection_count(&self) -> usize {
        self.projected_inflation.len()
    }
}

impl IndexSource for IndexTable {
    fn reference_value(&self, date: Date) -> Option<Decimal> {
        self.reference_values.get(&date).copied()
    }

    fn projected_inflation(&self, date: Date) -> Option<Decimal> {
        self.projected_inflation
            .get(&(date.year(), date.month()))
            .copied()
    }
}

/// Serialized form of [`IndexTable`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct IndexTableData {
    reference_values: Vec<ReferenceValueEntry>,
    projected_inflation: Vec<InflationEntry>,
}

impl From<IndexTableData> for IndexTable {
    fn from(data: IndexTableData) -> Self {
        let mut table = IndexTable::new();
        for entry in data.reference_values {
            table.add_reference_value(entry.date, entry.value);
        }
        for entry in data.projected_inflation {
            table.add_projected_inflation(entry.year, entry.month, entry.rate);
        }
        table
    }
}

impl From<IndexTable> for IndexTableData {
    fn from(table: IndexTable) -> Self {
        Self {
            reference_values: table
                .reference_values
                .into_iter()
                .map(|(date, value)| ReferenceValueEntry { date, value })
                .collect(),
            projected_inflation: table
                .projected_inflation
                .into_iter()
                .map(|((year, month), rate)| InflationEntry { year, month, rate })
                .collect(),
        }
    }
}
