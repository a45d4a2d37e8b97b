//! Integration and property tests for portfolio pricing.
//!
//! These tests verify properties that must hold for any batch:
//! - Yearly totals do not depend on position order
//! - Parallel and sequential pricing agree
//! - Portfolio totals equal the sum of their parts

use ntnb_portfolio::prelude::*;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// =============================================================================
// TEST DATA GENERATORS
// =============================================================================

fn date(y: i32, m: u32, d: u32) -> Date {
    Date::from_ymd(y, m, d).unwrap()
}

/// Generates a deterministic ladder of positions.
fn ladder(n: usize) -> Vec<BondPosition> {
    let maturities = [(2028, 8), (2030, 5), (2035, 5), (2040, 8), (2045, 5), (2055, 5)];
    (0..n)
        .map(|i| {
            let (year, month) = maturities[i % maturities.len()];
            let input = BondInput::builder()
                .quantity(Decimal::from(1 + (i % 7) as i64))
                .settlement(date(2025, 11, 25))
                .maturity(date(year, month, 15))
                .contracted_yield(Decimal::new(550 + (i as i64 % 5) * 25, 2))
                .vna_previous(dec!(4400.123456))
                .monthly_inflation(dec!(0.45))
                .build()
                .unwrap();
            BondPosition::new(input).with_id(format!("P{i}"))
        })
        .collect()
}

// =============================================================================
// PROPERTIES
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn yearly_totals_are_order_independent(
        n in 1usize..10,
        shift in 0usize..10,
    ) {
        let positions = ladder(n);
        let mut shuffled = positions.clone();
        shuffled.rotate_left(shift % n);
        shuffled.reverse();

        let a = price_batch(&positions).unwrap();
        let b = price_batch(&shuffled).unwrap();

        prop_assert_eq!(a.yearly, b.yearly);
        prop_assert_eq!(a.total_invested, b.total_invested);
        prop_assert_eq!(a.total_returned, b.total_returned);
    }
}

// =============================================================================
// INTEGRATION
// =============================================================================

#[test]
fn parallel_and_sequential_agree() {
    let positions = ladder(40);

    let sequential = price_batch_with(&positions, &PortfolioConfig::sequential()).unwrap();
    let parallel = price_batch_with(
        &positions,
        &PortfolioConfig::new().with_parallel(true).with_threshold(1),
    )
    .unwrap();

    assert_eq!(sequential, parallel);
}

#[test]
fn entries_keep_identity_and_order() {
    let positions = ladder(6);
    let result = price_batch(&positions).unwrap();

    for (position, entry) in positions.iter().zip(&result.entries) {
        assert_eq!(entry.id, position.id);
        assert_eq!(entry.name, position.name);
        assert_eq!(entry.result.input, position.input);
    }
}

#[test]
fn yearly_table_sums_each_kind() {
    let result = price_batch(&ladder(12)).unwrap();

    let coupons: Decimal = result
        .entries
        .iter()
        .flat_map(|e| &e.result.cash_flows)
        .filter(|f| f.kind == CashFlowKind::Interest)
        .map(|f| f.nominal_value)
        .sum();
    let yearly_coupons: Decimal = result.yearly.iter().map(|y| y.coupon_total).sum();
    assert_eq!(coupons, yearly_coupons);

    let fees: Decimal = result.yearly.iter().map(|y| y.custody_fee_total).sum();
    assert_eq!(fees, -result.total_custody_fee);

    for row in &result.yearly {
        assert_eq!(
            row.combined_total,
            row.coupon_total + row.principal_total + row.custody_fee_total
        );
    }
}

#[test]
fn custody_fee_only_on_large_positions() {
    let result = price_batch(&ladder(7)).unwrap();

    for entry in &result.entries {
        let r = &entry.result;
        if r.total_investment > dec!(10000.00) {
            assert!(r.custody_fee > Decimal::ZERO, "{}", entry.id);
        } else {
            assert_eq!(r.custody_fee, Decimal::ZERO, "{}", entry.id);
        }
    }
}

#[test]
fn failing_position_fails_batch() {
    let mut positions = ladder(4);
    positions[2].input.settlement = date(2025, 11, 20);

    let err = price_batch(&positions).unwrap_err();
    assert!(err.to_string().contains("P2"));
    assert_eq!(err.engine_kind(), Some(ErrorKind::SettlementNotBusinessDay));
}

#[test]
fn rows_import_with_index_table() {
    let mut table = IndexTable::new();
    table.add_reference_value(date(2025, 11, 15), dec!(4450.000000));
    table.add_projected_inflation(2025, 11, dec!(0.30));

    let rows = vec![
        BondRow {
            id: Some("r1".into()),
            name: Some("NTN-B 2035".into()),
            quantity: Some(dec!(2)),
            settlement: Some("2025-11-25".into()),
            maturity: Some("2035-05-15".into()),
            contracted_yield: Some(dec!(6.1)),
            ..BondRow::default()
        },
        BondRow {
            quantity: Some(dec!(1)),
            settlement: Some("2025-11-25".into()),
            maturity: Some("2050-08-15".into()),
            contracted_yield: Some(dec!(6.3)),
            ..BondRow::default()
        },
    ];

    let positions = positions_from_rows(&rows, &table).unwrap();
    assert_eq!(positions[0].id, "r1");
    assert_eq!(positions[1].name, "NTN-B 2050");

    let result = price_batch(&positions).unwrap();
    assert_eq!(result.len(), 2);
    assert!(result.entries.iter().all(|e| e.result.input.vna_previous == dec!(4450)));
}
