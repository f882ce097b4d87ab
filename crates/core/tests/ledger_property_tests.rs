//! Property-based integration tests for positions and the invested history.
//!
//! Amounts are generated from integer cents and dates from day offsets so
//! every generated operation is valid and exactly representable.

use carteira_core::operations::{AssetType, Operation, OperationFees};
use carteira_core::portfolio::history::{PeriodFilter, TimeSeriesReconstructor};
use carteira_core::portfolio::metrics::{average_cost, round_to_whole_units, unrealized_pnl};
use carteira_core::portfolio::positions::PositionBuilder;
use carteira_core::quotes::QuoteMap;
use carteira_core::utils::time_utils::{first_day_of_month, get_months_between};
use chrono::{Days, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;

// =============================================================================
// Generators
// =============================================================================

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
}

fn now() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
}

fn arb_ticker() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("PETR4".to_string()),
        Just("VALE3".to_string()),
        Just("HGLG11".to_string()),
        Just("BOVA11".to_string()),
    ]
}

fn arb_kind() -> impl Strategy<Value = &'static str> {
    prop_oneof![3 => Just("buy"), 1 => Just("sell")]
}

/// Generates a valid operation dated between 2020-01-01 and early 2024.
fn arb_operation(kind: impl Strategy<Value = &'static str>) -> impl Strategy<Value = Operation> {
    (
        arb_ticker(),
        kind,
        1i64..500,          // quantity
        1i64..20_000,       // unit price in cents
        0i64..2_000,        // fees in cents
        0u64..1_500,        // day offset
    )
        .prop_map(|(ticker, kind, quantity, price_cents, fee_cents, offset)| {
            let asset_type = if ticker.ends_with("11") {
                AssetType::Reit
            } else {
                AssetType::Stock
            };
            Operation {
                id: None,
                ticker,
                display_name: None,
                asset_type,
                operation_kind: kind.to_string(),
                quantity: Decimal::from(quantity),
                unit_price: Decimal::new(price_cents, 2),
                fees: OperationFees::flat(Decimal::new(fee_cents, 2)),
                operation_date: base_date() + Days::new(offset),
            }
        })
}

fn arb_operations() -> impl Strategy<Value = Vec<Operation>> {
    prop::collection::vec(arb_operation(arb_kind()), 0..40)
}

fn arb_buys() -> impl Strategy<Value = Vec<Operation>> {
    prop::collection::vec(arb_operation(Just("buy")), 1..40)
}

fn arb_quotes() -> impl Strategy<Value = QuoteMap> {
    prop::collection::hash_map(arb_ticker(), (1i64..50_000).prop_map(|c| Decimal::new(c, 2)), 0..4)
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Closed and oversold tickers never surface as positions.
    #[test]
    fn prop_positions_always_hold_quantity(ops in arb_operations(), quotes in arb_quotes()) {
        let positions = PositionBuilder::new().build_positions(&ops, &quotes).unwrap();
        for position in &positions {
            prop_assert!(position.quantity > Decimal::ZERO);
            prop_assert!(position.average_cost.is_some());
        }
        let mut tickers: Vec<&str> = positions.iter().map(|p| p.ticker.as_str()).collect();
        tickers.dedup();
        prop_assert_eq!(tickers.len(), positions.len());
    }

    /// With only buys, the basis and average cost follow directly from the inputs.
    #[test]
    fn prop_buy_only_average_cost(ops in arb_buys()) {
        let positions = PositionBuilder::new().build_positions(&ops, &QuoteMap::new()).unwrap();
        for position in &positions {
            let own: Vec<&Operation> = ops.iter().filter(|op| op.ticker == position.ticker).collect();
            let basis: Decimal = own
                .iter()
                .map(|op| op.quantity * op.unit_price + op.fees.total().unwrap())
                .sum();
            let quantity: Decimal = own.iter().map(|op| op.quantity).sum();
            prop_assert_eq!(position.total_cost_basis, basis);
            prop_assert_eq!(position.quantity, quantity);
            prop_assert_eq!(position.average_cost, average_cost(basis, quantity));
            prop_assert_eq!(position.buy_count as usize, own.len());
        }
    }

    /// Quoted positions report value minus basis; unquoted ones report nothing.
    #[test]
    fn prop_pnl_is_value_minus_basis(ops in arb_operations(), quotes in arb_quotes()) {
        let positions = PositionBuilder::new().build_positions(&ops, &quotes).unwrap();
        for position in &positions {
            match quotes.get(&position.ticker) {
                Some(price) => {
                    let value = position.quantity * *price;
                    prop_assert_eq!(position.current_value, Some(value));
                    prop_assert_eq!(
                        position.unrealized_pnl,
                        Some(unrealized_pnl(value, position.total_cost_basis).unwrap())
                    );
                }
                None => {
                    prop_assert!(position.current_value.is_none());
                    prop_assert!(position.unrealized_pnl.is_none());
                    prop_assert!(position.unrealized_return_pct.is_none());
                }
            }
        }
    }

    /// Input order never changes the result.
    #[test]
    fn prop_positions_ignore_input_order(ops in arb_operations(), quotes in arb_quotes()) {
        let builder = PositionBuilder::new();
        let forward = builder.build_positions(&ops, &quotes).unwrap();
        let mut reversed_ops = ops.clone();
        reversed_ops.reverse();
        let reversed = builder.build_positions(&reversed_ops, &quotes).unwrap();
        prop_assert_eq!(forward, reversed);
    }

    /// For buy-only histories the last month equals the rounded total basis.
    #[test]
    fn prop_history_ends_at_total_basis(ops in arb_buys()) {
        let positions = PositionBuilder::new().build_positions(&ops, &QuoteMap::new()).unwrap();
        let total_basis: Decimal = positions.iter().map(|p| p.total_cost_basis).sum();

        let points = TimeSeriesReconstructor::default()
            .reconstruct(&ops, PeriodFilter::AllTime, None, now())
            .unwrap();
        prop_assert_eq!(
            points.last().map(|p| p.cumulative_invested),
            Some(round_to_whole_units(total_basis))
        );
    }

    /// One point per month of the window, no gaps and no duplicates.
    #[test]
    fn prop_history_covers_every_month(ops in arb_operations()) {
        let points = TimeSeriesReconstructor::default()
            .reconstruct(&ops, PeriodFilter::AllTime, None, now())
            .unwrap();
        match ops.iter().map(|op| op.operation_date).min() {
            Some(earliest) => {
                let months = get_months_between(first_day_of_month(earliest), now());
                prop_assert_eq!(points.len(), months.len());
                for (point, (year, month)) in points.iter().zip(months) {
                    prop_assert_eq!((point.year, point.month), (year, month));
                }
            }
            None => prop_assert!(points.is_empty()),
        }
    }

    /// The trailing window is a suffix of the all-time series.
    #[test]
    fn prop_trailing_window_is_suffix_of_all_time(ops in arb_operations()) {
        let reconstructor = TimeSeriesReconstructor::default();
        let all_time = reconstructor
            .reconstruct(&ops, PeriodFilter::AllTime, None, now())
            .unwrap();
        let trailing = reconstructor
            .reconstruct(&ops, PeriodFilter::Trailing24Months, None, now())
            .unwrap();
        if !all_time.is_empty() && all_time.len() >= trailing.len() {
            let suffix = &all_time[all_time.len() - trailing.len()..];
            prop_assert_eq!(suffix, trailing.as_slice());
        }
    }

    /// Same inputs, same series.
    #[test]
    fn prop_history_is_idempotent(ops in arb_operations()) {
        let reconstructor = TimeSeriesReconstructor::default();
        let first = reconstructor.reconstruct(&ops, PeriodFilter::CurrentYear, None, now()).unwrap();
        let second = reconstructor.reconstruct(&ops, PeriodFilter::CurrentYear, None, now()).unwrap();
        prop_assert_eq!(first, second);
    }
}
