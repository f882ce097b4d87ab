use rust_decimal::prelude::*;
use rust_decimal_macros::dec;

use crate::constants::HISTORY_DECIMAL_PRECISION;
use crate::errors::{CalculatorError, Result};
use crate::operations::OperationKind;

fn amount_overflow(what: &str) -> CalculatorError {
    CalculatorError::InvalidOperation(format!("amount overflow in {}", what))
}

/// Cost basis per unit held. `None` when nothing is held.
pub fn average_cost(total_cost_basis: Decimal, quantity: Decimal) -> Option<Decimal> {
    if quantity <= Decimal::ZERO {
        return None;
    }
    total_cost_basis.checked_div(quantity)
}

/// `quantity * price`, failing instead of overflowing.
pub fn market_value(quantity: Decimal, price: Decimal) -> Result<Decimal> {
    quantity
        .checked_mul(price)
        .ok_or_else(|| amount_overflow("quantity * price").into())
}

/// Adds `delta` to a running total, failing instead of overflowing.
pub fn accumulate(total: Decimal, delta: Decimal) -> Result<Decimal> {
    total
        .checked_add(delta)
        .ok_or_else(|| amount_overflow("running total").into())
}

/// Mark-to-market gain or loss.
pub fn unrealized_pnl(current_value: Decimal, total_cost_basis: Decimal) -> Result<Decimal> {
    current_value
        .checked_sub(total_cost_basis)
        .ok_or_else(|| amount_overflow("unrealized pnl").into())
}

/// Gain or loss as a percentage of the cost basis.
///
/// `None` when the basis is zero or negative: there is no meaningful return
/// on nothing invested, and a negative basis would flip the sign.
pub fn unrealized_return_pct(current_value: Decimal, total_cost_basis: Decimal) -> Option<Decimal> {
    if total_cost_basis <= Decimal::ZERO {
        return None;
    }
    current_value
        .checked_sub(total_cost_basis)
        .and_then(|pnl| pnl.checked_div(total_cost_basis))
        .and_then(|ratio| ratio.checked_mul(dec!(100)))
}

/// Effect of one operation on the invested amount.
///
/// Buy adds `quantity * unit_price + fees`. Sell removes the net proceeds,
/// `quantity * unit_price - fees`, not the proportional average cost.
pub fn signed_operation_cost(
    kind: OperationKind,
    quantity: Decimal,
    unit_price: Decimal,
    fees: Decimal,
) -> Result<Decimal> {
    let line_cost = market_value(quantity, unit_price)?;
    let signed = match kind {
        OperationKind::Buy => line_cost.checked_add(fees),
        OperationKind::Sell => line_cost.checked_sub(fees).map(|net| -net),
    };
    signed.ok_or_else(|| amount_overflow("operation cost").into())
}

/// Rounds a running balance to whole currency units, halves away from zero.
pub fn round_to_whole_units(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(
        HISTORY_DECIMAL_PRECISION,
        RoundingStrategy::MidpointAwayFromZero,
    )
}
