use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::operations::{AssetType, Operation, OperationKind};
use crate::portfolio::metrics::{
    accumulate, average_cost, market_value, signed_operation_cost, unrealized_pnl,
    unrealized_return_pct,
};

/// Aggregate holding of one security, rebuilt from its full history on
/// every call.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub ticker: String,
    pub asset_type: AssetType,
    pub display_name: String,
    pub quantity: Decimal,
    /// Invested amount under the ledger's buy/sell rule (see [`PositionAccumulator::apply`]).
    pub total_cost_basis: Decimal,
    pub average_cost: Option<Decimal>,
    pub buy_count: u32,
    pub sell_count: u32,
    pub current_quote: Option<Decimal>,
    pub current_value: Option<Decimal>,
    pub unrealized_pnl: Option<Decimal>,
    pub unrealized_return_pct: Option<Decimal>,
}

impl Position {
    /// Attaches (or replaces) live valuation from a quote. On overflow the
    /// position is left untouched.
    pub fn apply_quote(&mut self, price: Decimal) -> Result<()> {
        let current_value = market_value(self.quantity, price)?;
        let pnl = unrealized_pnl(current_value, self.total_cost_basis)?;
        self.current_quote = Some(price);
        self.current_value = Some(current_value);
        self.unrealized_pnl = Some(pnl);
        self.unrealized_return_pct = unrealized_return_pct(current_value, self.total_cost_basis);
        Ok(())
    }

    /// Removes live valuation, e.g. when the quote snapshot no longer has the ticker.
    pub fn clear_quote(&mut self) {
        self.current_quote = None;
        self.current_value = None;
        self.unrealized_pnl = None;
        self.unrealized_return_pct = None;
    }

    pub fn is_quoted(&self) -> bool {
        self.current_quote.is_some()
    }
}

/// Running totals for one ticker while operations are folded.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionAccumulator {
    pub ticker: String,
    pub asset_type: AssetType,
    pub display_name: Option<String>,
    pub quantity: Decimal,
    pub total_cost_basis: Decimal,
    pub buy_count: u32,
    pub sell_count: u32,
}

impl PositionAccumulator {
    /// Starts an accumulator carrying the descriptive fields of `first`.
    pub fn new(first: &Operation) -> Self {
        PositionAccumulator {
            ticker: first.ticker.clone(),
            asset_type: first.asset_type,
            display_name: first.display_name.clone(),
            quantity: Decimal::ZERO,
            total_cost_basis: Decimal::ZERO,
            buy_count: 0,
            sell_count: 0,
        }
    }

    /// Folds one operation into the totals.
    ///
    /// Buy: quantity up, basis up by line cost plus fees.
    /// Sell: quantity down, basis down by line cost minus fees (net proceeds).
    ///
    /// Fails on arithmetic overflow, leaving the totals unchanged.
    pub fn apply(&mut self, kind: OperationKind, operation: &Operation) -> Result<()> {
        let delta = signed_operation_cost(
            kind,
            operation.quantity,
            operation.unit_price,
            operation.fee_total()?,
        )?;
        let total_cost_basis = accumulate(self.total_cost_basis, delta)?;
        let quantity = match kind {
            OperationKind::Buy => accumulate(self.quantity, operation.quantity)?,
            OperationKind::Sell => accumulate(self.quantity, -operation.quantity)?,
        };
        self.total_cost_basis = total_cost_basis;
        self.quantity = quantity;
        match kind {
            OperationKind::Buy => self.buy_count += 1,
            OperationKind::Sell => self.sell_count += 1,
        }
        if self.display_name.is_none() && operation.display_name.is_some() {
            self.display_name = operation.display_name.clone();
        }
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.quantity > Decimal::ZERO
    }

    /// Final position, or `None` if the ticker is closed.
    pub fn into_position(self) -> Option<Position> {
        if !self.is_open() {
            debug!(
                "Dropping closed position {} (quantity {}, basis {})",
                self.ticker, self.quantity, self.total_cost_basis
            );
            return None;
        }
        let average_cost = average_cost(self.total_cost_basis, self.quantity);
        let display_name = self.display_name.unwrap_or_else(|| self.ticker.clone());
        Some(Position {
            ticker: self.ticker,
            asset_type: self.asset_type,
            display_name,
            quantity: self.quantity,
            total_cost_basis: self.total_cost_basis,
            average_cost,
            buy_count: self.buy_count,
            sell_count: self.sell_count,
            current_quote: None,
            current_value: None,
            unrealized_pnl: None,
            unrealized_return_pct: None,
        })
    }
}
