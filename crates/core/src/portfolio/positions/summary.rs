use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::portfolio::metrics::{accumulate, unrealized_pnl, unrealized_return_pct};
use crate::portfolio::positions::Position;

/// Portfolio-wide rollup of open positions.
///
/// Valuation figures are computed over the quoted positions only, using the
/// same helpers as the per-position fields, so the blended return is always
/// derivable from the rows it summarizes.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub position_count: usize,
    /// Sum of `total_cost_basis` over every open position.
    pub total_cost_basis: Decimal,
    /// Sum of `total_cost_basis` over positions that carry a quote.
    pub quoted_cost_basis: Decimal,
    pub current_value: Option<Decimal>,
    pub unrealized_pnl: Option<Decimal>,
    pub unrealized_return_pct: Option<Decimal>,
    pub unquoted_tickers: Vec<String>,
}

/// Sums positions first, then derives the blended figures.
pub fn summarize_positions(positions: &[Position]) -> Result<PortfolioSummary> {
    let mut total_cost_basis = Decimal::ZERO;
    let mut quoted_cost_basis = Decimal::ZERO;
    let mut current_value: Option<Decimal> = None;
    let mut unquoted_tickers = Vec::new();

    for position in positions {
        total_cost_basis = accumulate(total_cost_basis, position.total_cost_basis)?;
        match position.current_value {
            Some(value) => {
                quoted_cost_basis = accumulate(quoted_cost_basis, position.total_cost_basis)?;
                current_value = Some(accumulate(current_value.unwrap_or(Decimal::ZERO), value)?);
            }
            None => unquoted_tickers.push(position.ticker.clone()),
        }
    }

    let pnl = current_value
        .map(|value| unrealized_pnl(value, quoted_cost_basis))
        .transpose()?;
    let return_pct = current_value.and_then(|value| unrealized_return_pct(value, quoted_cost_basis));

    Ok(PortfolioSummary {
        position_count: positions.len(),
        total_cost_basis,
        quoted_cost_basis,
        current_value,
        unrealized_pnl: pnl,
        unrealized_return_pct: return_pct,
        unquoted_tickers,
    })
}
