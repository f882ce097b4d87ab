use chrono::NaiveDate;

use crate::errors::Result;
use crate::operations::AssetType;
use crate::portfolio::history::{MonthlyBalancePoint, PeriodFilter};
use crate::portfolio::positions::{PortfolioSummary, Position};

/// Read-only ledger views for one user's portfolio.
pub trait LedgerServiceTrait: Send + Sync {
    /// Open positions valued with the latest quotes.
    fn get_positions(&self) -> Result<Vec<Position>>;

    fn get_portfolio_summary(&self) -> Result<PortfolioSummary>;

    /// Invested-capital history. `period` falls back to the configured default.
    fn get_invested_history(
        &self,
        period: Option<PeriodFilter>,
        asset_type: Option<AssetType>,
        now: NaiveDate,
    ) -> Result<Vec<MonthlyBalancePoint>>;
}
