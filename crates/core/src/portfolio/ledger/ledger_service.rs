use chrono::NaiveDate;
use log::debug;
use std::sync::Arc;

use crate::errors::Result;
use crate::operations::{AssetType, OperationRepositoryTrait};
use crate::portfolio::history::{MonthlyBalancePoint, PeriodFilter, TimeSeriesReconstructor};
use crate::portfolio::ledger::LedgerServiceTrait;
use crate::portfolio::positions::{summarize_positions, PortfolioSummary, Position, PositionBuilder};
use crate::quotes::QuoteProviderTrait;
use crate::settings::LedgerSettings;

/// Loads the operation history and quotes on every call and hands them to the
/// pure ledger components. Holds no cached state.
#[derive(Clone)]
pub struct LedgerService {
    operation_repository: Arc<dyn OperationRepositoryTrait>,
    quote_provider: Arc<dyn QuoteProviderTrait>,
    settings: LedgerSettings,
    position_builder: PositionBuilder,
    reconstructor: TimeSeriesReconstructor,
}

impl LedgerService {
    pub fn new(
        operation_repository: Arc<dyn OperationRepositoryTrait>,
        quote_provider: Arc<dyn QuoteProviderTrait>,
        settings: LedgerSettings,
    ) -> Result<Self> {
        settings.validate()?;
        let reconstructor = TimeSeriesReconstructor::new(settings.month_label_format.clone());
        Ok(Self {
            operation_repository,
            quote_provider,
            settings,
            position_builder: PositionBuilder::new(),
            reconstructor,
        })
    }

    pub fn settings(&self) -> &LedgerSettings {
        &self.settings
    }
}

impl LedgerServiceTrait for LedgerService {
    fn get_positions(&self) -> Result<Vec<Position>> {
        let operations = self.operation_repository.list_operations()?;
        let mut positions = self.position_builder.aggregate(&operations)?;
        if positions.is_empty() {
            return Ok(positions);
        }

        let tickers: Vec<String> = positions.iter().map(|p| p.ticker.clone()).collect();
        let quotes = self.quote_provider.latest_quotes(&tickers)?;
        debug!(
            "Valuing {} positions with {} quotes",
            positions.len(),
            quotes.len()
        );
        self.position_builder.apply_quotes(&mut positions, &quotes)?;
        Ok(positions)
    }

    fn get_portfolio_summary(&self) -> Result<PortfolioSummary> {
        let positions = self.get_positions()?;
        summarize_positions(&positions)
    }

    fn get_invested_history(
        &self,
        period: Option<PeriodFilter>,
        asset_type: Option<AssetType>,
        now: NaiveDate,
    ) -> Result<Vec<MonthlyBalancePoint>> {
        let operations = self.operation_repository.list_operations()?;
        let period = period.unwrap_or(self.settings.default_period);
        self.reconstructor
            .reconstruct(&operations, period, asset_type, now)
    }
}
