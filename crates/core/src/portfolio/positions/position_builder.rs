use log::{debug, warn};
use std::collections::BTreeMap;

use crate::errors::Result;
use crate::operations::Operation;
use crate::portfolio::positions::{Position, PositionAccumulator};
use crate::quotes::QuoteMap;

/// Folds an operation history into one [`Position`] per open ticker.
///
/// Stateless: every call rebuilds the positions from scratch, and the input
/// slice is never mutated, so concurrent calls over the same history are fine.
#[derive(Debug, Clone, Copy, Default)]
pub struct PositionBuilder;

impl PositionBuilder {
    pub fn new() -> Self {
        PositionBuilder
    }

    /// Builds the current positions and values them with `quotes`.
    ///
    /// Returns positions sorted by ticker. Closed tickers (quantity <= 0)
    /// are omitted. Fails if any operation has an unknown kind or no ticker.
    pub fn build_positions(
        &self,
        operations: &[Operation],
        quotes: &QuoteMap,
    ) -> Result<Vec<Position>> {
        let mut positions = self.aggregate(operations)?;
        self.apply_quotes(&mut positions, quotes)?;
        Ok(positions)
    }

    /// Cost-side aggregation only; valuation fields stay empty.
    pub fn aggregate(&self, operations: &[Operation]) -> Result<Vec<Position>> {
        debug!("Aggregating {} operations into positions", operations.len());

        // Chronological fold so the "first" operation of a ticker is its
        // earliest one regardless of input order. The sort is stable.
        let mut ordered: Vec<&Operation> = operations.iter().collect();
        ordered.sort_by_key(|op| op.operation_date);

        let mut accumulators: BTreeMap<String, PositionAccumulator> = BTreeMap::new();
        for operation in ordered {
            operation.require_ticker()?;
            let kind = operation.kind()?;
            if !operation.has_positive_amounts() {
                warn!(
                    "Skipping operation {} with non-positive quantity {} or unit price {}",
                    operation.context(),
                    operation.quantity,
                    operation.unit_price
                );
                continue;
            }

            accumulators
                .entry(operation.ticker.clone())
                .or_insert_with(|| PositionAccumulator::new(operation))
                .apply(kind, operation)?;
        }

        let positions: Vec<Position> = accumulators
            .into_values()
            .filter_map(PositionAccumulator::into_position)
            .collect();
        debug!("Built {} open positions", positions.len());
        Ok(positions)
    }

    /// Values each position with its quote; positions without one are left
    /// (or made) unvalued.
    pub fn apply_quotes(&self, positions: &mut [Position], quotes: &QuoteMap) -> Result<()> {
        for position in positions.iter_mut() {
            match quotes.get(&position.ticker) {
                Some(price) => position.apply_quote(*price)?,
                None => {
                    debug!("No quote for {}. Valuation fields left empty.", position.ticker);
                    position.clear_quote();
                }
            }
        }
        Ok(())
    }
}
