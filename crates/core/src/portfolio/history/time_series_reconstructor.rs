use chrono::NaiveDate;
use log::{debug, warn};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::constants::DEFAULT_MONTH_LABEL_FORMAT;
use crate::errors::Result;
use crate::operations::{AssetType, Operation, OperationKind};
use crate::portfolio::history::{MonthlyBalancePoint, PeriodFilter};
use crate::portfolio::metrics::{accumulate, round_to_whole_units, signed_operation_cost};
use crate::utils::time_utils::{format_month_label, get_months_between};

/// Replays an operation history into end-of-month invested-capital balances.
///
/// Two phases: everything dated before the window collapses into an opening
/// balance, then each month of the window folds its own operations on top.
/// "Now" is always passed in; nothing here reads the clock.
#[derive(Debug, Clone)]
pub struct TimeSeriesReconstructor {
    month_label_format: String,
}

impl Default for TimeSeriesReconstructor {
    fn default() -> Self {
        Self::new(DEFAULT_MONTH_LABEL_FORMAT)
    }
}

impl TimeSeriesReconstructor {
    pub fn new(month_label_format: impl Into<String>) -> Self {
        Self {
            month_label_format: month_label_format.into(),
        }
    }

    /// One point per calendar month from the window start through the month
    /// of `now`, including months without activity.
    ///
    /// Returns an empty series when no operation dated up to `now` survives
    /// the asset filter. Fails, like the position view, on any operation with
    /// an unknown kind, a blank ticker or amounts that overflow.
    pub fn reconstruct(
        &self,
        operations: &[Operation],
        period: PeriodFilter,
        asset_type: Option<AssetType>,
        now: NaiveDate,
    ) -> Result<Vec<MonthlyBalancePoint>> {
        // Every operation is checked, including ones the filters drop, so
        // this view fails on exactly the inputs the position view fails on.
        let mut filtered: Vec<(OperationKind, &Operation)> = Vec::new();
        for operation in operations {
            operation.require_ticker()?;
            let kind = operation.kind()?;
            let wanted = match asset_type {
                Some(wanted) => operation.asset_type == wanted,
                None => true,
            };
            if wanted && operation.operation_date <= now {
                filtered.push((kind, operation));
            }
        }
        if filtered.is_empty() {
            debug!(
                "No operations for asset filter {:?}. Returning empty history.",
                asset_type
            );
            return Ok(Vec::new());
        }

        let earliest = filtered.iter().map(|(_, op)| op.operation_date).min();
        let window_start = period.window_start(now, earliest)?;
        debug!(
            "Reconstructing {} history from {} to {} over {} operations",
            period,
            window_start,
            now,
            filtered.len()
        );

        // Phase 1: opening balance and month buckets, in full precision.
        let mut initial_balance = Decimal::ZERO;
        let mut monthly_deltas: BTreeMap<(i32, u32), Decimal> = BTreeMap::new();
        for (kind, operation) in filtered {
            if !operation.has_positive_amounts() {
                warn!(
                    "Skipping operation {} with non-positive quantity {} or unit price {}",
                    operation.context(),
                    operation.quantity,
                    operation.unit_price
                );
                continue;
            }
            let delta = signed_operation_cost(
                kind,
                operation.quantity,
                operation.unit_price,
                operation.fee_total()?,
            )?;
            if operation.operation_date < window_start {
                initial_balance = accumulate(initial_balance, delta)?;
            } else {
                let bucket = monthly_deltas
                    .entry(operation.year_month())
                    .or_insert(Decimal::ZERO);
                *bucket = accumulate(*bucket, delta)?;
            }
        }

        // Phase 2: walk every month of the window once.
        let months = get_months_between(window_start, now);
        let mut running_balance = initial_balance;
        let mut points = Vec::with_capacity(months.len());
        for (year, month) in months {
            if let Some(delta) = monthly_deltas.get(&(year, month)) {
                running_balance = accumulate(running_balance, *delta)?;
            }
            points.push(MonthlyBalancePoint {
                month_label: format_month_label(year, month, &self.month_label_format)?,
                year,
                month,
                cumulative_invested: round_to_whole_units(running_balance),
            });
        }
        Ok(points)
    }
}
