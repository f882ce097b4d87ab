//! Valuation helpers shared by every ledger view.

mod valuation_metrics;

pub use valuation_metrics::*;
