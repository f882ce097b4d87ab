//! Carteira Core - investment ledger engine.
//!
//! Turns an unordered list of buy/sell operations into per-security positions
//! (weighted-average cost, mark-to-market P&L) and into a monthly history of
//! cumulative invested capital. Everything here is pure computation; storage
//! and quote retrieval are reached through the traits in [`operations`] and
//! [`quotes`].

pub mod constants;
pub mod errors;
pub mod operations;
pub mod portfolio;
pub mod quotes;
pub mod settings;
pub mod utils;

// Re-export common types from the domain modules
pub use operations::*;
pub use portfolio::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
