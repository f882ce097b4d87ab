//! Positions module - per-security aggregation and the portfolio rollup.

pub mod position_builder;
mod positions_model;
mod summary;

pub use position_builder::*;
pub use positions_model::*;
pub use summary::*;
