//! Operations module - buy/sell records, validation and bulk import.

mod operations_constants;
mod operations_model;
mod operations_traits;

pub mod csv_import;

pub use csv_import::{parse_operations_csv, ImportConfig, ImportResult, ImportRowError};
pub use operations_constants::*;
pub use operations_model::*;
pub use operations_traits::*;

#[cfg(test)]
mod operations_model_tests;
