//! Quotes module - latest known prices per ticker.

mod quotes_model;
mod quotes_traits;

pub use quotes_model::*;
pub use quotes_traits::*;
