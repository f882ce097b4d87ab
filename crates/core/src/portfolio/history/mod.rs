//! History module - monthly invested-capital series.

mod history_model;
pub mod time_series_reconstructor;

pub use history_model::*;
pub use time_series_reconstructor::*;
