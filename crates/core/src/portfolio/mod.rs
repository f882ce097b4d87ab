//! Portfolio views derived from the operation history.

pub mod history;
pub mod ledger;
pub mod metrics;
pub mod positions;

pub use history::*;
pub use ledger::*;
pub use metrics::*;
pub use positions::*;
