//! Ledger module - service facade combining the repository, quotes and views.

mod ledger_service;
mod ledger_traits;

pub use ledger_service::LedgerService;
pub use ledger_traits::LedgerServiceTrait;
