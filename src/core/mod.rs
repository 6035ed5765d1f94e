pub mod ledger_store;
pub mod services;

pub use ledger_store::LedgerStore;
