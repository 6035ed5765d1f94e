//! Persistent user preferences: where the ledger lives, how many backups to
//! keep, which currency label to print, and the default log filter.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::Config;
