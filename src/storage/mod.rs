pub mod json_backend;
pub mod memory;

use crate::{domain::ledger::Ledger, errors::StorageError};

pub type Result<T> = std::result::Result<T, StorageError>;

/// Persistence boundary for the ledger: one load, one full-snapshot save.
///
/// Both calls are all-or-nothing. A backend with no prior state loads an
/// empty ledger.
pub trait StorageBackend: Send + Sync {
    fn load(&self) -> Result<Ledger>;
    fn save(&self, ledger: &Ledger) -> Result<()>;
}

pub use json_backend::JsonStorage;
pub use memory::MemoryStorage;
