use std::fmt;

use thiserror::Error;
use uuid::Uuid;

/// Which transaction collection an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Income,
    Expense,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntryKind::Income => "income",
            EntryKind::Expense => "expense",
        };
        f.write_str(label)
    }
}

/// Error type that captures common ledger failures.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Invalid {kind} index {index} (ledger holds {len} entries)")]
    InvalidIndex {
        kind: EntryKind,
        index: usize,
        len: usize,
    },
    #[error("No {kind} entry with id {id}")]
    EntryNotFound { kind: EntryKind, id: Uuid },
    #[error("Category `{0}` does not exist")]
    CategoryNotFound(String),
    #[error("Category `{0}` already exists")]
    DuplicateCategory(String),
    #[error("Expense references unknown category `{0}`")]
    UnknownCategoryReference(String),
    #[error("Invalid period selection: {0}")]
    InvalidPeriodSelection(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(f64),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Failures raised while loading or saving a ledger snapshot.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl LedgerError {
    pub fn is_storage(&self) -> bool {
        matches!(self, LedgerError::Storage(_))
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
