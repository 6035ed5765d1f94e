use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc, Mutex,
};

use crate::{domain::ledger::Ledger, errors::StorageError};

use super::{Result, StorageBackend};

/// Keeps the last saved snapshot in memory. Clones share state, so a test
/// can hand one clone to a store and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    snapshot: Mutex<Option<Ledger>>,
    saves: AtomicUsize,
    fail_saves: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ledger(ledger: Ledger) -> Self {
        let storage = Self::default();
        storage.replace(Some(ledger));
        storage
    }

    /// Last saved snapshot, if any.
    pub fn snapshot(&self) -> Option<Ledger> {
        self.lock().clone()
    }

    pub fn save_count(&self) -> usize {
        self.inner.saves.load(Ordering::SeqCst)
    }

    /// Makes every following save fail with an I/O error.
    pub fn fail_saves(&self, fail: bool) {
        self.inner.fail_saves.store(fail, Ordering::SeqCst);
    }

    fn replace(&self, ledger: Option<Ledger>) {
        *self.lock() = ledger;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Ledger>> {
        self.inner
            .snapshot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl StorageBackend for MemoryStorage {
    fn load(&self) -> Result<Ledger> {
        Ok(self.snapshot().unwrap_or_default())
    }

    fn save(&self, ledger: &Ledger) -> Result<()> {
        if self.inner.fail_saves.load(Ordering::SeqCst) {
            return Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "memory storage configured to fail",
            )));
        }
        self.replace(Some(ledger.clone()));
        self.inner.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
