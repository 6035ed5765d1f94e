use std::{
    cmp::Reverse,
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::{debug, warn};

use crate::{domain::ledger::Ledger, errors::StorageError, utils::fs::write_atomic};

use super::{Result, StorageBackend};

const BACKUP_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S%3f";
const DEFAULT_RETENTION: usize = 5;

/// Stores the ledger as one pretty-printed JSON document.
///
/// Before an existing file is overwritten it is copied into a sibling
/// `backups/` directory; only the newest `retention` copies are kept.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    path: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_retention(path, DEFAULT_RETENTION)
    }

    pub fn with_retention(path: impl Into<PathBuf>, retention: usize) -> Self {
        let path = path.into();
        let backups_dir = path
            .parent()
            .map(|parent| parent.join("backups"))
            .unwrap_or_else(|| PathBuf::from("backups"));
        Self {
            path,
            backups_dir,
            retention,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backups_dir(&self) -> &Path {
        &self.backups_dir
    }

    /// Backup file names, newest first.
    pub fn list_backups(&self) -> Result<Vec<String>> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.backups_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_EXTENSION) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                entries.push(name.to_string());
            }
        }
        entries.sort_by_key(|name| Reverse((parse_backup_timestamp(name), name.clone())));
        Ok(entries)
    }

    fn backup_existing_file(&self) -> Result<()> {
        if self.retention == 0 || !self.path.exists() {
            return Ok(());
        }
        fs::create_dir_all(&self.backups_dir)?;
        let stem = self
            .path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("ledger");
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT);
        let mut backup_path = self
            .backups_dir
            .join(format!("{stem}_{timestamp}.{BACKUP_EXTENSION}"));
        let mut counter = 1;
        while backup_path.exists() {
            backup_path = self
                .backups_dir
                .join(format!("{stem}_{timestamp}_{counter}.{BACKUP_EXTENSION}"));
            counter += 1;
        }
        fs::copy(&self.path, &backup_path)?;
        self.prune_backups()
    }

    fn prune_backups(&self) -> Result<()> {
        for name in self.list_backups()?.into_iter().skip(self.retention) {
            if let Err(err) = fs::remove_file(self.backups_dir.join(&name)) {
                warn!(backup = %name, error = %err, "failed to prune ledger backup");
            }
        }
        Ok(())
    }
}

impl StorageBackend for JsonStorage {
    fn load(&self) -> Result<Ledger> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no ledger file yet, starting empty");
            return Ok(Ledger::default());
        }
        load_ledger_from_path(&self.path)
    }

    fn save(&self, ledger: &Ledger) -> Result<()> {
        self.backup_existing_file()?;
        save_ledger_to_path(ledger, &self.path)
    }
}

/// Writes the ledger through a temporary sibling file and renames it into
/// place, so the target is either the old or the new document.
pub fn save_ledger_to_path(ledger: &Ledger, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(ledger)?;
    write_atomic(path, &json)?;
    Ok(())
}

pub fn load_ledger_from_path(path: &Path) -> Result<Ledger> {
    let data = fs::read_to_string(path)?;
    let ledger: Ledger = serde_json::from_str(&data).map_err(StorageError::from)?;
    Ok(ledger)
}

/// Extracts the `YYYYmmdd_HHMMSSmmm` stamp from names like `expenses_20240310_120000250.json`.
fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let trimmed = name.strip_suffix(&format!(".{BACKUP_EXTENSION}"))?;
    let segments: Vec<&str> = trimmed.split('_').collect();
    segments.windows(2).rev().find_map(|pair| {
        let (date_part, time_part) = (pair[0], pair[1]);
        if !is_digits(date_part, 8) || !is_digits(time_part, 9) {
            return None;
        }
        NaiveDateTime::parse_from_str(&format!("{date_part}{time_part}"), "%Y%m%d%H%M%S%3f")
            .ok()
            .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
    })
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}
