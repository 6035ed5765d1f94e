use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_LEDGER_FILE: &str = "expenses.json";
const APP_DIR: &str = "expense_ledger";

/// Stores user-configurable preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom ledger file. Defaults to `<data dir>/expense_ledger/expenses.json`.
    pub ledger_file: Option<PathBuf>,

    #[serde(default = "Config::default_backup_retention")]
    pub backup_retention: usize,

    #[serde(default = "Config::default_currency")]
    pub currency: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ledger_file: None,
            backup_retention: Self::default_backup_retention(),
            currency: Self::default_currency(),
            log_filter: None,
        }
    }
}

impl Config {
    pub fn default_backup_retention() -> usize {
        5
    }

    pub fn default_currency() -> String {
        "VND".into()
    }

    pub fn resolve_ledger_file(&self) -> PathBuf {
        if let Some(path) = &self.ledger_file {
            return path.clone();
        }

        let base = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        base.join(APP_DIR).join(DEFAULT_LEDGER_FILE)
    }

    /// Directory holding `config.json` unless overridden by the caller.
    pub fn default_config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR))
    }
}
