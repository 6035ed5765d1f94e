use std::io;

use chrono::NaiveDate;
use thiserror::Error;

use crate::cli::output;
use crate::config::{Config, ConfigError, ConfigManager};
use crate::core::LedgerStore;
use crate::errors::LedgerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

/// Failures that end the shell.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("Line editor error: {0}")]
    Editor(#[from] rustyline::error::ReadlineError),
}

/// Failures of a single command; the shell reports them and keeps going.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("Unknown command `{0}`. Type `help` for the list of commands.")]
    UnknownCommand(String),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub(crate) type CommandResult = Result<LoopControl, CommandError>;

/// State shared by every command of one shell session.
pub struct ShellContext {
    pub mode: CliMode,
    pub store: LedgerStore,
    pub config: Config,
    pub config_manager: Option<ConfigManager>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode, store: LedgerStore, config: Config) -> Self {
        Self {
            mode,
            store,
            config,
            config_manager: None,
            running: true,
        }
    }

    /// Lets `config set` write changes back through `manager`.
    pub fn with_config_manager(mut self, manager: ConfigManager) -> Self {
        self.config_manager = Some(manager);
        self
    }

    pub fn prompt(&self) -> String {
        "expense-ledger> ".to_string()
    }

    pub fn amount(&self, amount: f64) -> String {
        output::format_amount(amount, &self.config.currency)
    }

    /// Prints a command failure. Storage failures are not recoverable from
    /// inside a script, so they end script mode.
    pub fn report_error(&mut self, err: CommandError) -> Result<(), CliError> {
        output::error(&err);
        match err {
            CommandError::Ledger(err) if err.is_storage() && self.mode == CliMode::Script => {
                Err(CliError::Ledger(err))
            }
            _ => Ok(()),
        }
    }
}

pub(crate) fn parse_date(input: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| {
        CommandError::InvalidArguments(format!("invalid date `{input}` (use YYYY-MM-DD)"))
    })
}

pub(crate) fn parse_amount(input: &str) -> Result<f64, CommandError> {
    let cleaned: String = input.chars().filter(|c| *c != ',' && *c != '_').collect();
    cleaned
        .parse::<f64>()
        .map_err(|_| CommandError::InvalidArguments(format!("invalid amount `{input}`")))
}

/// Turns a 1-based position typed by the user into a ledger index.
pub(crate) fn parse_position(input: &str) -> Result<usize, CommandError> {
    match input.parse::<usize>() {
        Ok(position) if position >= 1 => Ok(position - 1),
        _ => Err(CommandError::InvalidArguments(format!(
            "invalid position `{input}` (positions start at 1)"
        ))),
    }
}
