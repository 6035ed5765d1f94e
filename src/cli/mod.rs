//! Line-oriented command shell over the ledger store.

mod commands;
pub mod context;
pub mod output;
mod shell;

pub use context::{CliError, CliMode, CommandError, ShellContext};
pub use shell::{run_cli, run_script, CONFIG_DIR_ENV, LEDGER_FILE_ENV, SCRIPT_ENV};
