#![doc(test(attr(deny(warnings))))]

//! Expense Ledger keeps a personal ledger of income, categorized expenses and
//! expense categories, persists it as JSON after every change, and aggregates
//! it into day, month and year totals for line and category charts.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod storage;
pub mod utils;

pub use crate::core::{
    services::{CategoryDistribution, ExpenseRow, IncomeRow, LineSeries, Totals},
    LedgerStore,
};
pub use domain::{BucketKey, Category, ExpenseEntry, Granularity, IncomeEntry, Ledger, PeriodFilter, Summary};
pub use errors::{LedgerError, Result, StorageError};
pub use storage::{JsonStorage, MemoryStorage, StorageBackend};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    init_with_filter(None);
}

/// Same as [`init`], with a directive such as `expense_ledger=debug`
/// replacing the default one.
pub fn init_with_filter(filter: Option<&str>) {
    INIT_TRACING.call_once(|| {
        utils::init_tracing(filter);
        tracing::info!("Expense ledger tracing initialized.");
    });
}
