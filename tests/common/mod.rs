#![allow(dead_code)]

use std::path::PathBuf;

use chrono::NaiveDate;
use expense_ledger::{ExpenseEntry, IncomeEntry, JsonStorage, LedgerStore};
use tempfile::TempDir;

/// Opens a store backed by `expenses.json` inside a fresh temp directory.
/// Keep the returned guard alive for the duration of the test.
pub fn temp_store() -> (LedgerStore, PathBuf, TempDir) {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().join("expenses.json");
    let store = LedgerStore::open(Box::new(JsonStorage::new(&path))).expect("open store");
    (store, path, temp)
}

pub fn reopen(path: &PathBuf) -> LedgerStore {
    LedgerStore::open(Box::new(JsonStorage::new(path))).expect("reopen store")
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn expense(amount: f64, description: &str, category: &str, on: NaiveDate) -> ExpenseEntry {
    ExpenseEntry::new(amount, description, category, on).expect("valid expense")
}

pub fn income(amount: f64, description: &str, on: NaiveDate) -> IncomeEntry {
    IncomeEntry::new(amount, description, on).expect("valid income")
}

/// Food and Transport categories with a handful of March and April entries.
pub fn seeded_store() -> (LedgerStore, PathBuf, TempDir) {
    let (mut store, path, guard) = temp_store();
    store.add_category("Food", "meals").unwrap();
    store.add_category("Transport", "").unwrap();
    store.add_expense(expense(50000.0, "lunch", "Food", date(2024, 3, 10))).unwrap();
    store.add_expense(expense(20000.0, "bus", "Transport", date(2024, 3, 10))).unwrap();
    store.add_expense(expense(30000.0, "dinner", "Food", date(2024, 3, 21))).unwrap();
    store.add_expense(expense(15000.0, "taxi", "Transport", date(2024, 4, 2))).unwrap();
    store.add_income(income(2000000.0, "salary", date(2024, 3, 1))).unwrap();
    store.add_income(income(500000.0, "bonus", date(2024, 4, 15))).unwrap();
    (store, path, guard)
}
