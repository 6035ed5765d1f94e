mod common;

use std::fs;
use std::path::{Path, PathBuf};

use common::{date, expense, reopen, seeded_store, temp_store};
use expense_ledger::{
    storage::json_backend::{load_ledger_from_path, save_ledger_to_path},
    JsonStorage, LedgerError, LedgerStore, StorageBackend, StorageError,
};
use tempfile::tempdir;

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.tmp", existing),
        None => String::from("tmp"),
    };
    tmp.set_extension(ext);
    tmp
}

#[test]
fn file_uses_normative_field_names() {
    let (_store, path, _guard) = seeded_store();
    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();

    assert_eq!(json["income"].as_array().unwrap().len(), 2);
    assert_eq!(json["expenses"].as_array().unwrap().len(), 4);
    assert_eq!(json["categories"][0]["name"], "Food");
    assert_eq!(json["categories"][0]["description"], "meals");
    let lunch = &json["expenses"][0];
    assert_eq!(lunch["amount"], 50000.0);
    assert_eq!(lunch["description"], "lunch");
    assert_eq!(lunch["category"], "Food");
    assert_eq!(lunch["date"], "2024-03-10");
}

#[test]
fn legacy_file_without_ids_loads() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("expenses.json");
    fs::write(
        &path,
        r#"{
            "income": [{"amount": 2000000, "description": "salary", "date": "2024-03-01"}],
            "expenses": [{"amount": 50000, "description": "lunch", "category": "Food", "date": "2024-03-10"}],
            "categories": [{"name": "Food", "description": ""}]
        }"#,
    )
    .unwrap();

    let mut store = reopen(&path);
    assert_eq!(store.income()[0].amount, 2000000.0);
    assert_eq!(store.expenses()[0].category, "Food");

    store.delete_expense(0).unwrap();
    let reloaded = load_ledger_from_path(&path).unwrap();
    assert!(reloaded.expenses.is_empty());
    assert_eq!(reloaded.income[0].id, store.income()[0].id);
}

#[test]
fn legacy_ids_are_stable_across_reopens() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("expenses.json");
    fs::write(
        &path,
        r#"{
            "income": [
                {"amount": 10, "description": "first", "date": "2024-03-01"},
                {"amount": 20, "description": "second", "date": "2024-03-02"}
            ],
            "expenses": [],
            "categories": []
        }"#,
    )
    .unwrap();

    let first_ids: Vec<_> = reopen(&path).income().iter().map(|entry| entry.id).collect();
    assert!(first_ids.iter().all(|id| !id.is_nil()));
    let on_disk = load_ledger_from_path(&path).unwrap();
    assert_eq!(on_disk.income[0].id, first_ids[0]);

    let mut store = reopen(&path);
    let second_ids: Vec<_> = store.income().iter().map(|entry| entry.id).collect();
    assert_eq!(second_ids, first_ids);

    store.delete_income_by_id(first_ids[1]).unwrap();
    let remaining = reopen(&path);
    assert_eq!(remaining.income().len(), 1);
    assert_eq!(remaining.income()[0].description, "first");
}

#[test]
fn negative_amount_on_disk_fails_to_open() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("expenses.json");
    let contents = r#"{
        "income": [],
        "expenses": [{"amount": -10.0049, "description": "refund", "category": "Food", "date": "2024-03-10"}],
        "categories": [{"name": "Food", "description": ""}]
    }"#;
    fs::write(&path, contents).unwrap();

    let result = LedgerStore::open(Box::new(JsonStorage::new(&path)));

    assert!(matches!(result, Err(LedgerError::InvalidAmount(_))));
    assert_eq!(fs::read_to_string(&path).unwrap(), contents);
}

#[test]
fn unrounded_amount_on_disk_is_rounded_and_saved() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("expenses.json");
    fs::write(
        &path,
        r#"{
            "income": [{"id": "6f1c0a52-4f7e-4c0e-9a57-4f1d2b8e9c10", "amount": 10.0049, "description": "tip", "date": "2024-03-01"}],
            "expenses": [],
            "categories": []
        }"#,
    )
    .unwrap();

    let store = reopen(&path);

    assert_eq!(store.income()[0].amount, 10.0);
    assert_eq!(load_ledger_from_path(&path).unwrap().income[0].amount, 10.0);
}

#[test]
fn missing_file_opens_empty_and_is_created_on_first_write() {
    let (mut store, path, _guard) = temp_store();
    assert!(store.ledger().categories.is_empty());
    assert!(!path.exists());

    store.add_category("Food", "").unwrap();
    assert!(path.exists());
}

#[test]
fn atomic_save_failure_preserves_original_file() {
    let (mut store, path, _guard) = seeded_store();
    let original = fs::read_to_string(&path).expect("read original file");
    let before = store.ledger().clone();

    // A directory at the temp file's name makes File::create fail.
    fs::create_dir_all(tmp_path_for(&path)).unwrap();

    let err = store
        .add_expense(expense(1.0, "gum", "Food", date(2024, 3, 30)))
        .unwrap_err();
    assert!(err.is_storage());

    assert_eq!(fs::read_to_string(&path).unwrap(), original);
    assert_eq!(store.ledger(), &before);
}

#[test]
fn corrupt_file_fails_to_open() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("expenses.json");
    fs::write(&path, "{\"income\": [").unwrap();

    let result = LedgerStore::open(Box::new(JsonStorage::new(&path)));
    assert!(matches!(
        result,
        Err(expense_ledger::LedgerError::Storage(StorageError::Serde(_)))
    ));
}

#[test]
fn every_write_keeps_a_bounded_backup_trail() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("expenses.json");
    let storage = JsonStorage::with_retention(&path, 2);
    let mut store = LedgerStore::open(Box::new(storage.clone())).unwrap();

    store.add_category("Food", "").unwrap();
    assert!(storage.list_backups().unwrap().is_empty());

    for name in ["Rent", "Travel", "Books"] {
        store.add_category(name, "").unwrap();
    }
    let backups = storage.list_backups().unwrap();
    assert_eq!(backups.len(), 2);
    assert!(backups.iter().all(|name| name.starts_with("expenses_")));
    assert!(storage.backups_dir().starts_with(temp.path()));
}

#[test]
fn save_and_load_helpers_round_trip() {
    let (store, _path, guard) = seeded_store();
    let copy = guard.path().join("nested").join("copy.json");
    save_ledger_to_path(store.ledger(), &copy).unwrap();
    assert_eq!(&load_ledger_from_path(&copy).unwrap(), store.ledger());

    let reloaded = JsonStorage::new(&copy).load().unwrap();
    assert_eq!(&reloaded, store.ledger());
}
