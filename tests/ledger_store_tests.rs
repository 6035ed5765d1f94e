mod common;

use common::{date, expense, income, reopen, seeded_store, temp_store};
use expense_ledger::{core::services::SummaryService, Granularity, LedgerError};

#[test]
fn update_by_valid_index_replaces_only_that_entry() {
    let (mut store, path, _guard) = seeded_store();
    let untouched = store.expenses()[0].clone();
    let target_id = store.expenses()[1].id;

    store
        .update_expense(1, expense(25000.0, "train", "Transport", date(2024, 3, 11)))
        .unwrap();

    let updated = &store.expenses()[1];
    assert_eq!(updated.id, target_id);
    assert_eq!(updated.amount, 25000.0);
    assert_eq!(updated.description, "train");
    assert_eq!(updated.date, date(2024, 3, 11));
    assert_eq!(store.expenses()[0], untouched);
    assert_eq!(reopen(&path).ledger(), store.ledger());
}

#[test]
fn delete_by_valid_index_shifts_later_entries() {
    let (mut store, path, _guard) = seeded_store();
    let third = store.expenses()[2].id;

    let removed = store.delete_expense(1).unwrap();

    assert_eq!(removed.description, "bus");
    assert_eq!(store.expenses().len(), 3);
    assert_eq!(store.expenses()[1].id, third);
    assert_eq!(reopen(&path).expenses().len(), 3);
}

#[test]
fn invalid_index_leaves_ledger_and_file_untouched() {
    let (mut store, path, _guard) = seeded_store();
    let before = store.ledger().clone();
    let on_disk = std::fs::read_to_string(&path).unwrap();

    for _ in 0..2 {
        let err = store.delete_income(7).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidIndex { index: 7, len: 2, .. }));
        let err = store
            .update_expense(4, expense(1.0, "x", "Food", date(2024, 1, 1)))
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidIndex { index: 4, len: 4, .. }));
    }

    assert_eq!(store.ledger(), &before);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), on_disk);
}

#[test]
fn ids_address_entries_after_positions_shift() {
    let (mut store, _path, _guard) = seeded_store();
    let taxi = store.expenses()[3].id;
    store.delete_expense(0).unwrap();

    assert_eq!(store.expense_position(taxi).unwrap(), 2);
    store
        .update_expense_by_id(taxi, expense(18000.0, "taxi", "Transport", date(2024, 4, 2)))
        .unwrap();
    assert_eq!(store.expenses()[2].amount, 18000.0);

    let removed = store.delete_expense_by_id(taxi).unwrap();
    assert_eq!(removed.id, taxi);
    assert!(matches!(
        store.expense_position(taxi),
        Err(LedgerError::EntryNotFound { .. })
    ));
}

#[test]
fn expense_requires_existing_category() {
    let (mut store, _path, _guard) = temp_store();
    let err = store
        .add_expense(expense(10.0, "book", "Books", date(2024, 3, 1)))
        .unwrap_err();
    assert!(matches!(err, LedgerError::UnknownCategoryReference(name) if name == "Books"));

    store.add_category("Books", "").unwrap();
    store
        .add_expense(expense(10.0, "book", "Books", date(2024, 3, 1)))
        .unwrap();
    let err = store
        .update_expense(0, expense(10.0, "book", "Comics", date(2024, 3, 1)))
        .unwrap_err();
    assert!(matches!(err, LedgerError::UnknownCategoryReference(_)));
}

#[test]
fn duplicate_category_is_a_no_op() {
    let (mut store, _path, _guard) = temp_store();
    assert!(store.add_category("Food", "meals").unwrap());
    assert!(!store.add_category("Food", "something else").unwrap());
    assert_eq!(store.categories().len(), 1);
    assert_eq!(store.categories()[0].description, "meals");
}

#[test]
fn blank_category_name_is_rejected() {
    let (mut store, _path, _guard) = temp_store();
    let err = store.add_category("   ", "").unwrap_err();
    assert!(matches!(err, LedgerError::InvalidInput(_)));
    assert!(store.categories().is_empty());
}

#[test]
fn rename_relabels_expenses_and_preserves_totals() {
    let (mut store, path, _guard) = seeded_store();
    let before = SummaryService::expenses(store.ledger(), Granularity::Month);

    let relabelled = store.update_category("Food", "Meals", "eating out").unwrap();

    assert_eq!(relabelled, 2);
    assert!(store.expenses().iter().all(|e| e.category != "Food"));
    assert_eq!(
        store.expenses().iter().filter(|e| e.category == "Meals").count(),
        2
    );
    assert_eq!(store.ledger().category("Meals").unwrap().description, "eating out");
    assert_eq!(SummaryService::expenses(store.ledger(), Granularity::Month), before);
    assert!(reopen(&path).ledger().has_category("Meals"));
}

#[test]
fn rename_onto_existing_name_is_rejected() {
    let (mut store, _path, _guard) = seeded_store();
    let err = store.update_category("Food", "Transport", "").unwrap_err();
    assert!(matches!(err, LedgerError::DuplicateCategory(name) if name == "Transport"));
    assert!(store.ledger().has_category("Food"));
}

#[test]
fn missing_category_cannot_be_renamed_or_deleted() {
    let (mut store, _path, _guard) = seeded_store();
    assert!(matches!(
        store.update_category("Rent", "Housing", ""),
        Err(LedgerError::CategoryNotFound(_))
    ));
    assert!(matches!(
        store.delete_category("Rent"),
        Err(LedgerError::CategoryNotFound(_))
    ));
}

#[test]
fn delete_category_removes_exactly_its_expenses() {
    let (mut store, path, _guard) = seeded_store();
    let incomes = store.income().to_vec();

    let removed = store.delete_category("Transport").unwrap();

    assert_eq!(removed, 2);
    assert_eq!(store.expenses().len(), 2);
    assert!(store.expenses().iter().all(|e| e.category == "Food"));
    assert!(!store.ledger().has_category("Transport"));
    assert_eq!(store.income(), incomes.as_slice());
    assert_eq!(reopen(&path).expenses().len(), 2);
}

#[test]
fn negative_amounts_are_rejected_before_reaching_the_store() {
    assert!(matches!(
        expense_ledger::IncomeEntry::new(-5.0, "refund", date(2024, 3, 1)),
        Err(LedgerError::InvalidAmount(_))
    ));
    let (mut store, _path, _guard) = temp_store();
    store.add_income(income(0.0, "nothing", date(2024, 3, 1))).unwrap();
    assert_eq!(store.income()[0].amount, 0.0);
}
