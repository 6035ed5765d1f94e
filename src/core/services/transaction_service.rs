//! Business logic helpers for managing income and expense entries.

use uuid::Uuid;

use crate::core::services::{CategoryService, ServiceResult};
use crate::domain::ledger::Ledger;
use crate::domain::transaction::{ExpenseEntry, IncomeEntry};
use crate::errors::{EntryKind, LedgerError};

/// Provides validated CRUD helpers for ledger entries, addressed either by
/// position or by stable id.
pub struct TransactionService;

impl TransactionService {
    pub fn add_income(ledger: &mut Ledger, entry: IncomeEntry) -> ServiceResult<Uuid> {
        Ok(ledger.push_income(entry))
    }

    /// Replaces the editable fields of the entry at `index`; the id is kept.
    pub fn update_income(
        ledger: &mut Ledger,
        index: usize,
        changes: IncomeEntry,
    ) -> ServiceResult<()> {
        ledger.income_at_mut(index)?.apply(changes);
        Ok(())
    }

    pub fn remove_income(ledger: &mut Ledger, index: usize) -> ServiceResult<IncomeEntry> {
        ledger.remove_income_at(index)
    }

    pub fn add_expense(ledger: &mut Ledger, entry: ExpenseEntry) -> ServiceResult<Uuid> {
        CategoryService::ensure_exists(ledger, &entry.category)?;
        Ok(ledger.push_expense(entry))
    }

    pub fn update_expense(
        ledger: &mut Ledger,
        index: usize,
        changes: ExpenseEntry,
    ) -> ServiceResult<()> {
        CategoryService::ensure_exists(ledger, &changes.category)?;
        ledger.expense_at_mut(index)?.apply(changes);
        Ok(())
    }

    pub fn remove_expense(ledger: &mut Ledger, index: usize) -> ServiceResult<ExpenseEntry> {
        ledger.remove_expense_at(index)
    }

    pub fn income_index(ledger: &Ledger, id: Uuid) -> ServiceResult<usize> {
        ledger
            .income_position(id)
            .ok_or(LedgerError::EntryNotFound {
                kind: EntryKind::Income,
                id,
            })
    }

    pub fn expense_index(ledger: &Ledger, id: Uuid) -> ServiceResult<usize> {
        ledger
            .expense_position(id)
            .ok_or(LedgerError::EntryNotFound {
                kind: EntryKind::Expense,
                id,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::category::Category;
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn base_ledger() -> Ledger {
        let mut ledger = Ledger::new();
        ledger.add_category(Category::new("Food", ""));
        ledger
    }

    #[test]
    fn expense_with_unknown_category_is_not_stored() {
        let mut ledger = base_ledger();
        let entry = ExpenseEntry::new(12.0, "taxi", "Travel", date(1)).unwrap();
        let err = TransactionService::add_expense(&mut ledger, entry).unwrap_err();
        assert!(matches!(err, LedgerError::UnknownCategoryReference(ref name) if name == "Travel"));
        assert!(ledger.expenses.is_empty());
    }

    #[test]
    fn update_rejects_unknown_category_and_keeps_entry() {
        let mut ledger = base_ledger();
        let entry = ExpenseEntry::new(12.0, "soup", "Food", date(1)).unwrap();
        TransactionService::add_expense(&mut ledger, entry.clone()).unwrap();
        let changes = ExpenseEntry::new(99.0, "taxi", "Travel", date(2)).unwrap();
        let err = TransactionService::update_expense(&mut ledger, 0, changes).unwrap_err();
        assert!(matches!(err, LedgerError::UnknownCategoryReference(_)));
        assert_eq!(ledger.expenses[0], entry);
    }

    #[test]
    fn id_lookup_follows_position_shifts() {
        let mut ledger = base_ledger();
        let first = TransactionService::add_income(
            &mut ledger,
            IncomeEntry::new(1.0, "a", date(1)).unwrap(),
        )
        .unwrap();
        let second = TransactionService::add_income(
            &mut ledger,
            IncomeEntry::new(2.0, "b", date(2)).unwrap(),
        )
        .unwrap();
        assert_eq!(TransactionService::income_index(&ledger, second).unwrap(), 1);
        TransactionService::remove_income(&mut ledger, 0).unwrap();
        assert_eq!(TransactionService::income_index(&ledger, second).unwrap(), 0);
        let err = TransactionService::income_index(&ledger, first).unwrap_err();
        assert!(matches!(err, LedgerError::EntryNotFound { kind: EntryKind::Income, .. }));
    }
}
