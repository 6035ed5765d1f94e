use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::services::{CategoryService, ServiceResult, TransactionService};
use crate::domain::{
    category::Category,
    ledger::Ledger,
    transaction::{ExpenseEntry, IncomeEntry},
};
use crate::errors::Result;
use crate::storage::StorageBackend;

/// Owns the in-memory ledger and flushes it after every committed write.
///
/// Each mutation runs against a staged copy. The copy is saved first and only
/// then swapped in, so a rejected write or a failed save leaves the current
/// ledger untouched.
pub struct LedgerStore {
    ledger: Ledger,
    storage: Box<dyn StorageBackend>,
}

impl LedgerStore {
    /// Loads the ledger from `storage`.
    ///
    /// Entries written without ids get one here, and unrounded amounts are
    /// rounded to cents. Either repair is saved back immediately so ids stay
    /// stable across sessions. A negative amount on disk fails the open.
    pub fn open(storage: Box<dyn StorageBackend>) -> Result<Self> {
        let mut ledger = storage.load()?;
        let repairs = ledger.repair()?;
        if repairs.rounded_amounts > 0 {
            warn!(
                count = repairs.rounded_amounts,
                "stored amounts were not rounded to cents"
            );
        }
        if !repairs.is_empty() {
            storage.save(&ledger)?;
            info!(
                assigned_ids = repairs.assigned_ids,
                rounded_amounts = repairs.rounded_amounts,
                "repaired ledger saved"
            );
        }
        debug!(
            income = ledger.income.len(),
            expenses = ledger.expenses.len(),
            categories = ledger.categories.len(),
            "ledger loaded"
        );
        for expense in ledger.dangling_expenses() {
            warn!(id = %expense.id, category = %expense.category, "expense references a missing category");
        }
        Ok(Self { ledger, storage })
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn income(&self) -> &[IncomeEntry] {
        &self.ledger.income
    }

    pub fn expenses(&self) -> &[ExpenseEntry] {
        &self.ledger.expenses
    }

    pub fn categories(&self) -> &[Category] {
        &self.ledger.categories
    }

    pub fn income_position(&self, id: Uuid) -> Result<usize> {
        TransactionService::income_index(&self.ledger, id)
    }

    pub fn expense_position(&self, id: Uuid) -> Result<usize> {
        TransactionService::expense_index(&self.ledger, id)
    }

    pub fn add_income(&mut self, entry: IncomeEntry) -> Result<Uuid> {
        let id = self.commit("add_income", |ledger| {
            TransactionService::add_income(ledger, entry)
        })?;
        info!(%id, "income added");
        Ok(id)
    }

    pub fn update_income(&mut self, index: usize, changes: IncomeEntry) -> Result<()> {
        self.commit("update_income", |ledger| {
            TransactionService::update_income(ledger, index, changes)
        })?;
        info!(index, "income updated");
        Ok(())
    }

    pub fn update_income_by_id(&mut self, id: Uuid, changes: IncomeEntry) -> Result<()> {
        let index = self.income_position(id)?;
        self.update_income(index, changes)
    }

    pub fn delete_income(&mut self, index: usize) -> Result<IncomeEntry> {
        let removed = self.commit("delete_income", |ledger| {
            TransactionService::remove_income(ledger, index)
        })?;
        info!(index, id = %removed.id, "income deleted");
        Ok(removed)
    }

    pub fn delete_income_by_id(&mut self, id: Uuid) -> Result<IncomeEntry> {
        let index = self.income_position(id)?;
        self.delete_income(index)
    }

    pub fn add_expense(&mut self, entry: ExpenseEntry) -> Result<Uuid> {
        let id = self.commit("add_expense", |ledger| {
            TransactionService::add_expense(ledger, entry)
        })?;
        info!(%id, "expense added");
        Ok(id)
    }

    pub fn update_expense(&mut self, index: usize, changes: ExpenseEntry) -> Result<()> {
        self.commit("update_expense", |ledger| {
            TransactionService::update_expense(ledger, index, changes)
        })?;
        info!(index, "expense updated");
        Ok(())
    }

    pub fn update_expense_by_id(&mut self, id: Uuid, changes: ExpenseEntry) -> Result<()> {
        let index = self.expense_position(id)?;
        self.update_expense(index, changes)
    }

    pub fn delete_expense(&mut self, index: usize) -> Result<ExpenseEntry> {
        let removed = self.commit("delete_expense", |ledger| {
            TransactionService::remove_expense(ledger, index)
        })?;
        info!(index, id = %removed.id, "expense deleted");
        Ok(removed)
    }

    pub fn delete_expense_by_id(&mut self, id: Uuid) -> Result<ExpenseEntry> {
        let index = self.expense_position(id)?;
        self.delete_expense(index)
    }

    /// Returns `false` when a category with that name already exists; the
    /// ledger is neither changed nor flushed in that case.
    pub fn add_category(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<bool> {
        let category = Category::new(name, description);
        let name = category.name.clone();
        let added = self.commit("add_category", |ledger| {
            CategoryService::add(ledger, category)
        })?;
        if added {
            info!(%name, "category added");
        }
        Ok(added)
    }

    /// Renames a category and relabels its expenses in one flush.
    pub fn update_category(
        &mut self,
        old_name: &str,
        new_name: &str,
        new_description: &str,
    ) -> Result<usize> {
        let relabelled = self.commit("update_category", |ledger| {
            CategoryService::edit(ledger, old_name, new_name, new_description)
        })?;
        info!(old_name, new_name, relabelled, "category updated");
        Ok(relabelled)
    }

    /// Deletes a category together with every expense filed under it.
    pub fn delete_category(&mut self, name: &str) -> Result<usize> {
        let removed = self.commit("delete_category", |ledger| {
            CategoryService::remove(ledger, name)
        })?;
        info!(name, removed_expenses = removed, "category deleted");
        Ok(removed)
    }

    fn commit<T, F>(&mut self, operation: &str, mutate: F) -> Result<T>
    where
        F: FnOnce(&mut Ledger) -> ServiceResult<T>,
    {
        let mut staged = self.ledger.clone();
        let outcome = match mutate(&mut staged) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(operation, error = %err, "write rejected");
                return Err(err);
            }
        };
        if staged == self.ledger {
            debug!(operation, "no changes, skipping flush");
            return Ok(outcome);
        }
        if let Err(err) = self.storage.save(&staged) {
            warn!(operation, error = %err, "flush failed, ledger left unchanged");
            return Err(err.into());
        }
        self.ledger = staged;
        Ok(outcome)
    }
}
