use tracing::debug;

use crate::domain::category::Category;
use crate::domain::ledger::Ledger;
use crate::errors::LedgerError;

use super::ServiceResult;

/// Validates category references and cascades category edits onto expenses.
pub struct CategoryService;

impl CategoryService {
    /// Appends a category. Returns `false` without touching the ledger when
    /// the name is already taken (exact, case-sensitive match).
    pub fn add(ledger: &mut Ledger, category: Category) -> ServiceResult<bool> {
        if category.name.trim().is_empty() {
            return Err(LedgerError::InvalidInput(
                "category name must not be empty".into(),
            ));
        }
        if ledger.has_category(&category.name) {
            debug!(name = %category.name, "category already exists, skipping");
            return Ok(false);
        }
        ledger.add_category(category);
        Ok(true)
    }

    /// Renames and re-describes `old_name`, relabelling every expense filed
    /// under it. Returns the number of relabelled expenses.
    pub fn edit(
        ledger: &mut Ledger,
        old_name: &str,
        new_name: &str,
        new_description: &str,
    ) -> ServiceResult<usize> {
        if new_name.trim().is_empty() {
            return Err(LedgerError::InvalidInput(
                "category name must not be empty".into(),
            ));
        }
        if !ledger.has_category(old_name) {
            return Err(LedgerError::CategoryNotFound(old_name.to_string()));
        }
        if new_name != old_name && ledger.has_category(new_name) {
            return Err(LedgerError::DuplicateCategory(new_name.to_string()));
        }
        let category = ledger
            .category_mut(old_name)
            .ok_or_else(|| LedgerError::CategoryNotFound(old_name.to_string()))?;
        category.name = new_name.to_string();
        category.description = new_description.to_string();

        let mut relabelled = 0;
        for expense in ledger
            .expenses
            .iter_mut()
            .filter(|expense| expense.category == old_name)
        {
            expense.category = new_name.to_string();
            relabelled += 1;
        }
        Ok(relabelled)
    }

    /// Removes the category and every expense filed under it. Returns the
    /// number of expenses deleted alongside it.
    pub fn remove(ledger: &mut Ledger, name: &str) -> ServiceResult<usize> {
        let before = ledger.categories.len();
        ledger.categories.retain(|category| category.name != name);
        if ledger.categories.len() == before {
            return Err(LedgerError::CategoryNotFound(name.to_string()));
        }
        let expenses_before = ledger.expenses.len();
        ledger.expenses.retain(|expense| expense.category != name);
        Ok(expenses_before - ledger.expenses.len())
    }

    pub fn list(ledger: &Ledger) -> Vec<&Category> {
        ledger.categories.iter().collect()
    }

    /// Rejects references to categories the ledger does not hold.
    pub fn ensure_exists(ledger: &Ledger, name: &str) -> ServiceResult<()> {
        if ledger.has_category(name) {
            Ok(())
        } else {
            Err(LedgerError::UnknownCategoryReference(name.to_string()))
        }
    }
}
