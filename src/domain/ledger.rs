//! The ledger aggregate and its positional primitives.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    category::Category,
    common::{normalize_amount, Identifiable},
    transaction::{ExpenseEntry, IncomeEntry},
};
use crate::errors::{EntryKind, LedgerError, Result};

/// Aggregate root owning categories, income and expenses.
///
/// The serialized shape (`income`, `expenses`, `categories`) is the on-disk
/// format, so field names must not change.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Ledger {
    #[serde(default)]
    pub income: Vec<IncomeEntry>,
    #[serde(default)]
    pub expenses: Vec<ExpenseEntry>,
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.name == name)
    }

    pub fn category_mut(&mut self, name: &str) -> Option<&mut Category> {
        self.categories
            .iter_mut()
            .find(|category| category.name == name)
    }

    pub fn has_category(&self, name: &str) -> bool {
        self.category(name).is_some()
    }

    pub fn add_category(&mut self, category: Category) {
        self.categories.push(category);
    }

    pub fn income_position(&self, id: Uuid) -> Option<usize> {
        position_by_id(&self.income, id)
    }

    pub fn expense_position(&self, id: Uuid) -> Option<usize> {
        position_by_id(&self.expenses, id)
    }

    pub fn push_income(&mut self, entry: IncomeEntry) -> Uuid {
        let id = entry.id;
        self.income.push(entry);
        id
    }

    pub fn push_expense(&mut self, entry: ExpenseEntry) -> Uuid {
        let id = entry.id;
        self.expenses.push(entry);
        id
    }

    pub fn income_at_mut(&mut self, index: usize) -> Result<&mut IncomeEntry> {
        let len = self.income.len();
        self.income
            .get_mut(index)
            .ok_or(LedgerError::InvalidIndex {
                kind: EntryKind::Income,
                index,
                len,
            })
    }

    pub fn expense_at_mut(&mut self, index: usize) -> Result<&mut ExpenseEntry> {
        let len = self.expenses.len();
        self.expenses
            .get_mut(index)
            .ok_or(LedgerError::InvalidIndex {
                kind: EntryKind::Expense,
                index,
                len,
            })
    }

    pub fn remove_income_at(&mut self, index: usize) -> Result<IncomeEntry> {
        ensure_index(EntryKind::Income, index, self.income.len())?;
        Ok(self.income.remove(index))
    }

    pub fn remove_expense_at(&mut self, index: usize) -> Result<ExpenseEntry> {
        ensure_index(EntryKind::Expense, index, self.expenses.len())?;
        Ok(self.expenses.remove(index))
    }

    /// Lists expenses whose category reference has no matching category.
    pub fn dangling_expenses(&self) -> Vec<&ExpenseEntry> {
        self.expenses
            .iter()
            .filter(|expense| !self.has_category(&expense.category))
            .collect()
    }

    /// Brings entries read from disk up to the invariants that constructors
    /// enforce: every entry gets a non-nil id and every amount is rounded to
    /// cents. Negative or non-finite amounts are rejected outright.
    pub fn repair(&mut self) -> Result<Repairs> {
        let mut repairs = Repairs::default();
        repair_entries(&mut self.income, &mut repairs, |entry| &mut entry.amount)?;
        repair_entries(&mut self.expenses, &mut repairs, |entry| &mut entry.amount)?;
        Ok(repairs)
    }
}

/// Counts of what [`Ledger::repair`] changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Repairs {
    pub assigned_ids: usize,
    pub rounded_amounts: usize,
}

impl Repairs {
    pub fn is_empty(&self) -> bool {
        self.assigned_ids == 0 && self.rounded_amounts == 0
    }
}

fn position_by_id<T: Identifiable>(entries: &[T], id: Uuid) -> Option<usize> {
    entries.iter().position(|entry| entry.id() == id)
}

fn repair_entries<T, F>(entries: &mut [T], repairs: &mut Repairs, amount: F) -> Result<()>
where
    T: Identifiable,
    F: Fn(&mut T) -> &mut f64,
{
    for entry in entries.iter_mut() {
        if entry.id().is_nil() {
            entry.set_id(Uuid::new_v4());
            repairs.assigned_ids += 1;
        }
        let stored = amount(entry);
        let normalized = normalize_amount(*stored)?;
        if normalized != *stored {
            *stored = normalized;
            repairs.rounded_amounts += 1;
        }
    }
    Ok(())
}

fn ensure_index(kind: EntryKind, index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(LedgerError::InvalidIndex { kind, index, len })
    }
}
