//! Shapes bucketed data into what the presentation layer draws: aligned line
//! series, category distributions, and listing rows.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{
    ledger::Ledger,
    period::{BucketKey, Granularity, PeriodFilter},
    summary::Summary,
};
use crate::errors::LedgerError;

use super::{ServiceResult, SummaryService};

/// Expense and income amounts aligned positionally to one sorted key list.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSeries {
    pub granularity: Granularity,
    pub keys: Vec<BucketKey>,
    pub expenses: Vec<f64>,
    pub income: Vec<f64>,
}

impl LineSeries {
    pub fn labels(&self) -> Vec<&str> {
        self.keys.iter().map(BucketKey::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// `(key, expense, income)` triples in key order.
    pub fn points(&self) -> impl Iterator<Item = (&BucketKey, f64, f64)> {
        self.keys
            .iter()
            .zip(self.expenses.iter().copied())
            .zip(self.income.iter().copied())
            .map(|((key, expense), income)| (key, expense, income))
    }
}

/// Expense totals per category for one fixed period. Never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryDistribution {
    pub period: String,
    pub totals: BTreeMap<String, f64>,
}

impl CategoryDistribution {
    pub fn total(&self) -> f64 {
        self.totals.values().sum()
    }

    /// Each category's share of the total, in percent.
    pub fn shares(&self) -> Vec<(&str, f64)> {
        let total = self.total();
        self.totals
            .iter()
            .map(|(name, amount)| {
                let share = if total > 0.0 { amount * 100.0 / total } else { 0.0 };
                (name.as_str(), share)
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncomeRow {
    /// Index in the ledger's income collection.
    pub position: usize,
    pub id: Uuid,
    pub description: String,
    pub amount: f64,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseRow {
    /// Index in the ledger's expense collection.
    pub position: usize,
    pub id: Uuid,
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Totals {
    pub income: f64,
    pub expenses: f64,
    pub balance: f64,
}

pub struct ProjectionService;

impl ProjectionService {
    /// Merges both key sets and zero-fills whichever side lacks a bucket.
    pub fn merge_series(expenses: &Summary, income: &Summary) -> LineSeries {
        let keys: Vec<BucketKey> = expenses
            .keys()
            .chain(income.keys())
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        LineSeries {
            granularity: expenses.granularity(),
            expenses: keys.iter().map(|key| expenses.get(key).unwrap_or(0.0)).collect(),
            income: keys.iter().map(|key| income.get(key).unwrap_or(0.0)).collect(),
            keys,
        }
    }

    /// Buckets both kinds at `granularity`, restricts the buckets to `filter`
    /// and merges them into one series.
    pub fn line_summary(
        ledger: &Ledger,
        granularity: Granularity,
        filter: &PeriodFilter,
    ) -> LineSeries {
        let expenses = SummaryService::expenses(ledger, granularity).restrict(filter);
        let income = SummaryService::income(ledger, granularity).restrict(filter);
        Self::merge_series(&expenses, &income)
    }

    /// Sums expenses per category inside one exact day, month or year.
    /// Returns `None` when nothing was spent in that period.
    pub fn category_distribution(
        ledger: &Ledger,
        filter: &PeriodFilter,
    ) -> ServiceResult<Option<CategoryDistribution>> {
        let key = filter.fixed_key().ok_or_else(|| {
            LedgerError::InvalidPeriodSelection(format!(
                "category distribution needs one exact period, got `{filter}`"
            ))
        })?;
        let mut totals = BTreeMap::new();
        for expense in filter.apply(&ledger.expenses) {
            *totals.entry(expense.category.clone()).or_insert(0.0) += expense.amount;
        }
        if totals.is_empty() {
            return Ok(None);
        }
        Ok(Some(CategoryDistribution {
            period: key.to_string(),
            totals,
        }))
    }

    /// Textual entry point, e.g. `("month", "2024-03")`.
    pub fn category_pie(
        ledger: &Ledger,
        granularity: &str,
        period: &str,
    ) -> ServiceResult<Option<CategoryDistribution>> {
        let filter = PeriodFilter::parse(granularity, &[period])?;
        Self::category_distribution(ledger, &filter)
    }

    /// Expense rows inside `filter`, ordered by date.
    pub fn expense_rows(ledger: &Ledger, filter: &PeriodFilter) -> Vec<ExpenseRow> {
        let mut rows: Vec<ExpenseRow> = ledger
            .expenses
            .iter()
            .enumerate()
            .filter(|(_, expense)| filter.matches_date(expense.date))
            .map(|(position, expense)| ExpenseRow {
                position,
                id: expense.id,
                description: expense.description.clone(),
                amount: expense.amount,
                category: expense.category.clone(),
                date: expense.date,
            })
            .collect();
        rows.sort_by_key(|row| row.date);
        rows
    }

    pub fn income_rows(ledger: &Ledger, filter: &PeriodFilter) -> Vec<IncomeRow> {
        let mut rows: Vec<IncomeRow> = ledger
            .income
            .iter()
            .enumerate()
            .filter(|(_, income)| filter.matches_date(income.date))
            .map(|(position, income)| IncomeRow {
                position,
                id: income.id,
                description: income.description.clone(),
                amount: income.amount,
                date: income.date,
            })
            .collect();
        rows.sort_by_key(|row| row.date);
        rows
    }

    pub fn totals(ledger: &Ledger, filter: &PeriodFilter) -> Totals {
        let income: f64 = filter.apply(&ledger.income).iter().map(|e| e.amount).sum();
        let expenses: f64 = filter.apply(&ledger.expenses).iter().map(|e| e.amount).sum();
        Totals {
            income,
            expenses,
            balance: income - expenses,
        }
    }
}
