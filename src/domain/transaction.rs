use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{normalize_amount, Dated, Identifiable};
use crate::errors::Result;

/// A single income record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IncomeEntry {
    /// Nil when read from a file written before ids existed; the store
    /// assigns a real one and saves it back on open.
    #[serde(default)]
    pub id: Uuid,
    pub amount: f64,
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
}

impl IncomeEntry {
    /// Builds an entry, rejecting negative amounts and rounding to cents.
    pub fn new(amount: f64, description: impl Into<String>, date: NaiveDate) -> Result<Self> {
        Ok(Self {
            id: Uuid::new_v4(),
            amount: normalize_amount(amount)?,
            description: description.into(),
            date,
        })
    }

    /// Overwrites the editable fields while keeping the stable id.
    pub fn apply(&mut self, changes: IncomeEntry) {
        self.amount = changes.amount;
        self.description = changes.description;
        self.date = changes.date;
    }
}

/// A single expense record filed under a category name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpenseEntry {
    #[serde(default)]
    pub id: Uuid,
    pub amount: f64,
    #[serde(default)]
    pub description: String,
    pub category: String,
    pub date: NaiveDate,
}

impl ExpenseEntry {
    pub fn new(
        amount: f64,
        description: impl Into<String>,
        category: impl Into<String>,
        date: NaiveDate,
    ) -> Result<Self> {
        Ok(Self {
            id: Uuid::new_v4(),
            amount: normalize_amount(amount)?,
            description: description.into(),
            category: category.into(),
            date,
        })
    }

    pub fn apply(&mut self, changes: ExpenseEntry) {
        self.amount = changes.amount;
        self.description = changes.description;
        self.category = changes.category;
        self.date = changes.date;
    }
}

impl Identifiable for IncomeEntry {
    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }
}

impl Identifiable for ExpenseEntry {
    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }
}

impl Dated for IncomeEntry {
    fn amount(&self) -> f64 {
        self.amount
    }

    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Dated for ExpenseEntry {
    fn amount(&self) -> f64 {
        self.amount
    }

    fn date(&self) -> NaiveDate {
        self.date
    }
}
