use chrono::NaiveDate;
use uuid::Uuid;

use crate::errors::{LedgerError, Result};

/// Identifies entities that expose a stable unique identifier.
pub trait Identifiable {
    fn id(&self) -> Uuid;
    fn set_id(&mut self, id: Uuid);
}

/// Anything that carries a monetary amount and a calendar date.
///
/// The bucketing and filtering code is written against this trait so income
/// and expense entries flow through the same aggregation paths.
pub trait Dated {
    fn amount(&self) -> f64;
    fn date(&self) -> NaiveDate;
}

/// Rounds an amount to the fixed two-decimal precision used for storage.
pub fn round_amount(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Validates and rounds an amount entering the ledger.
pub fn normalize_amount(amount: f64) -> Result<f64> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(LedgerError::InvalidAmount(amount));
    }
    Ok(round_amount(amount))
}

// Re-export common dependencies so consumers can rely on this module as a façade.
pub use chrono;
pub use uuid;
