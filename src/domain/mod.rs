pub mod category;
pub mod common;
pub mod ledger;
pub mod period;
pub mod summary;
pub mod transaction;

pub use category::Category;
pub use common::{Dated, Identifiable};
pub use ledger::Ledger;
pub use period::{BucketKey, Granularity, PeriodFilter};
pub use summary::Summary;
pub use transaction::{ExpenseEntry, IncomeEntry};
