pub mod category_service;
pub mod projection_service;
pub mod summary_service;
pub mod transaction_service;

pub use category_service::CategoryService;
pub use projection_service::{
    CategoryDistribution, ExpenseRow, IncomeRow, LineSeries, ProjectionService, Totals,
};
pub use summary_service::SummaryService;
pub use transaction_service::TransactionService;

pub type ServiceResult<T> = crate::errors::Result<T>;
