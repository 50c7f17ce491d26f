//! Service layer for Tally
//!
//! `classifier`, `loan`, and `aggregator` are the pure core: plain functions
//! and borrowed views over in-memory data. `category` and `record` sit on top
//! of the storage layer and handle validation, persistence, and auditing.

pub mod aggregator;
pub mod category;
pub mod classifier;
pub mod loan;
pub mod record;

pub use aggregator::{
    bucket_by_period, remaining_budget, revenue_vs_expense, totals_for_window, BudgetAggregator,
    BudgetLine, CashFlowRow, DateWindow, Granularity, PeriodKey,
};
pub use category::{CategoryDetail, CategoryService};
pub use classifier::{CategoryData, TransactionClassifier, DEFAULT_OTHER_CATEGORY};
pub use loan::{LoanLedger, LoanSummary};
pub use record::RecordService;
