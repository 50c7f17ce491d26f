//! Core data models for Tally
//!
//! This module contains the data structures of the finance domain: money,
//! the category tree, expenses, revenue, assets, and loans.

pub mod asset;
pub mod category;
pub mod ids;
pub mod ledger;
pub mod loan;
pub mod money;
pub mod transaction;

pub use asset::{Asset, AssetPayment};
pub use category::{
    CategoryColor, CategoryNode, CategoryTree, CategoryValidationError, ResolvedCategory,
};
pub use ids::{AssetId, CategoryId, ExpenseId, LoanId, PaymentId, RevenueId};
pub use ledger::LedgerSnapshot;
pub use loan::{Loan, LoanPayment, LoanPaymentKind};
pub use money::{Money, MoneyFormat, MoneyParseError};
pub use transaction::{
    BillFrequency, Expense, ExpenseDetails, RecordValidationError, Revenue, Transaction,
};
