//! Ledger snapshot
//!
//! An immutable, fully-loaded copy of everything the reports need. The
//! storage layer produces a fresh snapshot before each report so the
//! aggregation code only ever sees plain in-memory data.

use serde::{Deserialize, Serialize};

use super::asset::Asset;
use super::category::CategoryTree;
use super::loan::Loan;
use super::transaction::{Expense, Revenue};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    #[serde(default)]
    pub categories: CategoryTree,
    #[serde(default)]
    pub expenses: Vec<Expense>,
    #[serde(default)]
    pub revenue: Vec<Revenue>,
    #[serde(default)]
    pub assets: Vec<Asset>,
    #[serde(default)]
    pub loans: Vec<Loan>,
}

impl LedgerSnapshot {
    /// Check whether the snapshot holds no records at all
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
            && self.expenses.is_empty()
            && self.revenue.is_empty()
            && self.assets.is_empty()
            && self.loans.is_empty()
    }

    /// Total number of records (categories excluded)
    pub fn record_count(&self) -> usize {
        self.expenses.len() + self.revenue.len() + self.assets.len() + self.loans.len()
    }
}
