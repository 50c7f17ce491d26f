//! Transaction classification
//!
//! Maps each transaction's raw category label onto the category tree and
//! reduces expenses, asset payments, and loan payments to a uniform list of
//! [`Transaction`]s that the aggregator can bucket.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::{Asset, CategoryTree, Expense, LedgerSnapshot, Loan, Money, Transaction};

/// Name of the bucket unmatched labels fall into unless configured otherwise
pub const DEFAULT_OTHER_CATEGORY: &str = "Other";

/// A single resolved `(category, amount)` contribution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryData {
    pub category: String,
    pub amount: Money,
}

impl CategoryData {
    pub fn new(category: impl Into<String>, amount: Money) -> Self {
        Self {
            category: category.into(),
            amount,
        }
    }
}

/// Resolves transaction labels against a category tree
#[derive(Debug, Clone)]
pub struct TransactionClassifier<'a> {
    tree: &'a CategoryTree,
    other_name: String,
}

impl<'a> TransactionClassifier<'a> {
    /// Create a classifier with the given name for the fallback bucket
    pub fn new(tree: &'a CategoryTree, other_name: impl Into<String>) -> Self {
        Self {
            tree,
            other_name: other_name.into(),
        }
    }

    pub fn tree(&self) -> &'a CategoryTree {
        self.tree
    }

    pub fn other_name(&self) -> &str {
        &self.other_name
    }

    /// Resolve a transaction to the category it is reported under
    ///
    /// Exact name or alias matches at any depth win; everything else lands
    /// in the "Other" bucket.
    pub fn classify(&self, txn: &Transaction) -> CategoryData {
        let resolved = self
            .tree
            .resolve_or_other(&txn.category_label, &self.other_name);
        if !resolved.matched {
            tracing::debug!(
                label = %txn.category_label,
                bucket = resolved.name,
                "unmatched label bucketed as other"
            );
        }
        CategoryData::new(resolved.name, txn.amount)
    }

    /// Resolve a transaction to its top-level category name
    pub fn classify_root(&self, txn: &Transaction) -> CategoryData {
        let resolved = self
            .tree
            .resolve_or_other(&txn.category_label, &self.other_name);
        let name = resolved
            .node
            .and_then(|n| self.tree.root_of(n.id()))
            .map(|root| root.name())
            .unwrap_or(resolved.name);
        CategoryData::new(name, txn.amount)
    }

    /// Sum amounts per resolved category name
    pub fn bucket<'t, I>(&self, transactions: I) -> HashMap<String, Money>
    where
        I: IntoIterator<Item = &'t Transaction>,
    {
        sum_by_category(transactions.into_iter().map(|t| self.classify(t)))
    }

    /// Sum amounts per top-level category name
    pub fn bucket_by_root<'t, I>(&self, transactions: I) -> HashMap<String, Money>
    where
        I: IntoIterator<Item = &'t Transaction>,
    {
        sum_by_category(transactions.into_iter().map(|t| self.classify_root(t)))
    }
}

fn sum_by_category(items: impl Iterator<Item = CategoryData>) -> HashMap<String, Money> {
    let mut buckets: HashMap<String, Money> = HashMap::new();
    for item in items {
        *buckets.entry(item.category).or_default() += item.amount;
    }
    buckets
}

/// Expenses as transactions
pub fn expense_transactions(expenses: &[Expense]) -> Vec<Transaction> {
    expenses.iter().map(Expense::to_transaction).collect()
}

/// Asset payments as transactions labelled with each asset's kind
pub fn asset_transactions(assets: &[Asset]) -> Vec<Transaction> {
    assets.iter().flat_map(Asset::payment_transactions).collect()
}

/// The budget-relevant part of each loan payment
///
/// Principal is a balance-sheet transfer, so only `total - principal` counts
/// as spending. Payments with nothing left after removing principal are
/// skipped.
pub fn loan_transactions(loans: &[Loan]) -> Vec<Transaction> {
    loans
        .iter()
        .flat_map(|loan| {
            loan.payments.iter().filter_map(move |p| {
                let spend = p.kind.non_principal();
                (!spend.is_zero()).then(|| Transaction::new(p.date, spend, loan.category.clone()))
            })
        })
        .collect()
}

/// Every outflow that counts against the budget
pub fn spending_transactions(snapshot: &LedgerSnapshot) -> Vec<Transaction> {
    let mut txns = expense_transactions(&snapshot.expenses);
    txns.extend(asset_transactions(&snapshot.assets));
    txns.extend(loan_transactions(&snapshot.loans));
    txns
}

/// Revenue entries as transactions labelled with their source
pub fn revenue_transactions(snapshot: &LedgerSnapshot) -> Vec<Transaction> {
    snapshot.revenue.iter().map(|r| r.to_transaction()).collect()
}
