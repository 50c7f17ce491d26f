//! CSV export of the classified transaction list
//!
//! Every expense, asset payment, budget-relevant loan payment, and revenue
//! entry becomes one row showing the category it resolved to.

use std::io::Write;
use std::slice;

use chrono::NaiveDate;

use crate::error::TallyResult;
use crate::models::{LedgerSnapshot, Transaction};
use crate::reports::csv_amount;
use crate::services::classifier::{asset_transactions, loan_transactions, TransactionClassifier};

/// Where a transaction row came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TransactionSource {
    Expense,
    AssetPayment,
    LoanPayment,
    Revenue,
}

impl TransactionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::AssetPayment => "asset_payment",
            Self::LoanPayment => "loan_payment",
            Self::Revenue => "revenue",
        }
    }
}

/// One row of the transaction export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedRow {
    pub date: NaiveDate,
    pub source: TransactionSource,
    /// Name of the record the transaction belongs to
    pub name: String,
    pub label: String,
    /// Resolved category, empty for revenue
    pub category: String,
    /// Top-level category, empty for revenue
    pub root: String,
    pub transaction: Transaction,
}

/// Flatten and classify every transaction in the ledger, oldest first
pub fn classified_rows(snapshot: &LedgerSnapshot, other_name: &str) -> Vec<ClassifiedRow> {
    let classifier = TransactionClassifier::new(&snapshot.categories, other_name);

    let mut sourced: Vec<(TransactionSource, &str, Transaction)> = Vec::new();
    for expense in &snapshot.expenses {
        sourced.push((TransactionSource::Expense, &expense.name, expense.to_transaction()));
    }
    for asset in &snapshot.assets {
        for txn in asset_transactions(slice::from_ref(asset)) {
            sourced.push((TransactionSource::AssetPayment, &asset.name, txn));
        }
    }
    for loan in &snapshot.loans {
        for txn in loan_transactions(slice::from_ref(loan)) {
            sourced.push((TransactionSource::LoanPayment, &loan.name, txn));
        }
    }
    for revenue in &snapshot.revenue {
        sourced.push((TransactionSource::Revenue, &revenue.name, revenue.to_transaction()));
    }

    let mut rows: Vec<ClassifiedRow> = sourced
        .into_iter()
        .map(|(source, name, txn)| {
            let (category, root) = if source == TransactionSource::Revenue {
                (String::new(), String::new())
            } else {
                (
                    classifier.classify(&txn).category,
                    classifier.classify_root(&txn).category,
                )
            };
            ClassifiedRow {
                date: txn.date,
                source,
                name: name.to_string(),
                label: txn.category_label.clone(),
                category,
                root,
                transaction: txn,
            }
        })
        .collect();

    rows.sort_by(|a, b| a.date.cmp(&b.date).then(a.source.cmp(&b.source)));
    rows
}

/// Write the classified transaction list as CSV
pub fn export_transactions_csv<W: Write>(
    snapshot: &LedgerSnapshot,
    other_name: &str,
    writer: W,
) -> TallyResult<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["Date", "Source", "Name", "Label", "Category", "Root", "Amount"])?;

    for row in classified_rows(snapshot, other_name) {
        csv.write_record([
            row.date.to_string(),
            row.source.as_str().to_string(),
            row.name,
            row.label,
            row.category,
            row.root,
            csv_amount(row.transaction.amount),
        ])?;
    }

    csv.flush()?;
    Ok(())
}
