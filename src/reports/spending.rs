//! Spending Report
//!
//! Per-category spending for a date window, with each category's share of
//! the total.

use std::collections::HashMap;
use std::io::Write;

use crate::display::report::{format_percentage, format_title, separator};
use crate::error::TallyResult;
use crate::models::{LedgerSnapshot, Money, MoneyFormat};
use crate::services::aggregator::{BudgetAggregator, DateWindow};
use crate::services::classifier::spending_transactions;

use super::{csv_amount, percent_of};

/// One category's spending
#[derive(Debug, Clone, PartialEq)]
pub struct SpendingRow {
    pub category: String,
    /// "Parent > Child" path, or the bare name for the "Other" bucket
    pub path: String,
    pub amount: Money,
    pub transaction_count: usize,
    pub percentage: f64,
}

/// Spending Report
#[derive(Debug, Clone)]
pub struct SpendingReport {
    pub window: DateWindow,
    /// Largest spending first
    pub rows: Vec<SpendingRow>,
    pub total_spending: Money,
    pub total_transactions: usize,
}

impl SpendingReport {
    pub fn generate(snapshot: &LedgerSnapshot, window: DateWindow, other_name: &str) -> Self {
        let tree = &snapshot.categories;
        let aggregator = BudgetAggregator::new(tree, other_name);
        let transactions = spending_transactions(snapshot);

        let mut counts: HashMap<String, usize> = HashMap::new();
        for txn in transactions.iter().filter(|t| window.contains(t.date)) {
            *counts
                .entry(aggregator.classifier().classify(txn).category)
                .or_default() += 1;
        }

        let breakdown = aggregator.category_breakdown(&transactions, &window);
        let total_spending: Money = breakdown.iter().map(|d| d.amount).sum();

        let mut rows: Vec<SpendingRow> = breakdown
            .into_iter()
            .map(|data| SpendingRow {
                path: tree
                    .find_by_name(&data.category)
                    .map(|n| tree.path_string(n.id()))
                    .unwrap_or_else(|| data.category.clone()),
                transaction_count: counts.get(&data.category).copied().unwrap_or_default(),
                percentage: percent_of(data.amount, total_spending),
                amount: data.amount,
                category: data.category,
            })
            .collect();
        // Stable sort keeps the name order among equal amounts
        rows.sort_by(|a, b| b.amount.cmp(&a.amount));

        Self {
            window,
            total_transactions: counts.values().sum(),
            rows,
            total_spending,
        }
    }

    /// The `limit` categories with the most spending
    pub fn top_categories(&self, limit: usize) -> &[SpendingRow] {
        &self.rows[..limit.min(self.rows.len())]
    }

    pub fn format_terminal(&self, fmt: &MoneyFormat) -> String {
        let mut output = format_title(&format!("Spending Report: {}", self.window));
        output.push_str(&format!(
            "Total Spending: {}\nTransactions: {}\n\n",
            self.total_spending.format(fmt),
            self.total_transactions
        ));

        if self.rows.is_empty() {
            output.push_str("No spending in this period.\n");
            return output;
        }

        output.push_str(&format!(
            "{:<36} {:>14} {:>7} {:>7}\n",
            "Category", "Amount", "Count", "%"
        ));
        output.push_str(&separator());
        output.push('\n');

        for row in &self.rows {
            output.push_str(&format!(
                "{:<36} {:>14} {:>7} {:>7}\n",
                row.path,
                row.amount.format(fmt),
                row.transaction_count,
                format_percentage(row.percentage)
            ));
        }

        output.push_str(&separator());
        output.push('\n');
        output.push_str(&format!(
            "{:<36} {:>14} {:>7}\n",
            "TOTAL",
            self.total_spending.format(fmt),
            self.total_transactions
        ));

        output
    }

    pub fn export_csv<W: Write>(&self, writer: W) -> TallyResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(["Start", "End", "Category", "Path", "Amount", "Count", "Percentage"])?;

        for row in &self.rows {
            csv.write_record([
                self.window.start().to_string(),
                self.window.end().to_string(),
                row.category.clone(),
                row.path.clone(),
                csv_amount(row.amount),
                row.transaction_count.to_string(),
                format!("{:.2}", row.percentage),
            ])?;
        }

        csv.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryTree, Expense};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn snapshot() -> LedgerSnapshot {
        let mut tree = CategoryTree::new();
        let car = tree.add_root("Car").unwrap();
        tree.add_child(car, "Gas").unwrap();
        let food = tree.add_root("Food").unwrap();
        tree.add_child(food, "Groceries").unwrap();

        LedgerSnapshot {
            categories: tree,
            expenses: vec![
                Expense::new("Fill up", date(2024, 11, 1), Money::from_cents(2500), "Gas"),
                Expense::new("Fill up", date(2024, 11, 15), Money::from_cents(2500), "Gas"),
                Expense::new("Market", date(2024, 11, 2), Money::from_cents(4000), "Groceries"),
                Expense::new("Toll", date(2024, 11, 3), Money::from_cents(1000), "Tolls"),
                Expense::new("Market", date(2024, 12, 2), Money::from_cents(9999), "Groceries"),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_generate_spending_report() {
        let report = SpendingReport::generate(&snapshot(), DateWindow::month(2024, 11).unwrap(), "Other");

        assert_eq!(report.total_spending, Money::from_cents(10000));
        assert_eq!(report.total_transactions, 4);

        let categories: Vec<_> = report.rows.iter().map(|r| r.category.as_str()).collect();
        assert_eq!(categories, vec!["Gas", "Groceries", "Other"]);
        assert_eq!(report.rows[0].path, "Car > Gas");
        assert_eq!(report.rows[0].transaction_count, 2);
        assert_eq!(report.rows[0].percentage, 50.0);
        assert_eq!(report.rows[2].path, "Other");
    }

    #[test]
    fn test_top_categories() {
        let report = SpendingReport::generate(&snapshot(), DateWindow::month(2024, 11).unwrap(), "Other");
        assert_eq!(report.top_categories(1).len(), 1);
        assert_eq!(report.top_categories(10).len(), 3);
    }

    #[test]
    fn test_empty_period() {
        let report = SpendingReport::generate(&snapshot(), DateWindow::month(2023, 1).unwrap(), "Other");
        assert!(report.rows.is_empty());
        assert!(report
            .format_terminal(&MoneyFormat::default())
            .contains("No spending in this period."));
    }

    #[test]
    fn test_export_csv() {
        let report = SpendingReport::generate(&snapshot(), DateWindow::month(2024, 11).unwrap(), "Other");
        let mut buf = Vec::new();
        report.export_csv(&mut buf).unwrap();

        let csv = String::from_utf8(buf).unwrap();
        assert!(csv.contains("2024-11-01,2024-11-30,Gas,Car > Gas,50.00,2,50.00"));
        assert_eq!(csv.lines().count(), 4);
    }
}
