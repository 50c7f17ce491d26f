//! Budget Overview Report
//!
//! Budget vs. spending per top-level category for a date window.

use std::io::Write;

use crate::display::report::{format_money_signed, format_title, separator};
use crate::error::TallyResult;
use crate::models::{LedgerSnapshot, Money, MoneyFormat};
use crate::services::aggregator::{remaining_budget, BudgetAggregator, BudgetLine, DateWindow};
use crate::services::classifier::spending_transactions;

use super::csv_amount;

/// Budget Overview Report
#[derive(Debug, Clone)]
pub struct BudgetOverviewReport {
    pub window: DateWindow,
    pub lines: Vec<BudgetLine>,
    /// Sum of all top-level budgets scaled to the window
    pub total_budget: Option<Money>,
    pub total_spent: Money,
    /// `total_budget - total_spent`; `None` when nothing is budgeted
    pub total_remaining: Option<Money>,
}

impl BudgetOverviewReport {
    pub fn generate(snapshot: &LedgerSnapshot, window: DateWindow, other_name: &str) -> Self {
        let aggregator = BudgetAggregator::new(&snapshot.categories, other_name);
        let transactions = spending_transactions(snapshot);

        let lines = aggregator.budget_status(&transactions, &window);
        let breakdown = aggregator.category_breakdown(&transactions, &window);
        let total_spent: Money = breakdown.iter().map(|d| d.amount).sum();
        let total_budget = aggregator.window_budget(&window);

        Self {
            window,
            lines,
            total_budget,
            total_spent,
            total_remaining: total_budget.map(|b| remaining_budget(&breakdown, b)),
        }
    }

    /// Categories whose spending exceeds their budget
    pub fn over_budget(&self) -> Vec<&BudgetLine> {
        self.lines.iter().filter(|l| l.is_over_budget()).collect()
    }

    pub fn format_terminal(&self, fmt: &MoneyFormat, color: bool) -> String {
        let mut output = format_title(&format!("Budget Overview: {}", self.window));
        let dash = "-".to_string();

        output.push_str(&format!(
            "{:<28} {:>14} {:>14} {:>14}\n",
            "Category", "Budget", "Spent", "Remaining"
        ));
        output.push_str(&separator());
        output.push('\n');

        for line in &self.lines {
            let marker = if line.is_over_budget() { " !" } else { "" };
            output.push_str(&format!(
                "{:<28} {:>14} {:>14} {:>14}{}\n",
                line.category,
                line.budget.map(|b| b.format(fmt)).unwrap_or_else(|| dash.clone()),
                line.spent.format(fmt),
                line.remaining
                    .map(|r| format_money_signed(r, fmt, color))
                    .unwrap_or_else(|| dash.clone()),
                marker
            ));
        }

        output.push_str(&separator());
        output.push('\n');
        output.push_str(&format!(
            "{:<28} {:>14} {:>14} {:>14}\n",
            "TOTAL",
            self.total_budget.map(|b| b.format(fmt)).unwrap_or_else(|| dash.clone()),
            self.total_spent.format(fmt),
            self.total_remaining
                .map(|r| format_money_signed(r, fmt, color))
                .unwrap_or(dash),
        ));

        let over = self.over_budget();
        if !over.is_empty() {
            let names: Vec<&str> = over.iter().map(|l| l.category.as_str()).collect();
            output.push_str(&format!("\nOver budget: {}\n", names.join(", ")));
        }

        output
    }

    pub fn export_csv<W: Write>(&self, writer: W) -> TallyResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(["Start", "End", "Category", "Budget", "Spent", "Remaining", "Over Budget"])?;

        for line in &self.lines {
            csv.write_record([
                self.window.start().to_string(),
                self.window.end().to_string(),
                line.category.clone(),
                line.budget.map(csv_amount).unwrap_or_default(),
                csv_amount(line.spent),
                line.remaining.map(csv_amount).unwrap_or_default(),
                line.is_over_budget().to_string(),
            ])?;
        }

        csv.write_record([
            self.window.start().to_string(),
            self.window.end().to_string(),
            "TOTAL".to_string(),
            self.total_budget.map(csv_amount).unwrap_or_default(),
            csv_amount(self.total_spent),
            self.total_remaining.map(csv_amount).unwrap_or_default(),
            String::new(),
        ])?;
        csv.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryTree, Expense, Loan, LoanPayment};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn snapshot() -> LedgerSnapshot {
        let mut tree = CategoryTree::new();
        let car = tree.add_root("Car").unwrap();
        let gas = tree.add_child(car, "Gas").unwrap();
        tree.set_fixed_amount(gas, Some(Money::from_cents(10000))).unwrap();
        let housing = tree.add_root("Housing").unwrap();
        tree.set_fixed_amount(housing, Some(Money::from_cents(500))).unwrap();

        let mut loan = Loan::new("Mortgage", "Housing", Money::from_cents(100_000), date(2024, 1, 1));
        loan.add_payment(LoanPayment::regular(
            date(2024, 11, 1),
            Money::from_cents(1000),
            Money::from_cents(500),
            Money::from_cents(200),
            Money::zero(),
        ));

        LedgerSnapshot {
            categories: tree,
            expenses: vec![
                Expense::new("Fill up", date(2024, 11, 3), Money::from_cents(3541), "Gas"),
                Expense::new("Parking", date(2024, 11, 4), Money::from_cents(600), "Parking"),
            ],
            loans: vec![loan],
            ..Default::default()
        }
    }

    #[test]
    fn test_generate() {
        let report =
            BudgetOverviewReport::generate(&snapshot(), DateWindow::month(2024, 11).unwrap(), "Other");

        assert_eq!(report.lines.len(), 3);
        assert_eq!(report.lines[0].remaining, Some(Money::from_cents(6459)));
        assert_eq!(report.lines[1].spent, Money::from_cents(700));
        assert!(report.lines[1].is_over_budget());
        assert_eq!(report.lines[2].category, "Other");
        assert_eq!(report.total_spent, Money::from_cents(4841));
        assert_eq!(report.total_remaining, Some(Money::from_cents(5659)));
    }

    #[test]
    fn test_format_and_csv() {
        let report =
            BudgetOverviewReport::generate(&snapshot(), DateWindow::month(2024, 11).unwrap(), "Other");

        let text = report.format_terminal(&MoneyFormat::default(), false);
        assert!(text.contains("Budget Overview: 2024-11-01 to 2024-11-30"));
        assert!(text.contains("Over budget: Housing"));

        let mut buf = Vec::new();
        report.export_csv(&mut buf).unwrap();
        let csv = String::from_utf8(buf).unwrap();
        assert!(csv.starts_with("Start,End,Category,Budget,Spent,Remaining,Over Budget\n"));
        assert!(csv.contains("2024-11-01,2024-11-30,Car,100.00,35.41,64.59,false"));
        assert!(csv.contains("TOTAL,105.00,48.41,56.59,"));
    }
}
