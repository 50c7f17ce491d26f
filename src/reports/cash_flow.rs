//! Cash Flow Report
//!
//! Revenue against spending per calendar bucket.

use std::io::Write;

use crate::display::report::{format_money_signed, format_title, separator};
use crate::error::TallyResult;
use crate::models::{LedgerSnapshot, Money, MoneyFormat, Transaction};
use crate::services::aggregator::{revenue_vs_expense, CashFlowRow, DateWindow, Granularity};
use crate::services::classifier::{revenue_transactions, spending_transactions};

use super::csv_amount;

/// Cash Flow Report
#[derive(Debug, Clone)]
pub struct CashFlowReport {
    pub granularity: Granularity,
    pub window: Option<DateWindow>,
    pub rows: Vec<CashFlowRow>,
    pub total_income: Money,
    pub total_spending: Money,
}

fn within(transactions: Vec<Transaction>, window: Option<DateWindow>) -> Vec<Transaction> {
    transactions
        .into_iter()
        .filter(|t| window.map_or(true, |w| w.contains(t.date)))
        .collect()
}

impl CashFlowReport {
    pub fn generate(
        snapshot: &LedgerSnapshot,
        granularity: Granularity,
        window: Option<DateWindow>,
    ) -> Self {
        let income = within(revenue_transactions(snapshot), window);
        let spending = within(spending_transactions(snapshot), window);
        let rows = revenue_vs_expense(&income, &spending, granularity);

        Self {
            granularity,
            window,
            total_income: rows.iter().map(|r| r.income).sum(),
            total_spending: rows.iter().map(|r| r.spending).sum(),
            rows,
        }
    }

    pub fn net(&self) -> Money {
        self.total_income - self.total_spending
    }

    /// Fraction of income kept, `None` without income
    pub fn savings_rate(&self) -> Option<f64> {
        (!self.total_income.is_zero())
            .then(|| self.net().cents() as f64 / self.total_income.cents() as f64 * 100.0)
    }

    pub fn format_terminal(&self, fmt: &MoneyFormat, color: bool) -> String {
        let mut output = format_title(&format!("Cash Flow by {}", self.granularity));
        if let Some(window) = &self.window {
            output.push_str(&format!("Period: {}\n", window));
        }
        output.push('\n');

        output.push_str(&format!(
            "{:<12} {:>16} {:>16} {:>16}\n",
            "Period", "Income", "Spending", "Net"
        ));
        output.push_str(&separator());
        output.push('\n');

        for row in &self.rows {
            output.push_str(&format!(
                "{:<12} {:>16} {:>16} {:>16}\n",
                row.period.to_string(),
                row.income.format(fmt),
                row.spending.format(fmt),
                format_money_signed(row.net, fmt, color)
            ));
        }

        output.push_str(&separator());
        output.push('\n');
        output.push_str(&format!(
            "{:<12} {:>16} {:>16} {:>16}\n",
            "TOTAL",
            self.total_income.format(fmt),
            self.total_spending.format(fmt),
            format_money_signed(self.net(), fmt, color)
        ));
        if let Some(rate) = self.savings_rate() {
            output.push_str(&format!("\nSavings rate: {:.1}%\n", rate));
        }

        output
    }

    pub fn export_csv<W: Write>(&self, writer: W) -> TallyResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(["Period", "Income", "Spending", "Net"])?;

        for row in &self.rows {
            csv.write_record([
                row.period.to_string(),
                csv_amount(row.income),
                csv_amount(row.spending),
                csv_amount(row.net),
            ])?;
        }

        csv.flush()?;
        Ok(())
    }
}
