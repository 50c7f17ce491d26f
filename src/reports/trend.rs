//! Trend Report
//!
//! Spending per calendar bucket, optionally narrowed to one category and
//! everything below it.

use std::io::Write;

use crate::display::report::{format_bar, format_title, separator};
use crate::error::{TallyError, TallyResult};
use crate::models::{LedgerSnapshot, Money, MoneyFormat, Transaction};
use crate::services::aggregator::{bucket_by_period, DateWindow, Granularity, PeriodKey};
use crate::services::classifier::{spending_transactions, TransactionClassifier};

use super::csv_amount;

const BAR_WIDTH: usize = 30;

/// Trend Report
#[derive(Debug, Clone)]
pub struct TrendReport {
    pub granularity: Granularity,
    pub window: Option<DateWindow>,
    /// Category the report is narrowed to, as a "Parent > Child" path
    pub category: Option<String>,
    /// Oldest first; periods without spending are omitted
    pub points: Vec<(PeriodKey, Money)>,
}

impl TrendReport {
    /// Build the trend, failing if `category` names no known category
    pub fn generate(
        snapshot: &LedgerSnapshot,
        granularity: Granularity,
        window: Option<DateWindow>,
        category: Option<&str>,
        other_name: &str,
    ) -> TallyResult<Self> {
        let tree = &snapshot.categories;
        let focus = match category {
            Some(name) => Some(
                tree.find(name)
                    .ok_or_else(|| TallyError::category_not_found(name))?,
            ),
            None => None,
        };
        let classifier = TransactionClassifier::new(tree, other_name);

        let transactions: Vec<Transaction> = spending_transactions(snapshot)
            .into_iter()
            .filter(|t| window.map_or(true, |w| w.contains(t.date)))
            .filter(|t| match focus {
                None => true,
                Some(focus) => tree
                    .resolve_or_other(&t.category_label, classifier.other_name())
                    .node
                    .is_some_and(|n| n.id() == focus.id() || tree.is_descendant(n.id(), focus.id())),
            })
            .collect();

        Ok(Self {
            granularity,
            window,
            category: focus.map(|n| tree.path_string(n.id())),
            points: bucket_by_period(&transactions, granularity),
        })
    }

    pub fn total(&self) -> Money {
        self.points.iter().map(|(_, amount)| *amount).sum()
    }

    /// Mean spending over the periods that had any
    pub fn average(&self) -> Money {
        if self.points.is_empty() {
            Money::zero()
        } else {
            self.total().divide(self.points.len() as f64)
        }
    }

    pub fn format_terminal(&self, fmt: &MoneyFormat) -> String {
        let scope = self.category.as_deref().unwrap_or("All spending");
        let mut output = format_title(&format!("Spending Trend by {}: {}", self.granularity, scope));
        if let Some(window) = &self.window {
            output.push_str(&format!("Period: {}\n", window));
        }
        output.push('\n');

        if self.points.is_empty() {
            output.push_str("No spending recorded.\n");
            return output;
        }

        let max = self
            .points
            .iter()
            .map(|(_, amount)| amount.cents())
            .max()
            .unwrap_or_default() as f64;

        for (period, amount) in &self.points {
            output.push_str(&format!(
                "{:<12} {:>14}  {}\n",
                period.to_string(),
                amount.format(fmt),
                format_bar(amount.cents() as f64, max, BAR_WIDTH)
            ));
        }

        output.push_str(&separator());
        output.push('\n');
        output.push_str(&format!("{:<12} {:>14}\n", "TOTAL", self.total().format(fmt)));
        output.push_str(&format!("{:<12} {:>14}\n", "AVERAGE", self.average().format(fmt)));

        output
    }

    pub fn export_csv<W: Write>(&self, writer: W) -> TallyResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(["Period", "Category", "Amount"])?;

        let scope = self.category.clone().unwrap_or_default();
        for (period, amount) in &self.points {
            csv.write_record([period.to_string(), scope.clone(), csv_amount(*amount)])?;
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
        tree.add_root("Food").unwrap();

        LedgerSnapshot {
            categories: tree,
            expenses: vec![
                Expense::new("Fill up", date(2024, 10, 1), Money::from_cents(3000), "Gas"),
                Expense::new("Wash", date(2024, 10, 9), Money::from_cents(1000), "Car"),
                Expense::new("Fill up", date(2024, 12, 1), Money::from_cents(2000), "Gas"),
                Expense::new("Dinner", date(2024, 11, 1), Money::from_cents(5000), "Food"),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_monthly_trend() {
        let report = TrendReport::generate(&snapshot(), Granularity::Month, None, None, "Other").unwrap();

        assert_eq!(report.points.len(), 3);
        assert_eq!(report.points[0].1, Money::from_cents(4000));
        assert_eq!(report.total(), Money::from_cents(11000));
    }

    #[test]
    fn test_category_focus_includes_subtree() {
        let report =
            TrendReport::generate(&snapshot(), Granularity::Month, None, Some("Car"), "Other").unwrap();

        assert_eq!(
            report.points,
            vec![
                (PeriodKey::Month { year: 2024, month: 10 }, Money::from_cents(4000)),
                (PeriodKey::Month { year: 2024, month: 12 }, Money::from_cents(2000)),
            ]
        );
        assert_eq!(report.average(), Money::from_cents(3000));
        assert!(TrendReport::generate(&snapshot(), Granularity::Month, None, Some("Boat"), "Other").is_err());
    }

    #[test]
    fn test_format_and_csv() {
        let window = DateWindow::year(2024).unwrap();
        let report =
            TrendReport::generate(&snapshot(), Granularity::Year, Some(window), None, "Other").unwrap();

        let text = report.format_terminal(&MoneyFormat::default());
        assert!(text.contains("2024"));
        assert!(text.contains("$110.00"));

        let mut buf = Vec::new();
        report.export_csv(&mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "Period,Category,Amount\n2024,,110.00\n");
    }
}
