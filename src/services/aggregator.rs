//! Budget aggregation
//!
//! Turns a flat list of transactions into the figures the reports draw:
//! window totals, per-category breakdowns, remaining budget, and calendar
//! buckets. Every function is a pure computation over its inputs; callers
//! pass a fresh snapshot each time, so nothing is cached between calls.
//!
//! Date windows are inclusive of both endpoints at day granularity.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::error::{TallyError, TallyResult};
use crate::models::{CategoryTree, Money, Transaction};

use super::classifier::{CategoryData, TransactionClassifier};

/// An inclusive range of calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    /// A window from `start` to `end`, both included
    pub fn between(start: NaiveDate, end: NaiveDate) -> TallyResult<Self> {
        if end < start {
            return Err(TallyError::Validation(format!(
                "Window end {} is before start {}",
                end, start
            )));
        }
        Ok(Self { start, end })
    }

    /// A single day
    pub fn day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// A whole calendar month
    pub fn month(year: i32, month: u32) -> TallyResult<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            TallyError::Validation(format!("Invalid month: {}-{:02}", year, month))
        })?;
        let next = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        };
        let end = next
            .and_then(|d| d.pred_opt())
            .ok_or_else(|| TallyError::Validation(format!("Invalid month: {}-{:02}", year, month)))?;
        Ok(Self { start, end })
    }

    /// A whole calendar year
    pub fn year(year: i32) -> TallyResult<Self> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1);
        let end = NaiveDate::from_ymd_opt(year, 12, 31);
        match (start, end) {
            (Some(start), Some(end)) => Ok(Self { start, end }),
            _ => Err(TallyError::Validation(format!("Invalid year: {}", year))),
        }
    }

    /// Parse "2024", "2024-11", or "2024-11-05" into a window
    pub fn parse(s: &str) -> TallyResult<Self> {
        let s = s.trim();
        let invalid = || {
            TallyError::Validation(format!(
                "Invalid period '{}'. Use YYYY, YYYY-MM, or YYYY-MM-DD",
                s
            ))
        };
        let parts: Vec<&str> = s.split('-').collect();
        match parts.as_slice() {
            [y] => Self::year(y.parse().map_err(|_| invalid())?),
            [y, m] => Self::month(
                y.parse().map_err(|_| invalid())?,
                m.parse().map_err(|_| invalid())?,
            ),
            [_, _, _] => NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map(Self::day)
                .map_err(|_| invalid()),
            _ => Err(invalid()),
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of calendar months the window touches
    pub fn months_spanned(&self) -> u32 {
        let months = |d: NaiveDate| d.year() as i64 * 12 + d.month0() as i64;
        (months(self.end) - months(self.start) + 1) as u32
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{} to {}", self.start, self.end)
        }
    }
}

/// Calendar bucket size for time series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    #[default]
    Month,
    Year,
}

impl Granularity {
    pub fn parse(s: &str) -> TallyResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "day" | "daily" | "d" => Ok(Self::Day),
            "month" | "monthly" | "m" => Ok(Self::Month),
            "year" | "yearly" | "y" => Ok(Self::Year),
            other => Err(TallyError::Validation(format!(
                "Invalid granularity '{}'. Use day, month, or year",
                other
            ))),
        }
    }

    /// The bucket a date falls into
    pub fn period_key(&self, date: NaiveDate) -> PeriodKey {
        match self {
            Self::Day => PeriodKey::Day(date),
            Self::Month => PeriodKey::Month {
                year: date.year(),
                month: date.month(),
            },
            Self::Year => PeriodKey::Year(date.year()),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Day => write!(f, "day"),
            Self::Month => write!(f, "month"),
            Self::Year => write!(f, "year"),
        }
    }
}

/// Identifies one calendar bucket; orders chronologically
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "granularity", rename_all = "lowercase")]
pub enum PeriodKey {
    Day(NaiveDate),
    Month { year: i32, month: u32 },
    Year(i32),
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Day(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Self::Month { year, month } => write!(f, "{:04}-{:02}", year, month),
            Self::Year(year) => write!(f, "{:04}", year),
        }
    }
}

/// Sum of all transactions dated inside the window
pub fn totals_for_window(transactions: &[Transaction], window: &DateWindow) -> Money {
    transactions
        .iter()
        .filter(|t| window.contains(t.date))
        .map(|t| t.amount)
        .sum()
}

/// Budget left after the breakdown's spending; negative means over budget
pub fn remaining_budget(breakdown: &[CategoryData], budget: Money) -> Money {
    budget - breakdown.iter().map(|d| d.amount).sum::<Money>()
}

/// Group transactions into calendar buckets, oldest first
///
/// Only periods with at least one transaction appear; gaps are left for the
/// caller to pad.
pub fn bucket_by_period(
    transactions: &[Transaction],
    granularity: Granularity,
) -> Vec<(PeriodKey, Money)> {
    let mut buckets: BTreeMap<PeriodKey, Money> = BTreeMap::new();
    for txn in transactions {
        *buckets.entry(granularity.period_key(txn.date)).or_default() += txn.amount;
    }
    buckets.into_iter().collect()
}

/// Budget vs. spending for one top-level category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetLine {
    pub category: String,
    /// Monthly rollup scaled to the window, `None` if unbudgeted
    pub budget: Option<Money>,
    pub spent: Money,
    /// `budget - spent`, `None` if unbudgeted
    pub remaining: Option<Money>,
}

impl BudgetLine {
    pub fn is_over_budget(&self) -> bool {
        self.remaining.is_some_and(|r| r.is_negative())
    }
}

/// Income vs. spending for one calendar bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CashFlowRow {
    pub period: PeriodKey,
    pub income: Money,
    pub spending: Money,
    pub net: Money,
}

/// Tree-aware aggregation over a category snapshot
#[derive(Debug, Clone)]
pub struct BudgetAggregator<'a> {
    classifier: TransactionClassifier<'a>,
}

impl<'a> BudgetAggregator<'a> {
    pub fn new(tree: &'a CategoryTree, other_name: impl Into<String>) -> Self {
        Self {
            classifier: TransactionClassifier::new(tree, other_name),
        }
    }

    pub fn classifier(&self) -> &TransactionClassifier<'a> {
        &self.classifier
    }

    /// Per-category totals inside the window, sorted by category name
    pub fn category_breakdown(
        &self,
        transactions: &[Transaction],
        window: &DateWindow,
    ) -> Vec<CategoryData> {
        let buckets = self
            .classifier
            .bucket(transactions.iter().filter(|t| window.contains(t.date)));
        let breakdown = sorted_breakdown(buckets);
        tracing::debug!(
            window = %window,
            categories = breakdown.len(),
            "computed category breakdown"
        );
        breakdown
    }

    /// Per top-level category totals inside the window, sorted by name
    pub fn root_breakdown(
        &self,
        transactions: &[Transaction],
        window: &DateWindow,
    ) -> Vec<CategoryData> {
        sorted_breakdown(
            self.classifier
                .bucket_by_root(transactions.iter().filter(|t| window.contains(t.date))),
        )
    }

    /// Budget, spending, and remaining amount for every top-level category
    ///
    /// Lines follow the tree's root order. Spending that resolved to the
    /// synthesized "Other" bucket gets its own unbudgeted line at the end.
    pub fn budget_status(&self, transactions: &[Transaction], window: &DateWindow) -> Vec<BudgetLine> {
        let tree = self.classifier.tree();
        let months = window.months_spanned() as f64;
        let spent: HashMap<String, Money> = self
            .root_breakdown(transactions, window)
            .into_iter()
            .map(|d| (d.category, d.amount))
            .collect();

        let mut lines: Vec<BudgetLine> = tree
            .roots()
            .into_iter()
            .map(|root| {
                let budget = tree.monthly_budget(root.id()).map(|b| b.scale(months));
                let spent = spent.get(root.name()).copied().unwrap_or_default();
                BudgetLine {
                    category: root.name().to_string(),
                    budget,
                    spent,
                    remaining: budget.map(|b| b - spent),
                }
            })
            .collect();

        let other = self.classifier.other_name();
        let has_other_root = lines
            .iter()
            .any(|l| l.category.to_lowercase() == other.to_lowercase());
        if !has_other_root {
            if let Some(amount) = spent.get(other) {
                lines.push(BudgetLine {
                    category: other.to_string(),
                    budget: None,
                    spent: *amount,
                    remaining: None,
                });
            }
        }
        lines
    }

    /// Total budget for the window across all top-level categories
    pub fn window_budget(&self, window: &DateWindow) -> Option<Money> {
        self.classifier
            .tree()
            .total_budget()
            .map(|b| b.scale(window.months_spanned() as f64))
    }
}

fn sorted_breakdown(buckets: HashMap<String, Money>) -> Vec<CategoryData> {
    let mut breakdown: Vec<CategoryData> = buckets
        .into_iter()
        .map(|(category, amount)| CategoryData { category, amount })
        .collect();
    breakdown.sort_by(|a, b| a.category.cmp(&b.category));
    breakdown
}

/// Income and spending side by side per calendar bucket, oldest first
pub fn revenue_vs_expense(
    income: &[Transaction],
    spending: &[Transaction],
    granularity: Granularity,
) -> Vec<CashFlowRow> {
    let mut rows: BTreeMap<PeriodKey, (Money, Money)> = BTreeMap::new();
    for (period, amount) in bucket_by_period(income, granularity) {
        rows.entry(period).or_default().0 += amount;
    }
    for (period, amount) in bucket_by_period(spending, granularity) {
        rows.entry(period).or_default().1 += amount;
    }
    rows.into_iter()
        .map(|(period, (income, spending))| CashFlowRow {
            period,
            income,
            spending,
            net: income - spending,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::classifier::DEFAULT_OTHER_CATEGORY;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn txn(y: i32, m: u32, d: u32, cents: i64, label: &str) -> Transaction {
        Transaction::new(date(y, m, d), Money::from_cents(cents), label)
    }

    fn car_and_housing() -> CategoryTree {
        let mut tree = CategoryTree::new();
        let car = tree.add_root("Car").unwrap();
        tree.add_child(car, "Gas").unwrap();
        let housing = tree.add_root("Housing").unwrap();
        tree.set_fixed_amount(housing, Some(Money::from_cents(60000)))
            .unwrap();
        tree
    }

    #[test]
    fn test_window_month_bounds() {
        let feb = DateWindow::month(2024, 2).unwrap();
        assert_eq!(feb.start(), date(2024, 2, 1));
        assert_eq!(feb.end(), date(2024, 2, 29));
        let dec = DateWindow::month(2024, 12).unwrap();
        assert_eq!(dec.end(), date(2024, 12, 31));
        assert!(DateWindow::month(2024, 13).is_err());
    }

    #[test]
    fn test_window_parse() {
        assert_eq!(DateWindow::parse("2024").unwrap(), DateWindow::year(2024).unwrap());
        assert_eq!(
            DateWindow::parse("2024-11").unwrap(),
            DateWindow::month(2024, 11).unwrap()
        );
        assert_eq!(
            DateWindow::parse("2024-11-05").unwrap(),
            DateWindow::day(date(2024, 11, 5))
        );
        assert!(DateWindow::parse("November").is_err());
        assert!(DateWindow::between(date(2024, 2, 1), date(2024, 1, 1)).is_err());
    }

    #[test]
    fn test_months_spanned() {
        assert_eq!(DateWindow::month(2024, 11).unwrap().months_spanned(), 1);
        assert_eq!(DateWindow::year(2024).unwrap().months_spanned(), 12);
        let span = DateWindow::between(date(2024, 11, 20), date(2025, 1, 3)).unwrap();
        assert_eq!(span.months_spanned(), 3);
    }

    #[test]
    fn test_totals_for_window_inclusive() {
        let txns = vec![
            txn(2024, 10, 31, 1, "A"),
            txn(2024, 11, 1, 10, "A"),
            txn(2024, 11, 30, 100, "B"),
            txn(2024, 12, 1, 1000, "B"),
        ];
        let window = DateWindow::month(2024, 11).unwrap();
        assert_eq!(totals_for_window(&txns, &window), Money::from_cents(110));
        assert_eq!(totals_for_window(&[], &window), Money::zero());
    }

    #[test]
    fn test_breakdown_scenario() {
        let tree = car_and_housing();
        let aggregator = BudgetAggregator::new(&tree, DEFAULT_OTHER_CATEGORY);
        let txns = vec![
            txn(2024, 11, 1, 3541, "Gas"),
            txn(2024, 11, 5, 600, "Housing Payment"),
        ];
        let window = DateWindow::month(2024, 11).unwrap();

        let breakdown = aggregator.category_breakdown(&txns, &window);
        assert_eq!(
            breakdown,
            vec![
                CategoryData::new("Gas", Money::from_cents(3541)),
                CategoryData::new("Other", Money::from_cents(600)),
            ]
        );
    }

    #[test]
    fn test_breakdown_is_idempotent() {
        let tree = car_and_housing();
        let aggregator = BudgetAggregator::new(&tree, DEFAULT_OTHER_CATEGORY);
        let txns = vec![
            txn(2024, 11, 1, 3541, "Gas"),
            txn(2024, 11, 2, 100, "Zebra"),
            txn(2024, 11, 3, 200, "Housing"),
            txn(2024, 11, 4, 300, "Gas"),
        ];
        let window = DateWindow::month(2024, 11).unwrap();

        let first = aggregator.category_breakdown(&txns, &window);
        let second = aggregator.category_breakdown(&txns, &window);
        assert_eq!(first, second);
        let names: Vec<_> = first.iter().map(|d| d.category.as_str()).collect();
        assert_eq!(names, vec!["Gas", "Housing", "Other"]);
    }

    #[test]
    fn test_remaining_budget_signed() {
        let breakdown = vec![
            CategoryData::new("Gas", Money::from_cents(3000)),
            CategoryData::new("Food", Money::from_cents(5000)),
        ];
        assert_eq!(
            remaining_budget(&breakdown, Money::from_cents(10000)),
            Money::from_cents(2000)
        );
        assert_eq!(
            remaining_budget(&breakdown, Money::from_cents(5000)),
            Money::from_cents(-3000)
        );
        assert_eq!(remaining_budget(&[], Money::from_cents(5)), Money::from_cents(5));
    }

    #[test]
    fn test_bucket_by_period() {
        let txns = vec![
            txn(2024, 12, 3, 5, "A"),
            txn(2024, 11, 1, 10, "A"),
            txn(2024, 11, 20, 20, "B"),
            txn(2023, 1, 1, 1, "B"),
        ];

        let months = bucket_by_period(&txns, Granularity::Month);
        assert_eq!(
            months,
            vec![
                (PeriodKey::Month { year: 2023, month: 1 }, Money::from_cents(1)),
                (PeriodKey::Month { year: 2024, month: 11 }, Money::from_cents(30)),
                (PeriodKey::Month { year: 2024, month: 12 }, Money::from_cents(5)),
            ]
        );

        let years = bucket_by_period(&txns, Granularity::Year);
        assert_eq!(years.len(), 2);
        assert_eq!(years[1], (PeriodKey::Year(2024), Money::from_cents(35)));

        let days = bucket_by_period(&txns, Granularity::Day);
        assert_eq!(days.len(), 4);
        assert_eq!(days[0].0.to_string(), "2023-01-01");
    }

    #[test]
    fn test_period_key_display() {
        assert_eq!(PeriodKey::Month { year: 2024, month: 3 }.to_string(), "2024-03");
        assert_eq!(PeriodKey::Year(2024).to_string(), "2024");
    }

    #[test]
    fn test_budget_status() {
        let tree = car_and_housing();
        let aggregator = BudgetAggregator::new(&tree, DEFAULT_OTHER_CATEGORY);
        let txns = vec![
            txn(2024, 11, 1, 3541, "Gas"),
            txn(2024, 11, 5, 70000, "Housing"),
            txn(2024, 11, 6, 600, "Housing Payment"),
        ];
        let window = DateWindow::month(2024, 11).unwrap();

        let lines = aggregator.budget_status(&txns, &window);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].category, "Car");
        assert_eq!(lines[0].spent, Money::from_cents(3541));
        assert_eq!(lines[0].budget, None);
        assert_eq!(lines[1].category, "Housing");
        assert_eq!(lines[1].remaining, Some(Money::from_cents(-10000)));
        assert!(lines[1].is_over_budget());
        assert_eq!(lines[2].category, "Other");
        assert_eq!(lines[2].spent, Money::from_cents(600));

        let year = DateWindow::year(2024).unwrap();
        assert_eq!(aggregator.window_budget(&year), Some(Money::from_cents(720000)));
    }

    #[test]
    fn test_revenue_vs_expense() {
        let income = vec![txn(2024, 11, 1, 250000, "Salary")];
        let spending = vec![
            txn(2024, 11, 3, 100000, "Rent"),
            txn(2024, 12, 3, 100000, "Rent"),
        ];

        let rows = revenue_vs_expense(&income, &spending, Granularity::Month);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].net, Money::from_cents(150000));
        assert_eq!(rows[1].income, Money::zero());
        assert_eq!(rows[1].net, Money::from_cents(-100000));
    }
}
