//! End-to-end budget scenario through the library API
//!
//! Builds a small tree and ledger in memory, then checks rollup,
//! classification, loan accounting, and the breakdown the reports use.

use chrono::NaiveDate;

use tally::models::{
    Asset, AssetPayment, CategoryTree, Expense, LedgerSnapshot, Loan, LoanPayment, Money,
    Transaction,
};
use tally::reports::BudgetOverviewReport;
use tally::services::classifier::spending_transactions;
use tally::services::{BudgetAggregator, CategoryData, DateWindow, LoanLedger};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Car > Gas (unbudgeted) and Housing at $600/mo
fn scenario_tree() -> CategoryTree {
    let mut tree = CategoryTree::new();
    let car = tree.add_root("Car").unwrap();
    tree.add_child(car, "Gas").unwrap();
    let housing = tree.add_root("Housing").unwrap();
    tree.set_fixed_amount(housing, Some(Money::from_cents(60_000)))
        .unwrap();
    tree
}

fn scenario_transactions() -> Vec<Transaction> {
    vec![
        Transaction::new(date(2024, 11, 1), Money::from_cents(3541), "Gas"),
        Transaction::new(date(2024, 11, 5), Money::from_cents(600), "Housing Payment"),
    ]
}

#[test]
fn breakdown_resolves_labels_and_sorts_by_name() {
    let tree = scenario_tree();
    let aggregator = BudgetAggregator::new(&tree, "Other");
    let window = DateWindow::month(2024, 11).unwrap();

    let breakdown = aggregator.category_breakdown(&scenario_transactions(), &window);

    assert_eq!(
        breakdown,
        vec![
            CategoryData::new("Gas", Money::from_cents(3541)),
            CategoryData::new("Other", Money::from_cents(600)),
        ]
    );
}

#[test]
fn breakdown_is_idempotent() {
    let tree = scenario_tree();
    let aggregator = BudgetAggregator::new(&tree, "Other");
    let window = DateWindow::month(2024, 11).unwrap();
    let txns = scenario_transactions();

    let first = aggregator.category_breakdown(&txns, &window);
    let second = aggregator.category_breakdown(&txns, &window);
    assert_eq!(first, second);
}

#[test]
fn window_bounds_are_inclusive() {
    let tree = scenario_tree();
    let aggregator = BudgetAggregator::new(&tree, "Other");
    let txns = scenario_transactions();

    let first_day = DateWindow::day(date(2024, 11, 1));
    let breakdown = aggregator.category_breakdown(&txns, &first_day);
    assert_eq!(breakdown, vec![CategoryData::new("Gas", Money::from_cents(3541))]);

    let between = DateWindow::between(date(2024, 11, 2), date(2024, 11, 5)).unwrap();
    let breakdown = aggregator.category_breakdown(&txns, &between);
    assert_eq!(breakdown, vec![CategoryData::new("Other", Money::from_cents(600))]);

    let october = DateWindow::month(2024, 10).unwrap();
    assert!(aggregator.category_breakdown(&txns, &october).is_empty());
}

#[test]
fn rollup_sums_children_and_own_amount() {
    let mut tree = CategoryTree::new();
    let food = tree.add_root("Food").unwrap();
    let groceries = tree.add_child(food, "Groceries").unwrap();
    let dining = tree.add_child(food, "Dining").unwrap();
    let empty = tree.add_root("Empty").unwrap();
    tree.add_child(empty, "Nothing").unwrap();

    assert_eq!(tree.monthly_budget(food), None);
    assert_eq!(tree.monthly_budget(empty), None);

    tree.set_fixed_amount(groceries, Some(Money::from_cents(1000)))
        .unwrap();
    tree.set_fixed_amount(dining, Some(Money::from_cents(2000)))
        .unwrap();
    assert_eq!(tree.monthly_budget(groceries), Some(Money::from_cents(1000)));
    assert_eq!(tree.monthly_budget(food), Some(Money::from_cents(3000)));

    tree.set_fixed_amount(food, Some(Money::from_cents(500))).unwrap();
    assert_eq!(tree.monthly_budget(food), Some(Money::from_cents(3500)));
    assert_eq!(tree.total_budget(), Some(Money::from_cents(3500)));
}

#[test]
fn deepest_exact_name_wins_over_parent() {
    let mut tree = CategoryTree::new();
    let food = tree.add_root("Food").unwrap();
    tree.add_child(food, "Fast Food").unwrap();
    let aggregator = BudgetAggregator::new(&tree, "Other");
    let classifier = aggregator.classifier();

    let burger = Transaction::new(date(2024, 11, 3), Money::from_cents(899), "Fast Food");
    assert_eq!(classifier.classify(&burger).category, "Fast Food");
    assert_eq!(classifier.classify_root(&burger).category, "Food");

    let mystery = Transaction::new(date(2024, 11, 3), Money::from_cents(100), "Unknown Thing");
    assert_eq!(classifier.classify(&mystery).category, "Other");
}

#[test]
fn loan_ledger_and_budget_contribution() {
    let mut loan = Loan::new("Mortgage", "Housing", Money::from_cents(100_000), date(2024, 1, 1));
    loan.add_payment(LoanPayment::regular(
        date(2024, 11, 1),
        Money::from_cents(1000),
        Money::from_cents(500),
        Money::from_cents(200),
        Money::zero(),
    ));
    loan.add_payment(LoanPayment::principal_only(
        date(2024, 11, 15),
        Money::from_cents(2000),
    ));

    let ledger = LoanLedger::new(&loan);
    assert_eq!(ledger.total_paid(), Money::from_cents(3700));
    assert_eq!(ledger.principal_paid(), Money::from_cents(3000));
    assert_eq!(ledger.remaining_amount(), Money::from_cents(97_000));
    assert!(!ledger.is_paid_off());

    // only interest and escrow count against Housing; the extra principal drops out
    let snapshot = LedgerSnapshot {
        categories: scenario_tree(),
        loans: vec![loan],
        ..Default::default()
    };
    let txns = spending_transactions(&snapshot);
    assert_eq!(txns.len(), 1);

    let aggregator = BudgetAggregator::new(&snapshot.categories, "Other");
    let window = DateWindow::month(2024, 11).unwrap();
    assert_eq!(
        aggregator.category_breakdown(&txns, &window),
        vec![CategoryData::new("Housing", Money::from_cents(700))]
    );
}

#[test]
fn budget_overview_over_full_snapshot() {
    let mut tree = scenario_tree();
    let car = tree.find_by_name("Car").map(|n| n.id()).unwrap();
    tree.set_alias(car, Some("Vehicle")).unwrap();

    let mut civic = Asset::new("Civic", "Vehicle", Money::from_cents(1_500_000), date(2020, 1, 1));
    civic.add_payment(AssetPayment::new(date(2024, 11, 10), Money::from_cents(25_000)));

    let snapshot = LedgerSnapshot {
        categories: tree,
        expenses: vec![
            Expense::new("Fill up", date(2024, 11, 1), Money::from_cents(3541), "Gas"),
            Expense::new("Rent top-up", date(2024, 11, 5), Money::from_cents(70_000), "Housing"),
            Expense::new("Snacks", date(2024, 11, 9), Money::from_cents(600), "Groceries"),
        ],
        assets: vec![civic],
        ..Default::default()
    };

    let window = DateWindow::month(2024, 11).unwrap();
    let report = BudgetOverviewReport::generate(&snapshot, window, "Other");

    let car = report.lines.iter().find(|l| l.category == "Car").unwrap();
    assert_eq!(car.spent, Money::from_cents(28_541));
    assert_eq!(car.budget, None);

    let housing = report.lines.iter().find(|l| l.category == "Housing").unwrap();
    assert_eq!(housing.budget, Some(Money::from_cents(60_000)));
    assert!(housing.is_over_budget());

    let other = report.lines.last().unwrap();
    assert_eq!(other.category, "Other");
    assert_eq!(other.spent, Money::from_cents(600));
    assert_eq!(report.total_spent, Money::from_cents(99_141));
}
