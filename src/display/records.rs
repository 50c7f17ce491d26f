//! Record listings
//!
//! Expenses, revenue, assets, and loans rendered as rounded tables, plus the
//! detail views for a single asset or loan.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{Asset, Expense, Loan, LoanPaymentKind, Money, MoneyFormat, Revenue};
use crate::services::loan::LoanLedger;

use super::report::{format_percentage, truncate};

const NAME_WIDTH: usize = 28;

fn render<T: Tabled>(rows: Vec<T>) -> String {
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    format!("{}\n", table)
}

#[derive(Tabled)]
struct ExpenseRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Kind")]
    kind: &'static str,
    #[tabled(rename = "Amount")]
    amount: String,
}

/// Format expenses as a table with a total line
pub fn format_expense_list(expenses: &[Expense], fmt: &MoneyFormat, date_format: &str) -> String {
    if expenses.is_empty() {
        return "No expenses found.\n".to_string();
    }

    let rows = expenses
        .iter()
        .map(|e| ExpenseRow {
            id: e.id.to_string(),
            date: e.date.format(date_format).to_string(),
            name: truncate(&e.name, NAME_WIDTH),
            category: e.category.clone(),
            kind: e.details.kind(),
            amount: e.amount.format(fmt),
        })
        .collect();

    let total: Money = expenses.iter().map(|e| e.amount).sum();
    format!(
        "{}{} expense(s), total {}\n",
        render(rows),
        expenses.len(),
        total.format(fmt)
    )
}

#[derive(Tabled)]
struct RevenueRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

pub fn format_revenue_list(revenue: &[Revenue], fmt: &MoneyFormat, date_format: &str) -> String {
    if revenue.is_empty() {
        return "No revenue found.\n".to_string();
    }

    let rows = revenue
        .iter()
        .map(|r| RevenueRow {
            id: r.id.to_string(),
            date: r.date.format(date_format).to_string(),
            name: truncate(&r.name, NAME_WIDTH),
            source: r.source.clone(),
            amount: r.amount.format(fmt),
        })
        .collect();

    let total: Money = revenue.iter().map(|r| r.amount).sum();
    format!(
        "{}{} entr{}, total {}\n",
        render(rows),
        revenue.len(),
        if revenue.len() == 1 { "y" } else { "ies" },
        total.format(fmt)
    )
}

#[derive(Tabled)]
struct AssetRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Acquired")]
    acquired: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Paid")]
    paid: String,
}

pub fn format_asset_list(assets: &[Asset], fmt: &MoneyFormat, date_format: &str) -> String {
    if assets.is_empty() {
        return "No assets found.\n".to_string();
    }

    let rows = assets
        .iter()
        .map(|a| AssetRow {
            id: a.id.to_string(),
            name: truncate(&a.name, NAME_WIDTH),
            kind: a.kind.clone(),
            acquired: a.acquired.format(date_format).to_string(),
            value: a.value.format(fmt),
            paid: a.total_paid().format(fmt),
        })
        .collect();

    render(rows)
}

/// Format one asset with its payment history
pub fn format_asset_details(asset: &Asset, fmt: &MoneyFormat, date_format: &str) -> String {
    let mut output = String::new();
    output.push_str(&format!("Asset: {}\n", asset.name));
    output.push_str(&format!("  ID:       {}\n", asset.id));
    output.push_str(&format!("  Kind:     {}\n", asset.kind));
    output.push_str(&format!("  Acquired: {}\n", asset.acquired.format(date_format)));
    output.push_str(&format!("  Value:    {}\n", asset.value.format(fmt)));
    output.push_str(&format!("  Paid:     {}\n", asset.total_paid().format(fmt)));

    if !asset.payments.is_empty() {
        output.push_str("\nPayments:\n");
        for payment in &asset.payments {
            output.push_str(&format!(
                "  {}  {}  {:>14}  {}\n",
                payment.id,
                payment.date.format(date_format),
                payment.amount.format(fmt),
                payment.memo
            ));
        }
    }

    output
}

#[derive(Tabled)]
struct LoanRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Original")]
    original: String,
    #[tabled(rename = "Remaining")]
    remaining: String,
    #[tabled(rename = "Repaid")]
    progress: String,
}

pub fn format_loan_list(loans: &[Loan], fmt: &MoneyFormat) -> String {
    if loans.is_empty() {
        return "No loans found.\n".to_string();
    }

    let rows = loans
        .iter()
        .map(|loan| {
            let ledger = LoanLedger::new(loan);
            LoanRow {
                id: loan.id.to_string(),
                name: truncate(&loan.name, NAME_WIDTH),
                category: loan.category.clone(),
                original: loan.original_amount.format(fmt),
                remaining: ledger.remaining_amount().format(fmt),
                progress: format_percentage(ledger.progress() * 100.0),
            }
        })
        .collect();

    render(rows)
}

/// Format one loan with its ledger totals and payments, oldest first
pub fn format_loan_details(loan: &Loan, fmt: &MoneyFormat, date_format: &str) -> String {
    let ledger = LoanLedger::new(loan);
    let mut output = String::new();

    output.push_str(&format!("Loan: {}\n", loan.name));
    output.push_str(&format!("  ID:         {}\n", loan.id));
    output.push_str(&format!("  Category:   {}\n", loan.category));
    output.push_str(&format!("  Started:    {}\n", loan.start_date.format(date_format)));
    output.push_str(&format!("  Original:   {}\n", loan.original_amount.format(fmt)));
    output.push_str(&format!("  Principal:  {}\n", ledger.principal_paid().format(fmt)));
    output.push_str(&format!("  Interest:   {}\n", ledger.interest_paid().format(fmt)));
    output.push_str(&format!("  Escrow:     {}\n", ledger.escrow_paid().format(fmt)));
    output.push_str(&format!("  Other:      {}\n", ledger.other_paid().format(fmt)));
    output.push_str(&format!("  Total paid: {}\n", ledger.total_paid().format(fmt)));
    output.push_str(&format!("  Remaining:  {}\n", ledger.remaining_amount().format(fmt)));
    if ledger.is_paid_off() {
        output.push_str("  Status:     paid off\n");
    }

    let payments = ledger.payments_by_date();
    if !payments.is_empty() {
        output.push_str("\nPayments:\n");
        for payment in payments {
            let breakdown = match payment.kind {
                LoanPaymentKind::Regular {
                    principal,
                    interest,
                    escrow,
                    other,
                } => format!(
                    "principal {}, interest {}, escrow {}, other {}",
                    principal.format(fmt),
                    interest.format(fmt),
                    escrow.format(fmt),
                    other.format(fmt)
                ),
                LoanPaymentKind::PrincipalOnly { principal } => {
                    format!("extra principal {}", principal.format(fmt))
                }
            };
            output.push_str(&format!(
                "  {}  {}  {:>14}  {}\n",
                payment.id,
                payment.date.format(date_format),
                payment.total().format(fmt),
                breakdown
            ));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AssetPayment, LoanPayment};
    use chrono::NaiveDate;

    const DATE_FORMAT: &str = "%Y-%m-%d";

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_expense_list() {
        let expenses = vec![
            Expense::new("Fill up", date(2024, 11, 1), Money::from_cents(3541), "Gas"),
            Expense::new("Parking", date(2024, 11, 2), Money::from_cents(600), "Parking"),
        ];
        let output = format_expense_list(&expenses, &MoneyFormat::default(), DATE_FORMAT);

        assert!(output.contains("Fill up"));
        assert!(output.contains("2024-11-02"));
        assert!(output.contains("2 expense(s), total $41.41"));
        assert!(output.contains('╭'));
    }

    #[test]
    fn test_empty_lists() {
        let fmt = MoneyFormat::default();
        assert_eq!(format_expense_list(&[], &fmt, DATE_FORMAT), "No expenses found.\n");
        assert_eq!(format_revenue_list(&[], &fmt, DATE_FORMAT), "No revenue found.\n");
        assert_eq!(format_asset_list(&[], &fmt, DATE_FORMAT), "No assets found.\n");
        assert_eq!(format_loan_list(&[], &fmt), "No loans found.\n");
    }

    #[test]
    fn test_revenue_list_uses_date_format() {
        let revenue = vec![Revenue::new("Paycheck", date(2024, 11, 15), Money::from_cents(400_000), "Salary")];
        let output = format_revenue_list(&revenue, &MoneyFormat::default(), "%d/%m/%Y");

        assert!(output.contains("15/11/2024"));
        assert!(output.contains("1 entry, total $4,000.00"));
    }

    #[test]
    fn test_asset_details() {
        let mut asset = Asset::new("Civic", "Vehicle", Money::from_cents(1_500_000), date(2024, 1, 1));
        asset.add_payment(AssetPayment::new(date(2024, 2, 1), Money::from_cents(30_000)));

        let output = format_asset_details(&asset, &MoneyFormat::default(), DATE_FORMAT);
        assert!(output.contains("Paid:     $300.00"));
        assert!(output.contains("2024-02-01"));
        assert!(format_asset_list(&[asset], &MoneyFormat::default(), DATE_FORMAT).contains("Vehicle"));
    }

    #[test]
    fn test_loan_details_orders_payments() {
        let mut loan = Loan::new("Mortgage", "Housing", Money::from_cents(100_000), date(2024, 1, 1));
        loan.add_payment(LoanPayment::principal_only(date(2024, 3, 1), Money::from_cents(5000)));
        loan.add_payment(LoanPayment::regular(
            date(2024, 2, 1),
            Money::from_cents(1000),
            Money::from_cents(500),
            Money::zero(),
            Money::zero(),
        ));

        let output = format_loan_details(&loan, &MoneyFormat::default(), DATE_FORMAT);
        let feb = output.find("2024-02-01").unwrap();
        let mar = output.find("2024-03-01").unwrap();
        assert!(feb < mar);
        assert!(output.contains("Remaining:  $940.00"));
        assert!(output.contains("extra principal $50.00"));
        assert!(format_loan_list(&[loan], &MoneyFormat::default()).contains("Mortgage"));
    }
}
