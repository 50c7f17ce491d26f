//! Reports module for Tally
//!
//! Each report is generated from a `LedgerSnapshot`, renders itself for the
//! terminal with `format_terminal`, and writes itself as CSV with
//! `export_csv`.

pub mod budget_overview;
pub mod cash_flow;
pub mod loans;
pub mod net_worth;
pub mod spending;
pub mod trend;

pub use budget_overview::BudgetOverviewReport;
pub use cash_flow::CashFlowReport;
pub use loans::LoansReport;
pub use net_worth::{NetWorthLine, NetWorthReport};
pub use spending::{SpendingReport, SpendingRow};
pub use trend::TrendReport;

use crate::models::Money;

/// Plain decimal form of an amount for CSV cells, e.g. `-12.05`
pub fn csv_amount(amount: Money) -> String {
    let sign = if amount.is_negative() { "-" } else { "" };
    format!("{}{}.{:02}", sign, amount.dollars().abs(), amount.cents_part())
}

/// `part` as a percentage of `total`, 0 when the total is zero
pub fn percent_of(part: Money, total: Money) -> f64 {
    if total.is_zero() {
        0.0
    } else {
        part.cents() as f64 / total.cents() as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_amount() {
        assert_eq!(csv_amount(Money::from_cents(3541)), "35.41");
        assert_eq!(csv_amount(Money::from_cents(-1205)), "-12.05");
        assert_eq!(csv_amount(Money::from_cents(-5)), "-0.05");
        assert_eq!(csv_amount(Money::zero()), "0.00");
    }

    #[test]
    fn test_percent_of() {
        assert_eq!(percent_of(Money::from_cents(25), Money::from_cents(100)), 25.0);
        assert_eq!(percent_of(Money::from_cents(25), Money::zero()), 0.0);
    }
}
