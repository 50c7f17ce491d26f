//! Loans Report
//!
//! One ledger summary per loan plus portfolio totals.

use std::io::Write;

use crate::display::report::{format_percentage, format_title, separator};
use crate::error::TallyResult;
use crate::models::{LedgerSnapshot, Money, MoneyFormat};
use crate::services::loan::{LoanLedger, LoanSummary};

use super::{csv_amount, percent_of};

/// Loans Report
#[derive(Debug, Clone)]
pub struct LoansReport {
    pub loans: Vec<LoanSummary>,
    pub total_original: Money,
    pub total_paid: Money,
    pub total_interest: Money,
    pub total_remaining: Money,
}

impl LoansReport {
    pub fn generate(snapshot: &LedgerSnapshot) -> Self {
        let loans: Vec<LoanSummary> = snapshot
            .loans
            .iter()
            .map(|loan| LoanLedger::new(loan).summary())
            .collect();

        Self {
            total_original: loans.iter().map(|l| l.original_amount).sum(),
            total_paid: loans.iter().map(|l| l.total_paid).sum(),
            total_interest: loans.iter().map(|l| l.interest_paid).sum(),
            total_remaining: loans.iter().map(|l| l.remaining_amount).sum(),
            loans,
        }
    }

    /// Loans with a balance still outstanding
    pub fn active(&self) -> impl Iterator<Item = &LoanSummary> {
        self.loans.iter().filter(|l| !l.paid_off)
    }

    pub fn format_terminal(&self, fmt: &MoneyFormat) -> String {
        let mut output = format_title("Loans");

        if self.loans.is_empty() {
            output.push_str("No loans recorded.\n");
            return output;
        }

        output.push_str(&format!(
            "{:<20} {:>13} {:>13} {:>13} {:>8}\n",
            "Loan", "Original", "Interest", "Remaining", "Repaid"
        ));
        output.push_str(&separator());
        output.push('\n');

        for loan in &self.loans {
            let status = if loan.paid_off { " (paid off)" } else { "" };
            output.push_str(&format!(
                "{:<20} {:>13} {:>13} {:>13} {:>8}{}\n",
                loan.name,
                loan.original_amount.format(fmt),
                loan.interest_paid.format(fmt),
                loan.remaining_amount.format(fmt),
                format_percentage(percent_of(loan.principal_paid, loan.original_amount)),
                status
            ));
        }

        output.push_str(&separator());
        output.push('\n');
        output.push_str(&format!(
            "{:<20} {:>13} {:>13} {:>13}\n",
            "TOTAL",
            self.total_original.format(fmt),
            self.total_interest.format(fmt),
            self.total_remaining.format(fmt)
        ));
        output.push_str(&format!(
            "\nActive loans: {} of {}\n",
            self.active().count(),
            self.loans.len()
        ));

        output
    }

    pub fn export_csv<W: Write>(&self, writer: W) -> TallyResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record([
            "Loan",
            "Category",
            "Original",
            "Total Paid",
            "Principal",
            "Interest",
            "Escrow",
            "Other",
            "Remaining",
            "Payments",
            "Last Payment",
            "Paid Off",
        ])?;

        for loan in &self.loans {
            csv.write_record([
                loan.name.clone(),
                loan.category.clone(),
                csv_amount(loan.original_amount),
                csv_amount(loan.total_paid),
                csv_amount(loan.principal_paid),
                csv_amount(loan.interest_paid),
                csv_amount(loan.escrow_paid),
                csv_amount(loan.other_paid),
                csv_amount(loan.remaining_amount),
                loan.payment_count.to_string(),
                loan.last_payment.map(|d| d.to_string()).unwrap_or_default(),
                loan.paid_off.to_string(),
            ])?;
        }

        csv.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Loan, LoanPayment};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn snapshot() -> LedgerSnapshot {
        let mut mortgage = Loan::new("Mortgage", "Housing", Money::from_cents(100_000), date(2024, 1, 1));
        mortgage.add_payment(LoanPayment::regular(
            date(2024, 2, 1),
            Money::from_cents(1000),
            Money::from_cents(500),
            Money::from_cents(200),
            Money::zero(),
        ));
        let mut car = Loan::new("Car Loan", "Car", Money::from_cents(5000), date(2023, 1, 1));
        car.add_payment(LoanPayment::principal_only(date(2024, 3, 1), Money::from_cents(5000)));

        LedgerSnapshot {
            loans: vec![mortgage, car],
            ..Default::default()
        }
    }

    #[test]
    fn test_generate_loans_report() {
        let report = LoansReport::generate(&snapshot());

        assert_eq!(report.loans.len(), 2);
        assert_eq!(report.total_original, Money::from_cents(105_000));
        assert_eq!(report.total_paid, Money::from_cents(6700));
        assert_eq!(report.total_interest, Money::from_cents(500));
        assert_eq!(report.total_remaining, Money::from_cents(99_000));
        assert_eq!(report.active().count(), 1);
    }

    #[test]
    fn test_format_and_csv() {
        let report = LoansReport::generate(&snapshot());

        let text = report.format_terminal(&MoneyFormat::default());
        assert!(text.contains("Car Loan"));
        assert!(text.contains("(paid off)"));
        assert!(text.contains("Active loans: 1 of 2"));

        let mut buf = Vec::new();
        report.export_csv(&mut buf).unwrap();
        let csv = String::from_utf8(buf).unwrap();
        assert!(csv.contains("Mortgage,Housing,1000.00,17.00,10.00,5.00,2.00,0.00,990.00,1,2024-02-01,false"));
    }

    #[test]
    fn test_no_loans() {
        let report = LoansReport::generate(&LedgerSnapshot::default());
        assert!(report.format_terminal(&MoneyFormat::default()).contains("No loans recorded."));
    }
}
