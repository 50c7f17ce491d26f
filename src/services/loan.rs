//! Loan ledger arithmetic
//!
//! Derives paid-to-date figures and the remaining balance of a loan from its
//! payment list. Nothing here is stored: every figure is recomputed from the
//! payments, so edits to the list are always reflected.
//!
//! A loan has no status field. "Paid off" is derived from the remaining
//! balance, and overpayment simply drives the balance negative.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{Loan, LoanId, LoanPayment, Money};

/// Read-only view over a loan's payment history
#[derive(Debug, Clone, Copy)]
pub struct LoanLedger<'a> {
    loan: &'a Loan,
}

impl<'a> LoanLedger<'a> {
    pub fn new(loan: &'a Loan) -> Self {
        Self { loan }
    }

    pub fn loan(&self) -> &'a Loan {
        self.loan
    }

    /// Total cash paid across all payments
    pub fn total_paid(&self) -> Money {
        self.loan.payments.iter().map(|p| p.kind.total()).sum()
    }

    /// Principal repaid across all payments
    pub fn principal_paid(&self) -> Money {
        self.loan.payments.iter().map(|p| p.kind.principal()).sum()
    }

    /// Interest paid; principal-only payments contribute nothing
    pub fn interest_paid(&self) -> Money {
        self.loan.payments.iter().map(|p| p.kind.interest()).sum()
    }

    pub fn escrow_paid(&self) -> Money {
        self.loan.payments.iter().map(|p| p.kind.escrow()).sum()
    }

    pub fn other_paid(&self) -> Money {
        self.loan.payments.iter().map(|p| p.kind.other()).sum()
    }

    /// Original amount minus principal repaid; negative after overpayment
    pub fn remaining_amount(&self) -> Money {
        self.loan.original_amount - self.principal_paid()
    }

    pub fn is_paid_off(&self) -> bool {
        self.remaining_amount() <= Money::zero()
    }

    /// Payments ordered by date; same-day payments keep insertion order
    pub fn payments_by_date(&self) -> Vec<&'a LoanPayment> {
        let mut payments: Vec<&LoanPayment> = self.loan.payments.iter().collect();
        payments.sort_by_key(|p| p.date);
        payments
    }

    pub fn last_payment_date(&self) -> Option<NaiveDate> {
        self.loan.payments.iter().map(|p| p.date).max()
    }

    /// Fraction of the original principal repaid, 0.0 for a zero-amount loan
    pub fn progress(&self) -> f64 {
        if self.loan.original_amount.is_zero() {
            return 0.0;
        }
        self.principal_paid().cents() as f64 / self.loan.original_amount.cents() as f64
    }

    /// Snapshot of every derived figure
    pub fn summary(&self) -> LoanSummary {
        LoanSummary {
            loan_id: self.loan.id,
            name: self.loan.name.clone(),
            category: self.loan.category.clone(),
            original_amount: self.loan.original_amount,
            total_paid: self.total_paid(),
            principal_paid: self.principal_paid(),
            interest_paid: self.interest_paid(),
            escrow_paid: self.escrow_paid(),
            other_paid: self.other_paid(),
            remaining_amount: self.remaining_amount(),
            payment_count: self.loan.payments.len(),
            last_payment: self.last_payment_date(),
            paid_off: self.is_paid_off(),
        }
    }
}

/// Derived figures for one loan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoanSummary {
    pub loan_id: LoanId,
    pub name: String,
    pub category: String,
    pub original_amount: Money,
    pub total_paid: Money,
    pub principal_paid: Money,
    pub interest_paid: Money,
    pub escrow_paid: Money,
    pub other_paid: Money,
    pub remaining_amount: Money,
    pub payment_count: usize,
    pub last_payment: Option<NaiveDate>,
    pub paid_off: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn mortgage() -> Loan {
        Loan::new("Mortgage", "Housing", Money::from_cents(100_000), date(2024, 1, 1))
    }

    #[test]
    fn test_single_regular_payment() {
        let mut loan = mortgage();
        loan.add_payment(LoanPayment::regular(
            date(2024, 2, 1),
            Money::from_cents(1000),
            Money::from_cents(500),
            Money::from_cents(200),
            Money::zero(),
        ));
        let ledger = LoanLedger::new(&loan);

        assert_eq!(ledger.total_paid(), Money::from_cents(1700));
        assert_eq!(ledger.principal_paid(), Money::from_cents(1000));
        assert_eq!(ledger.interest_paid(), Money::from_cents(500));
        assert_eq!(ledger.escrow_paid(), Money::from_cents(200));
        assert_eq!(ledger.remaining_amount(), Money::from_cents(99_000));
        assert!(!ledger.is_paid_off());
    }

    #[test]
    fn test_no_payments() {
        let loan = mortgage();
        let ledger = LoanLedger::new(&loan);

        assert_eq!(ledger.total_paid(), Money::zero());
        assert_eq!(ledger.remaining_amount(), loan.original_amount);
        assert_eq!(ledger.last_payment_date(), None);
        assert_eq!(ledger.progress(), 0.0);
    }

    #[test]
    fn test_principal_only_has_no_interest() {
        let mut loan = mortgage();
        loan.add_payment(LoanPayment::principal_only(date(2024, 3, 1), Money::from_cents(20_000)));
        let ledger = LoanLedger::new(&loan);

        assert_eq!(ledger.total_paid(), Money::from_cents(20_000));
        assert_eq!(ledger.interest_paid(), Money::zero());
        assert_eq!(ledger.remaining_amount(), Money::from_cents(80_000));
        assert_eq!(ledger.progress(), 0.2);
    }

    #[test]
    fn test_overpayment_goes_negative() {
        let mut loan = mortgage();
        loan.add_payment(LoanPayment::principal_only(date(2024, 3, 1), Money::from_cents(100_000)));
        assert!(LoanLedger::new(&loan).is_paid_off());
        assert_eq!(LoanLedger::new(&loan).remaining_amount(), Money::zero());

        loan.add_payment(LoanPayment::principal_only(date(2024, 4, 1), Money::from_cents(250)));
        let ledger = LoanLedger::new(&loan);
        assert_eq!(ledger.remaining_amount(), Money::from_cents(-250));
        assert!(ledger.is_paid_off());
    }

    #[test]
    fn test_payments_by_date_sorts_stably() {
        let mut loan = mortgage();
        let late = LoanPayment::principal_only(date(2024, 5, 1), Money::from_cents(1));
        let early_a = LoanPayment::principal_only(date(2024, 2, 1), Money::from_cents(2));
        let early_b = LoanPayment::principal_only(date(2024, 2, 1), Money::from_cents(3));
        loan.add_payment(late.clone());
        loan.add_payment(early_a.clone());
        loan.add_payment(early_b.clone());

        let ledger = LoanLedger::new(&loan);
        let ordered: Vec<_> = ledger.payments_by_date().into_iter().map(|p| p.id).collect();
        assert_eq!(ordered, vec![early_a.id, early_b.id, late.id]);
        assert_eq!(ledger.last_payment_date(), Some(date(2024, 5, 1)));
    }

    #[test]
    fn test_summary() {
        let mut loan = mortgage();
        loan.add_payment(LoanPayment::regular(
            date(2024, 2, 1),
            Money::from_cents(1000),
            Money::from_cents(500),
            Money::from_cents(200),
            Money::from_cents(25),
        ));
        let summary = LoanLedger::new(&loan).summary();

        assert_eq!(summary.total_paid, Money::from_cents(1725));
        assert_eq!(summary.other_paid, Money::from_cents(25));
        assert_eq!(summary.payment_count, 1);
        assert!(!summary.paid_off);
    }
}
