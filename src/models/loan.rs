//! Loan and loan payment models
//!
//! A loan owns its payments; payments keep insertion order and are not
//! guaranteed to be sorted by date. Each payment is either a full scheduled
//! payment or an extra principal-only payment. Balances are derived from the
//! payment list on demand, see [`crate::services::loan`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{LoanId, PaymentId};
use super::money::Money;
use super::transaction::RecordValidationError;

/// The two shapes a loan payment can take
///
/// Persisted with an explicit `"type"` tag; both variants must keep decoding
/// unchanged as the schema evolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LoanPaymentKind {
    /// A scheduled payment split into its components
    Regular {
        principal: Money,
        interest: Money,
        escrow: Money,
        other: Money,
    },
    /// An extra payment applied entirely to principal
    PrincipalOnly { principal: Money },
}

impl LoanPaymentKind {
    /// Total cash paid
    pub fn total(&self) -> Money {
        match self {
            Self::Regular {
                principal,
                interest,
                escrow,
                other,
            } => *principal + *interest + *escrow + *other,
            Self::PrincipalOnly { principal } => *principal,
        }
    }

    /// Portion that reduces the balance
    pub fn principal(&self) -> Money {
        match self {
            Self::Regular { principal, .. } | Self::PrincipalOnly { principal } => *principal,
        }
    }

    pub fn interest(&self) -> Money {
        match self {
            Self::Regular { interest, .. } => *interest,
            Self::PrincipalOnly { .. } => Money::zero(),
        }
    }

    pub fn escrow(&self) -> Money {
        match self {
            Self::Regular { escrow, .. } => *escrow,
            Self::PrincipalOnly { .. } => Money::zero(),
        }
    }

    pub fn other(&self) -> Money {
        match self {
            Self::Regular { other, .. } => *other,
            Self::PrincipalOnly { .. } => Money::zero(),
        }
    }

    /// Portion that counts as spending (everything except principal)
    pub fn non_principal(&self) -> Money {
        self.total() - self.principal()
    }

    pub fn is_principal_only(&self) -> bool {
        matches!(self, Self::PrincipalOnly { .. })
    }
}

/// A single payment against a loan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanPayment {
    pub id: PaymentId,
    pub date: NaiveDate,
    #[serde(flatten)]
    pub kind: LoanPaymentKind,
}

impl LoanPayment {
    pub fn new(date: NaiveDate, kind: LoanPaymentKind) -> Self {
        Self {
            id: PaymentId::new(),
            date,
            kind,
        }
    }

    /// A scheduled payment
    pub fn regular(
        date: NaiveDate,
        principal: Money,
        interest: Money,
        escrow: Money,
        other: Money,
    ) -> Self {
        Self::new(
            date,
            LoanPaymentKind::Regular {
                principal,
                interest,
                escrow,
                other,
            },
        )
    }

    /// An extra principal payment
    pub fn principal_only(date: NaiveDate, principal: Money) -> Self {
        Self::new(date, LoanPaymentKind::PrincipalOnly { principal })
    }

    pub fn total(&self) -> Money {
        self.kind.total()
    }

    pub fn principal(&self) -> Money {
        self.kind.principal()
    }

    /// Check that no component is negative
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        let parts = [
            self.kind.principal(),
            self.kind.interest(),
            self.kind.escrow(),
            self.kind.other(),
        ];
        if parts.iter().any(|p| p.is_negative()) {
            return Err(RecordValidationError::NegativeAmount);
        }
        Ok(())
    }
}

impl fmt::Display for LoanPayment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            LoanPaymentKind::Regular { .. } => write!(f, "{} payment {}", self.date, self.total()),
            LoanPaymentKind::PrincipalOnly { principal } => {
                write!(f, "{} principal-only {}", self.date, principal)
            }
        }
    }
}

/// A loan such as a mortgage or car loan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    pub id: LoanId,
    pub name: String,
    /// Category label the loan's interest and fees are budgeted under
    pub category: String,
    pub original_amount: Money,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub payments: Vec<LoanPayment>,
    pub created_at: DateTime<Utc>,
}

impl Loan {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        original_amount: Money,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            id: LoanId::new(),
            name: name.into(),
            category: category.into(),
            original_amount,
            start_date,
            payments: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Record a payment; payments beyond the balance are accepted
    pub fn add_payment(&mut self, payment: LoanPayment) {
        self.payments.push(payment);
    }

    /// Remove a payment, returning it if it existed
    pub fn remove_payment(&mut self, id: PaymentId) -> Option<LoanPayment> {
        let index = self.payments.iter().position(|p| p.id == id)?;
        Some(self.payments.remove(index))
    }

    pub fn validate(&self) -> Result<(), RecordValidationError> {
        super::transaction::validate_record(&self.name, self.original_amount, &self.category)?;
        self.payments.iter().try_for_each(LoanPayment::validate)
    }
}

impl fmt::Display for Loan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.original_amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_regular_totals() {
        let kind = LoanPaymentKind::Regular {
            principal: Money::from_cents(1000),
            interest: Money::from_cents(500),
            escrow: Money::from_cents(200),
            other: Money::zero(),
        };
        assert_eq!(kind.total(), Money::from_cents(1700));
        assert_eq!(kind.principal(), Money::from_cents(1000));
        assert_eq!(kind.non_principal(), Money::from_cents(700));
        assert!(!kind.is_principal_only());
    }

    #[test]
    fn test_principal_only_totals() {
        let kind = LoanPaymentKind::PrincipalOnly {
            principal: Money::from_cents(5000),
        };
        assert_eq!(kind.total(), Money::from_cents(5000));
        assert_eq!(kind.interest(), Money::zero());
        assert_eq!(kind.non_principal(), Money::zero());
    }

    #[test]
    fn test_payment_round_trip_keeps_tag() {
        let regular = LoanPayment::regular(
            date(2024, 1, 1),
            Money::from_cents(1000),
            Money::from_cents(500),
            Money::from_cents(200),
            Money::from_cents(15),
        );
        let json = serde_json::to_value(&regular).unwrap();
        assert_eq!(json["type"], "regular");
        assert_eq!(json["escrow"], 200);
        let decoded: LoanPayment = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, regular);

        let extra = LoanPayment::principal_only(date(2024, 1, 15), Money::from_cents(2500));
        let json = serde_json::to_string(&extra).unwrap();
        assert!(json.contains(r#""type":"principal_only""#));
        let decoded: LoanPayment = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, extra);
    }

    #[test]
    fn test_remove_payment() {
        let mut loan = Loan::new("Car", "Car", Money::from_cents(2_000_000), date(2024, 1, 1));
        let payment = LoanPayment::principal_only(date(2024, 2, 1), Money::from_cents(100));
        let id = payment.id;
        loan.add_payment(payment);

        assert!(loan.remove_payment(id).is_some());
        assert!(loan.remove_payment(id).is_none());
        assert!(loan.payments.is_empty());
    }

    #[test]
    fn test_negative_component_rejected() {
        let payment = LoanPayment::regular(
            date(2024, 1, 1),
            Money::from_cents(1000),
            Money::from_cents(-1),
            Money::zero(),
            Money::zero(),
        );
        assert_eq!(payment.validate(), Err(RecordValidationError::NegativeAmount));
    }
}
