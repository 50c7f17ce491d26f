//! Asset model
//!
//! An asset (house, car, equipment) has a current value and a list of
//! payments made toward it. Its `kind` is the label payments are budgeted
//! under; categories pick it up through their alias name.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{AssetId, PaymentId};
use super::money::Money;
use super::transaction::{validate_record, RecordValidationError, Transaction};

/// A payment made toward an asset (maintenance, installments, fees)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetPayment {
    pub id: PaymentId,
    pub date: NaiveDate,
    pub amount: Money,
    #[serde(default)]
    pub memo: String,
}

impl AssetPayment {
    pub fn new(date: NaiveDate, amount: Money) -> Self {
        Self {
            id: PaymentId::new(),
            date,
            amount,
            memo: String::new(),
        }
    }
}

/// Something owned that holds value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub id: AssetId,
    pub name: String,
    /// Asset type, matched against category alias names
    pub kind: String,
    /// Current estimated value
    pub value: Money,
    pub acquired: NaiveDate,
    #[serde(default)]
    pub payments: Vec<AssetPayment>,
    pub created_at: DateTime<Utc>,
}

impl Asset {
    pub fn new(
        name: impl Into<String>,
        kind: impl Into<String>,
        value: Money,
        acquired: NaiveDate,
    ) -> Self {
        Self {
            id: AssetId::new(),
            name: name.into(),
            kind: kind.into(),
            value,
            acquired,
            payments: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn add_payment(&mut self, payment: AssetPayment) {
        self.payments.push(payment);
    }

    pub fn remove_payment(&mut self, id: PaymentId) -> Option<AssetPayment> {
        let index = self.payments.iter().position(|p| p.id == id)?;
        Some(self.payments.remove(index))
    }

    /// Sum of all payments made toward the asset
    pub fn total_paid(&self) -> Money {
        self.payments.iter().map(|p| p.amount).sum()
    }

    /// One transaction per payment, labelled with the asset kind
    pub fn payment_transactions(&self) -> Vec<Transaction> {
        self.payments
            .iter()
            .map(|p| Transaction::new(p.date, p.amount, self.kind.clone()))
            .collect()
    }

    pub fn validate(&self) -> Result<(), RecordValidationError> {
        validate_record(&self.name, self.value, &self.kind)?;
        if self.payments.iter().any(|p| p.amount.is_negative()) {
            return Err(RecordValidationError::NegativeAmount);
        }
        Ok(())
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] {}", self.name, self.kind, self.value)
    }
}
