//! Transaction records
//!
//! Expenses and revenue are the day-to-day records of the ledger. Both carry
//! a free-text category label that is resolved against the category tree at
//! report time, so renaming or deleting a category never rewrites history.
//!
//! [`Transaction`] is the uniform `(date, amount, label)` view every record
//! kind is reduced to before aggregation.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{ExpenseId, RevenueId};
use super::money::Money;

/// A dated amount with the label used to pick its budget category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub amount: Money,
    pub category_label: String,
}

impl Transaction {
    pub fn new(date: NaiveDate, amount: Money, category_label: impl Into<String>) -> Self {
        Self {
            date,
            amount,
            category_label: category_label.into(),
        }
    }
}

/// How often a bill or subscription recurs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BillFrequency {
    Weekly,
    #[default]
    Monthly,
    Quarterly,
    Yearly,
}

impl BillFrequency {
    /// Parse a frequency name (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            "quarterly" => Some(Self::Quarterly),
            "yearly" | "annual" | "annually" => Some(Self::Yearly),
            _ => None,
        }
    }

    /// Approximate number of occurrences per month
    pub fn per_month(&self) -> f64 {
        match self {
            Self::Weekly => 52.0 / 12.0,
            Self::Monthly => 1.0,
            Self::Quarterly => 1.0 / 3.0,
            Self::Yearly => 1.0 / 12.0,
        }
    }
}

impl fmt::Display for BillFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weekly => write!(f, "Weekly"),
            Self::Monthly => write!(f, "Monthly"),
            Self::Quarterly => write!(f, "Quarterly"),
            Self::Yearly => write!(f, "Yearly"),
        }
    }
}

/// Kind-specific details of an expense
///
/// Persisted with an explicit `"type"` tag so older records keep decoding as
/// new variants are added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExpenseDetails {
    /// A plain purchase
    #[default]
    General,
    /// A recurring bill from a known biller
    Bill {
        biller: String,
        #[serde(default)]
        frequency: BillFrequency,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        due_date: Option<NaiveDate>,
    },
    /// A fuel fill-up
    Fuel {
        volume: f64,
        price_per_unit: Money,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        odometer: Option<u32>,
    },
    /// A subscription service charge
    Subscription {
        service: String,
        #[serde(default)]
        frequency: BillFrequency,
    },
}

impl ExpenseDetails {
    /// Short label for listings
    pub fn kind(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Bill { .. } => "bill",
            Self::Fuel { .. } => "fuel",
            Self::Subscription { .. } => "subscription",
        }
    }

    /// Recurrence of the expense, if it is a recurring kind
    pub fn frequency(&self) -> Option<BillFrequency> {
        match self {
            Self::Bill { frequency, .. } | Self::Subscription { frequency, .. } => Some(*frequency),
            Self::General | Self::Fuel { .. } => None,
        }
    }
}

/// Money going out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub name: String,
    pub date: NaiveDate,
    /// Amount spent (positive)
    pub amount: Money,
    /// Category label resolved against the category tree
    pub category: String,
    #[serde(default)]
    pub details: ExpenseDetails,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

impl Expense {
    /// Create a new general expense
    pub fn new(
        name: impl Into<String>,
        date: NaiveDate,
        amount: Money,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: ExpenseId::new(),
            name: name.into(),
            date,
            amount,
            category: category.into(),
            details: ExpenseDetails::General,
            notes: String::new(),
            created_at: Utc::now(),
        }
    }

    /// Attach kind-specific details
    pub fn with_details(mut self, details: ExpenseDetails) -> Self {
        self.details = details;
        self
    }

    /// The uniform view used for aggregation
    pub fn to_transaction(&self) -> Transaction {
        Transaction::new(self.date, self.amount, self.category.clone())
    }

    /// Validate the expense
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        validate_record(&self.name, self.amount, &self.category)?;
        if let ExpenseDetails::Fuel { volume, price_per_unit, .. } = &self.details {
            if !volume.is_finite() || *volume <= 0.0 {
                return Err(RecordValidationError::InvalidDetails(
                    "fuel volume must be positive".into(),
                ));
            }
            if price_per_unit.is_negative() {
                return Err(RecordValidationError::InvalidDetails(
                    "fuel price cannot be negative".into(),
                ));
            }
        }
        Ok(())
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} ({})", self.date, self.name, self.amount, self.category)
    }
}

/// Money coming in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revenue {
    pub id: RevenueId,
    pub name: String,
    pub date: NaiveDate,
    /// Amount received (positive)
    pub amount: Money,
    /// Source label such as "Salary" or "Interest"
    pub source: String,
    pub created_at: DateTime<Utc>,
}

impl Revenue {
    pub fn new(
        name: impl Into<String>,
        date: NaiveDate,
        amount: Money,
        source: impl Into<String>,
    ) -> Self {
        Self {
            id: RevenueId::new(),
            name: name.into(),
            date,
            amount,
            source: source.into(),
            created_at: Utc::now(),
        }
    }

    pub fn to_transaction(&self) -> Transaction {
        Transaction::new(self.date, self.amount, self.source.clone())
    }

    pub fn validate(&self) -> Result<(), RecordValidationError> {
        validate_record(&self.name, self.amount, &self.source)
    }
}

pub(crate) fn validate_record(
    name: &str,
    amount: Money,
    label: &str,
) -> Result<(), RecordValidationError> {
    if name.trim().is_empty() {
        return Err(RecordValidationError::EmptyName);
    }
    if label.trim().is_empty() {
        return Err(RecordValidationError::EmptyLabel);
    }
    if amount.is_negative() {
        return Err(RecordValidationError::NegativeAmount);
    }
    Ok(())
}

/// Validation errors for ledger records
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    EmptyName,
    EmptyLabel,
    NegativeAmount,
    InvalidDetails(String),
}

impl fmt::Display for RecordValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Name cannot be empty"),
            Self::EmptyLabel => write!(f, "Category label cannot be empty"),
            Self::NegativeAmount => write!(f, "Amount cannot be negative"),
            Self::InvalidDetails(msg) => write!(f, "Invalid details: {}", msg),
        }
    }
}

impl std::error::Error for RecordValidationError {}

impl From<RecordValidationError> for crate::error::TallyError {
    fn from(err: RecordValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}
