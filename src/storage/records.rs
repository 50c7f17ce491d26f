//! Record repositories for JSON storage
//!
//! Expenses, revenue, assets, and loans share one repository shape: an
//! id-keyed map behind a `RwLock`, loaded from and saved to a single file.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::path::PathBuf;
use std::sync::RwLock;

use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::TallyError;
use crate::models::{
    Asset, AssetId, Expense, ExpenseId, Loan, LoanId, RecordValidationError, Revenue, RevenueId,
};

use super::file_io::{read_json, write_json_atomic};

/// A persisted record kind
pub trait StoredRecord: Clone + Serialize + DeserializeOwned {
    type Id: Copy + Eq + Hash + fmt::Display;

    /// Human-readable entity name used in errors
    const ENTITY: &'static str;

    fn id(&self) -> Self::Id;

    fn name(&self) -> &str;

    /// Date the listing is ordered by
    fn date(&self) -> NaiveDate;

    /// Check whether a user-typed identifier refers to this record
    fn matches_id(&self, identifier: &str) -> bool;

    fn validate(&self) -> Result<(), RecordValidationError>;
}

impl StoredRecord for Expense {
    type Id = ExpenseId;
    const ENTITY: &'static str = "Expense";

    fn id(&self) -> ExpenseId {
        self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn date(&self) -> NaiveDate {
        self.date
    }
    fn matches_id(&self, identifier: &str) -> bool {
        self.id.matches(identifier)
    }
    fn validate(&self) -> Result<(), RecordValidationError> {
        Expense::validate(self)
    }
}

impl StoredRecord for Revenue {
    type Id = RevenueId;
    const ENTITY: &'static str = "Revenue";

    fn id(&self) -> RevenueId {
        self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn date(&self) -> NaiveDate {
        self.date
    }
    fn matches_id(&self, identifier: &str) -> bool {
        self.id.matches(identifier)
    }
    fn validate(&self) -> Result<(), RecordValidationError> {
        Revenue::validate(self)
    }
}

impl StoredRecord for Asset {
    type Id = AssetId;
    const ENTITY: &'static str = "Asset";

    fn id(&self) -> AssetId {
        self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn date(&self) -> NaiveDate {
        self.acquired
    }
    fn matches_id(&self, identifier: &str) -> bool {
        self.id.matches(identifier)
    }
    fn validate(&self) -> Result<(), RecordValidationError> {
        Asset::validate(self)
    }
}

impl StoredRecord for Loan {
    type Id = LoanId;
    const ENTITY: &'static str = "Loan";

    fn id(&self) -> LoanId {
        self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn date(&self) -> NaiveDate {
        self.start_date
    }
    fn matches_id(&self, identifier: &str) -> bool {
        self.id.matches(identifier)
    }
    fn validate(&self) -> Result<(), RecordValidationError> {
        Loan::validate(self)
    }
}

/// On-disk shape of a record file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "R: DeserializeOwned"))]
struct RecordFile<R> {
    #[serde(default)]
    records: Vec<R>,
}

impl<R> Default for RecordFile<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

/// Repository for one record kind
pub struct RecordRepository<R: StoredRecord> {
    path: PathBuf,
    data: RwLock<HashMap<R::Id, R>>,
}

impl<R: StoredRecord> RecordRepository<R> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load records from disk
    pub fn load(&self) -> Result<(), TallyError> {
        let file_data: RecordFile<R> = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| TallyError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for record in file_data.records {
            data.insert(record.id(), record);
        }
        tracing::debug!(entity = R::ENTITY, count = data.len(), "loaded records");

        Ok(())
    }

    /// Save records to disk in listing order
    pub fn save(&self) -> Result<(), TallyError> {
        let file_data = RecordFile {
            records: self.get_all()?,
        };
        write_json_atomic(&self.path, &file_data)
    }

    pub fn get(&self, id: R::Id) -> Result<Option<R>, TallyError> {
        let data = self
            .data
            .read()
            .map_err(|e| TallyError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// All records ordered by date, then name
    pub fn get_all(&self) -> Result<Vec<R>, TallyError> {
        let data = self
            .data
            .read()
            .map_err(|e| TallyError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut records: Vec<R> = data.values().cloned().collect();
        records.sort_by(|a, b| a.date().cmp(&b.date()).then_with(|| a.name().cmp(b.name())));
        Ok(records)
    }

    /// Find a record by id form or exact name
    ///
    /// An identifier that matches several records is rejected rather than
    /// picking one.
    pub fn find(&self, identifier: &str) -> Result<Option<R>, TallyError> {
        let all = self.get_all()?;
        let by_id: Vec<&R> = all.iter().filter(|r| r.matches_id(identifier)).collect();
        let candidates = if by_id.is_empty() {
            all.iter().filter(|r| r.name() == identifier).collect()
        } else {
            by_id
        };

        match candidates.as_slice() {
            [] => Ok(None),
            [one] => Ok(Some((**one).clone())),
            _ => Err(TallyError::Validation(format!(
                "'{}' matches {} {} records; use the id",
                identifier,
                candidates.len(),
                R::ENTITY.to_lowercase()
            ))),
        }
    }

    /// Insert or replace a record after validating it
    pub fn upsert(&self, record: R) -> Result<(), TallyError> {
        record.validate()?;

        let mut data = self
            .data
            .write()
            .map_err(|e| TallyError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.insert(record.id(), record);
        Ok(())
    }

    pub fn delete(&self, id: R::Id) -> Result<Option<R>, TallyError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| TallyError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(data.remove(&id))
    }

    /// Replace every record, validating all of them first
    pub fn replace_all(&self, records: Vec<R>) -> Result<(), TallyError> {
        for record in &records {
            record.validate()?;
        }

        let mut data = self
            .data
            .write()
            .map_err(|e| TallyError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for record in records {
            data.insert(record.id(), record);
        }
        Ok(())
    }

    pub fn count(&self) -> Result<usize, TallyError> {
        let data = self
            .data
            .read()
            .map_err(|e| TallyError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.len())
    }
}
