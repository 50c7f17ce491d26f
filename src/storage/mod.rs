//! Storage layer for Tally
//!
//! JSON file storage with atomic writes. The `Storage` coordinator owns one
//! repository per data file plus the audit logger, and hands the pure core a
//! `LedgerSnapshot` built from whatever is currently loaded.

pub mod categories;
pub mod file_io;
pub mod init;
pub mod records;

pub use categories::CategoryRepository;
pub use file_io::{read_json, write_json_atomic};
pub use init::initialize_storage;
pub use records::{RecordRepository, StoredRecord};

use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::TallyPaths;
use crate::error::TallyError;
use crate::models::{Asset, Expense, LedgerSnapshot, Loan, Revenue};

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: TallyPaths,
    audit: AuditLogger,
    pub categories: CategoryRepository,
    pub expenses: RecordRepository<Expense>,
    pub revenue: RecordRepository<Revenue>,
    pub assets: RecordRepository<Asset>,
    pub loans: RecordRepository<Loan>,
}

impl Storage {
    /// Create a storage coordinator; nothing is read until `load_all`
    pub fn new(paths: TallyPaths) -> Result<Self, TallyError> {
        paths.ensure_directories()?;

        Ok(Self {
            audit: AuditLogger::new(paths.audit_log()),
            categories: CategoryRepository::new(paths.categories_file()),
            expenses: RecordRepository::new(paths.expenses_file()),
            revenue: RecordRepository::new(paths.revenue_file()),
            assets: RecordRepository::new(paths.assets_file()),
            loans: RecordRepository::new(paths.loans_file()),
            paths,
        })
    }

    pub fn paths(&self) -> &TallyPaths {
        &self.paths
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load all data from disk
    pub fn load_all(&self) -> Result<(), TallyError> {
        self.categories.load()?;
        self.expenses.load()?;
        self.revenue.load()?;
        self.assets.load()?;
        self.loans.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), TallyError> {
        self.categories.save()?;
        self.expenses.save()?;
        self.revenue.save()?;
        self.assets.save()?;
        self.loans.save()?;
        tracing::info!(base = %self.paths.base_dir().display(), "saved ledger");
        Ok(())
    }

    /// An immutable copy of everything currently loaded
    pub fn snapshot(&self) -> Result<LedgerSnapshot, TallyError> {
        Ok(LedgerSnapshot {
            categories: self.categories.tree()?,
            expenses: self.expenses.get_all()?,
            revenue: self.revenue.get_all()?,
            assets: self.assets.get_all()?,
            loans: self.loans.get_all()?,
        })
    }

    /// Replace every repository's contents with `snapshot`
    ///
    /// All records are validated before anything is replaced.
    pub fn restore(&self, snapshot: LedgerSnapshot) -> Result<(), TallyError> {
        snapshot.categories.validate()?;
        for expense in &snapshot.expenses {
            expense.validate()?;
        }
        for revenue in &snapshot.revenue {
            revenue.validate()?;
        }
        for asset in &snapshot.assets {
            asset.validate()?;
        }
        for loan in &snapshot.loans {
            loan.validate()?;
        }

        self.categories.replace(snapshot.categories)?;
        self.expenses.replace_all(snapshot.expenses)?;
        self.revenue.replace_all(snapshot.revenue)?;
        self.assets.replace_all(snapshot.assets)?;
        self.loans.replace_all(snapshot.loans)?;
        Ok(())
    }

    /// Record a creation in the audit log
    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), TallyError> {
        self.audit.log(&AuditEntry::create(
            entity_type,
            entity_id,
            entity_name,
            entity,
        ))
    }

    /// Record an update in the audit log
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> Result<(), TallyError> {
        self.audit.log(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
        ))
    }

    /// Record a deletion in the audit log
    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), TallyError> {
        self.audit.log(&AuditEntry::delete(
            entity_type,
            entity_id,
            entity_name,
            entity,
        ))
    }
}
