//! JSON export and import
//!
//! A full ledger export carries a schema version and a metadata block next to
//! the snapshot itself. Imports are checked against the schema version and
//! fully validated before anything on disk is replaced.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::audit::{AuditEntry, EntityType};
use crate::error::{TallyError, TallyResult};
use crate::models::LedgerSnapshot;
use crate::storage::Storage;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Full ledger export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    pub exported_at: DateTime<Utc>,

    /// Version of tally that wrote the export
    pub app_version: String,

    pub metadata: ExportMetadata,

    pub ledger: LedgerSnapshot,
}

/// Counts and date range, for a reader skimming the file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub category_count: usize,
    pub expense_count: usize,
    pub revenue_count: usize,
    pub asset_count: usize,
    pub loan_count: usize,
    /// Earliest dated record
    pub earliest_record: Option<String>,
    /// Latest dated record
    pub latest_record: Option<String>,
}

impl ExportMetadata {
    pub fn from_snapshot(snapshot: &LedgerSnapshot) -> Self {
        let dates: Vec<_> = snapshot
            .expenses
            .iter()
            .map(|e| e.date)
            .chain(snapshot.revenue.iter().map(|r| r.date))
            .chain(snapshot.assets.iter().flat_map(|a| a.payments.iter().map(|p| p.date)))
            .chain(snapshot.loans.iter().flat_map(|l| l.payments.iter().map(|p| p.date)))
            .collect();

        Self {
            category_count: snapshot.categories.len(),
            expense_count: snapshot.expenses.len(),
            revenue_count: snapshot.revenue.len(),
            asset_count: snapshot.assets.len(),
            loan_count: snapshot.loans.len(),
            earliest_record: dates.iter().min().map(|d| d.to_string()),
            latest_record: dates.iter().max().map(|d| d.to_string()),
        }
    }
}

impl LedgerExport {
    pub fn from_snapshot(ledger: LedgerSnapshot) -> Self {
        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            metadata: ExportMetadata::from_snapshot(&ledger),
            ledger,
        }
    }

    pub fn from_storage(storage: &Storage) -> TallyResult<Self> {
        Ok(Self::from_snapshot(storage.snapshot()?))
    }

    /// Check the schema version and every record in the ledger
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            ));
        }

        self.ledger
            .categories
            .validate()
            .map_err(|e| format!("Category tree: {}", e))?;

        for expense in &self.ledger.expenses {
            expense
                .validate()
                .map_err(|e| format!("Expense '{}': {}", expense.name, e))?;
        }
        for revenue in &self.ledger.revenue {
            revenue
                .validate()
                .map_err(|e| format!("Revenue '{}': {}", revenue.name, e))?;
        }
        for asset in &self.ledger.assets {
            asset
                .validate()
                .map_err(|e| format!("Asset '{}': {}", asset.name, e))?;
        }
        for loan in &self.ledger.loans {
            loan.validate()
                .map_err(|e| format!("Loan '{}': {}", loan.name, e))?;
        }

        Ok(())
    }

    /// Replace the stored ledger with this export and record it in the audit log
    pub fn apply(self, storage: &Storage) -> TallyResult<()> {
        self.validate().map_err(TallyError::Import)?;

        let metadata = self.metadata.clone();
        storage.restore(self.ledger)?;
        storage.save_all()?;
        storage.audit().log(&AuditEntry::create(
            EntityType::Ledger,
            self.exported_at.to_rfc3339(),
            Some(format!("import of {} export", self.app_version)),
            &metadata,
        ))?;

        tracing::info!(
            expenses = metadata.expense_count,
            loans = metadata.loan_count,
            "imported ledger"
        );
        Ok(())
    }
}

/// Write the full ledger as JSON
pub fn export_full_json<W: Write + ?Sized>(
    storage: &Storage,
    writer: &mut W,
    pretty: bool,
) -> TallyResult<()> {
    let export = LedgerExport::from_storage(storage)?;

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| TallyError::Export(e.to_string()))?;

    Ok(())
}

/// Parse and validate a JSON export
pub fn import_from_json(json_str: &str) -> TallyResult<LedgerExport> {
    let export: LedgerExport =
        serde_json::from_str(json_str).map_err(|e| TallyError::Import(e.to_string()))?;

    export.validate().map_err(TallyError::Import)?;

    Ok(export)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::TallyPaths;
    use crate::models::{Expense, Loan, LoanPayment, Money};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = TallyPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn populate(storage: &Storage) {
        storage
            .categories
            .update(|tree| {
                let car = tree.add_root("Car")?;
                tree.add_child(car, "Gas")?;
                Ok(())
            })
            .unwrap();
        storage
            .expenses
            .upsert(Expense::new("Fill up", date(2024, 11, 1), Money::from_cents(3541), "Gas"))
            .unwrap();
        let mut loan = Loan::new("Car Loan", "Car", Money::from_cents(1_000_000), date(2024, 1, 1));
        loan.add_payment(LoanPayment::principal_only(date(2024, 12, 1), Money::from_cents(5000)));
        storage.loans.upsert(loan).unwrap();
    }

    #[test]
    fn test_full_export() {
        let (_temp_dir, storage) = create_test_storage();
        populate(&storage);

        let export = LedgerExport::from_storage(&storage).unwrap();

        assert_eq!(export.schema_version, EXPORT_SCHEMA_VERSION);
        assert_eq!(export.metadata.category_count, 2);
        assert_eq!(export.metadata.expense_count, 1);
        assert_eq!(export.metadata.earliest_record.as_deref(), Some("2024-11-01"));
        assert_eq!(export.metadata.latest_record.as_deref(), Some("2024-12-01"));
        assert!(export.validate().is_ok());
    }

    #[test]
    fn test_json_roundtrip_into_fresh_storage() {
        let (_source_dir, source) = create_test_storage();
        populate(&source);

        let mut output = Vec::new();
        export_full_json(&source, &mut output, true).unwrap();
        let imported = import_from_json(&String::from_utf8(output).unwrap()).unwrap();

        let (_target_dir, target) = create_test_storage();
        imported.apply(&target).unwrap();

        assert_eq!(target.snapshot().unwrap(), source.snapshot().unwrap());
        let entries = target.audit().read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].entity_type, EntityType::Ledger);
    }

    #[test]
    fn test_schema_mismatch_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let mut export = LedgerExport::from_storage(&storage).unwrap();
        export.schema_version = "0.1.0".into();

        let json = serde_json::to_string(&export).unwrap();
        let err = import_from_json(&json).unwrap_err();
        assert!(err.to_string().contains("Schema version mismatch"));
    }

    #[test]
    fn test_invalid_record_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        populate(&storage);
        let mut export = LedgerExport::from_storage(&storage).unwrap();
        export.ledger.expenses[0].amount = Money::from_cents(-1);

        assert!(export.validate().unwrap_err().contains("Fill up"));
    }
}
