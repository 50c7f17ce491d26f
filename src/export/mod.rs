//! Export module for Tally
//!
//! - CSV: the classified transaction list (spreadsheet-compatible)
//! - JSON: machine-readable full ledger export, also used for import
//! - YAML: human-readable full ledger export, also used for import

pub mod csv;
pub mod json;
pub mod yaml;

pub use csv::{classified_rows, export_transactions_csv, ClassifiedRow, TransactionSource};
pub use json::{
    export_full_json, import_from_json, ExportMetadata, LedgerExport, EXPORT_SCHEMA_VERSION,
};
pub use yaml::{export_full_yaml, import_from_yaml};
