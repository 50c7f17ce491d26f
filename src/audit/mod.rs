//! Audit log
//!
//! Every create, update, and delete made through the services is appended
//! to `audit.log` with the record's before/after state.
//!
//! - `AuditEntry`: one operation on one record.
//! - `AuditLogger`: appends entries as JSON lines and reads them back.
//! - `generate_diff`: human-readable summary of what an update changed.

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
