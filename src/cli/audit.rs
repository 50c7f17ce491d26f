//! Audit log CLI command

use crate::audit::EntityType;
use crate::error::{TallyError, TallyResult};
use crate::storage::Storage;

/// Print the most recent audit entries, oldest first
pub fn handle_audit_command(storage: &Storage, count: usize, entity: Option<&str>) -> TallyResult<()> {
    let entity_type = entity
        .map(|e| {
            EntityType::parse(e).ok_or_else(|| {
                TallyError::Validation(format!("Unknown entity type: {}", e))
            })
        })
        .transpose()?;

    let entries = storage.audit().read_recent(count, entity_type)?;
    if entries.is_empty() {
        println!("No audit entries found.");
        return Ok(());
    }

    for entry in &entries {
        println!("{}", entry.format_human_readable());
    }

    Ok(())
}
