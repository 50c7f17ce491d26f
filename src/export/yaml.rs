//! YAML export and import
//!
//! Same document as the JSON export, behind a short comment header.

use std::io::Write;

use crate::error::{TallyError, TallyResult};
use crate::export::json::LedgerExport;
use crate::storage::Storage;

/// Write the full ledger as YAML
pub fn export_full_yaml<W: Write + ?Sized>(storage: &Storage, writer: &mut W) -> TallyResult<()> {
    let export = LedgerExport::from_storage(storage)?;

    let header = format!(
        "# Tally ledger export\n# Generated: {}\n# App Version: {}\n#\n# Restore with `tally import yaml <file>`.\n\n",
        export.exported_at, export.app_version
    );
    writer
        .write_all(header.as_bytes())
        .map_err(|e| TallyError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, &export).map_err(|e| TallyError::Export(e.to_string()))?;

    Ok(())
}

/// Parse and validate a YAML export; comment lines are ignored by the parser
pub fn import_from_yaml(yaml_str: &str) -> TallyResult<LedgerExport> {
    let export: LedgerExport =
        serde_yaml::from_str(yaml_str).map_err(|e| TallyError::Import(e.to_string()))?;

    export.validate().map_err(TallyError::Import)?;

    Ok(export)
}
