//! CLI commands for data export and import

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::Subcommand;

use crate::config::Settings;
use crate::error::{TallyError, TallyResult};
use crate::export::{
    export_full_json, export_full_yaml, export_transactions_csv, import_from_json,
    import_from_yaml, LedgerExport,
};
use crate::storage::Storage;

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Full ledger as JSON (importable)
    Json {
        /// Output file; stdout if omitted
        output: Option<PathBuf>,
        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Full ledger as YAML (importable)
    Yaml {
        output: Option<PathBuf>,
    },

    /// Every transaction with the category it resolves to
    Csv {
        output: Option<PathBuf>,
    },
}

/// Import subcommands
#[derive(Subcommand, Debug)]
pub enum ImportCommands {
    /// Restore a JSON export
    Json {
        file: PathBuf,
        /// Replace a ledger that already holds data
        #[arg(long)]
        force: bool,
    },

    /// Restore a YAML export
    Yaml {
        file: PathBuf,
        #[arg(long)]
        force: bool,
    },
}

fn with_output<F>(output: Option<&Path>, write: F) -> TallyResult<()>
where
    F: FnOnce(&mut dyn Write) -> TallyResult<()>,
{
    match output {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                TallyError::Export(format!("Failed to create file {}: {}", path.display(), e))
            })?;
            let mut writer = BufWriter::new(file);
            write(&mut writer)?;
            writer.flush()?;
            eprintln!("Exported to: {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            write(&mut lock)?;
            writeln!(lock)?;
        }
    }
    Ok(())
}

/// Handle export commands
pub fn handle_export_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ExportCommands,
) -> TallyResult<()> {
    match cmd {
        ExportCommands::Json { output, pretty } => {
            with_output(output.as_deref(), |w| export_full_json(storage, w, pretty))
        }
        ExportCommands::Yaml { output } => {
            with_output(output.as_deref(), |w| export_full_yaml(storage, w))
        }
        ExportCommands::Csv { output } => {
            let snapshot = storage.snapshot()?;
            with_output(output.as_deref(), |w| {
                export_transactions_csv(&snapshot, &settings.other_category, w)
            })
        }
    }
}

fn read_file(path: &Path) -> TallyResult<String> {
    fs::read_to_string(path)
        .map_err(|e| TallyError::Import(format!("Failed to read {}: {}", path.display(), e)))
}

/// Handle import commands
pub fn handle_import_command(storage: &Storage, cmd: ImportCommands) -> TallyResult<()> {
    let (export, force): (LedgerExport, bool) = match cmd {
        ImportCommands::Json { file, force } => (import_from_json(&read_file(&file)?)?, force),
        ImportCommands::Yaml { file, force } => (import_from_yaml(&read_file(&file)?)?, force),
    };

    if !force && !storage.snapshot()?.is_empty() {
        return Err(TallyError::Import(
            "The ledger already holds data; pass --force to replace it".into(),
        ));
    }

    let metadata = export.metadata.clone();
    let exported_at = export.exported_at;
    export.apply(storage)?;

    println!("Import Complete!");
    println!("  Exported:   {}", exported_at.format("%Y-%m-%d %H:%M UTC"));
    println!("  Categories: {}", metadata.category_count);
    println!("  Expenses:   {}", metadata.expense_count);
    println!("  Revenue:    {}", metadata.revenue_count);
    println!("  Assets:     {}", metadata.asset_count);
    println!("  Loans:      {}", metadata.loan_count);

    Ok(())
}
