//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod asset;
pub mod audit;
pub mod category;
pub mod expense;
pub mod export;
pub mod loan;
pub mod report;
pub mod revenue;

pub use asset::{handle_asset_command, AssetCommands};
pub use audit::handle_audit_command;
pub use category::{handle_category_command, CategoryCommands};
pub use expense::{handle_expense_command, ExpenseCommands};
pub use export::{handle_export_command, handle_import_command, ExportCommands, ImportCommands};
pub use loan::{handle_loan_command, LoanCommands};
pub use report::{handle_report_command, ReportCommands};
pub use revenue::{handle_revenue_command, RevenueCommands};

use std::fs::File;
use std::io::{self, BufWriter, IsTerminal, Write};
use std::path::Path;

use chrono::{Datelike, Local, NaiveDate};

use crate::error::{TallyError, TallyResult};
use crate::models::Money;
use crate::services::aggregator::DateWindow;

/// Parse a user-typed amount such as "35.41" or "$1,200"
pub fn parse_amount(s: &str) -> TallyResult<Money> {
    Money::parse(s).map_err(|e| TallyError::Validation(format!("Invalid amount: {}", e)))
}

/// Parse a YYYY-MM-DD date, defaulting to today
pub fn parse_date(s: Option<&str>) -> TallyResult<NaiveDate> {
    match s {
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
            TallyError::Validation(format!("Invalid date '{}'. Use YYYY-MM-DD", s))
        }),
        None => Ok(Local::now().date_naive()),
    }
}

/// Window from `--period`, or from `--from`/`--to`; `None` when nothing was given
///
/// A lone `--from` runs to today and a lone `--to` starts at the first record
/// that could exist, so both ends are always bounded.
pub fn resolve_window(
    period: Option<&str>,
    from: Option<&str>,
    to: Option<&str>,
) -> TallyResult<Option<DateWindow>> {
    if let Some(period) = period {
        return DateWindow::parse(period).map(Some);
    }
    match (from, to) {
        (None, None) => Ok(None),
        (from, to) => {
            let start = match from {
                Some(f) => parse_date(Some(f))?,
                None => NaiveDate::MIN,
            };
            let end = parse_date(to)?;
            DateWindow::between(start, end).map(Some)
        }
    }
}

/// Like [`resolve_window`], falling back to the current calendar month
pub fn window_or_current_month(
    period: Option<&str>,
    from: Option<&str>,
    to: Option<&str>,
) -> TallyResult<DateWindow> {
    match resolve_window(period, from, to)? {
        Some(window) => Ok(window),
        None => {
            let today = Local::now().date_naive();
            DateWindow::month(today.year(), today.month())
        }
    }
}

/// Whether to emit ANSI colors on stdout
pub fn use_color() -> bool {
    std::env::var_os("NO_COLOR").is_none() && io::stdout().is_terminal()
}

/// Write CSV to `output` or stdout when asked; returns whether anything was written
pub fn emit_csv<F>(output: Option<&Path>, to_stdout: bool, write: F) -> TallyResult<bool>
where
    F: FnOnce(&mut dyn Write) -> TallyResult<()>,
{
    if let Some(path) = output {
        let file = File::create(path).map_err(|e| {
            TallyError::Export(format!("Failed to create file {}: {}", path.display(), e))
        })?;
        let mut writer = BufWriter::new(file);
        write(&mut writer)?;
        writer.flush()?;
        println!("Report exported to: {}", path.display());
        Ok(true)
    } else if to_stdout {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        write(&mut lock)?;
        Ok(true)
    } else {
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("35.41").unwrap(), Money::from_cents(3541));
        assert!(parse_amount("lots").unwrap_err().is_validation());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date(Some("2024-11-05")).unwrap(),
            NaiveDate::from_ymd_opt(2024, 11, 5).unwrap()
        );
        assert!(parse_date(Some("11/05/2024")).is_err());
        assert_eq!(parse_date(None).unwrap(), Local::now().date_naive());
    }

    #[test]
    fn test_resolve_window() {
        assert_eq!(resolve_window(None, None, None).unwrap(), None);

        let month = resolve_window(Some("2024-11"), Some("2020-01-01"), None)
            .unwrap()
            .unwrap();
        assert_eq!(month, DateWindow::month(2024, 11).unwrap());

        let range = resolve_window(None, Some("2024-01-01"), Some("2024-03-31"))
            .unwrap()
            .unwrap();
        assert_eq!(range.months_spanned(), 3);

        assert!(resolve_window(None, Some("2024-03-01"), Some("2024-01-01")).is_err());
    }

    #[test]
    fn test_window_defaults_to_current_month() {
        let today = Local::now().date_naive();
        let window = window_or_current_month(None, None, None).unwrap();
        assert!(window.contains(today));
        assert_eq!(window.months_spanned(), 1);
    }

    #[test]
    fn test_emit_csv_to_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.csv");

        let written = emit_csv(Some(&path), false, |w| {
            w.write_all(b"a,b\n")?;
            Ok(())
        })
        .unwrap();

        assert!(written);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a,b\n");
        assert!(!emit_csv(None, false, |_| Ok(())).unwrap());
    }
}
