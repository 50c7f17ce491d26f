//! CLI commands for reports
//!
//! Every report prints to the terminal by default; `--csv` writes CSV to
//! stdout and `--output` writes it to a file instead.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::config::Settings;
use crate::error::TallyResult;
use crate::reports::{
    BudgetOverviewReport, CashFlowReport, LoansReport, NetWorthReport, SpendingReport, TrendReport,
};
use crate::services::aggregator::Granularity;
use crate::storage::Storage;

use super::{emit_csv, resolve_window, use_color, window_or_current_month};

/// Date range selection shared by the reports
#[derive(Args, Debug, Clone, Default)]
pub struct WindowArgs {
    /// Period: YYYY, YYYY-MM, or YYYY-MM-DD
    #[arg(short, long)]
    pub period: Option<String>,
    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,
    /// End date (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,
}

/// CSV output selection shared by the reports
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Write CSV to stdout instead of the terminal layout
    #[arg(long)]
    pub csv: bool,
    /// Write CSV to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Budget vs spending per top-level category (current month by default)
    #[command(alias = "budget-overview")]
    Budget {
        #[command(flatten)]
        window: WindowArgs,
        #[command(flatten)]
        out: OutputArgs,
    },

    /// Spending by category (current month by default)
    Spending {
        #[command(flatten)]
        window: WindowArgs,
        /// Show top N categories only
        #[arg(long)]
        top: Option<usize>,
        #[command(flatten)]
        out: OutputArgs,
    },

    /// Spending over time
    Trend {
        #[command(flatten)]
        window: WindowArgs,
        /// Bucket size: day, month, or year
        #[arg(short, long)]
        granularity: Option<String>,
        /// Limit to one category and everything below it
        #[arg(short, long)]
        category: Option<String>,
        #[command(flatten)]
        out: OutputArgs,
    },

    /// Income vs spending over time
    #[command(name = "cash-flow", alias = "cashflow")]
    CashFlow {
        #[command(flatten)]
        window: WindowArgs,
        #[arg(short, long)]
        granularity: Option<String>,
        #[command(flatten)]
        out: OutputArgs,
    },

    /// Balances and payment totals for every loan
    Loans {
        #[command(flatten)]
        out: OutputArgs,
    },

    /// Asset values minus outstanding loan balances
    #[command(name = "net-worth", alias = "networth")]
    NetWorth {
        #[command(flatten)]
        out: OutputArgs,
    },
}

fn granularity_or_default(arg: Option<&str>, settings: &Settings) -> TallyResult<Granularity> {
    match arg {
        Some(g) => Granularity::parse(g),
        None => Ok(settings.default_granularity),
    }
}

/// Handle report commands
pub fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ReportCommands,
) -> TallyResult<()> {
    let snapshot = storage.snapshot()?;
    let fmt = settings.money_format();
    let other = settings.other_category.as_str();

    match cmd {
        ReportCommands::Budget { window, out } => {
            let window = window_or_current_month(
                window.period.as_deref(),
                window.from.as_deref(),
                window.to.as_deref(),
            )?;
            let report = BudgetOverviewReport::generate(&snapshot, window, other);
            if !emit_csv(out.output.as_deref(), out.csv, |w| report.export_csv(w))? {
                print!("{}", report.format_terminal(&fmt, use_color()));
            }
        }

        ReportCommands::Spending { window, top, out } => {
            let window = window_or_current_month(
                window.period.as_deref(),
                window.from.as_deref(),
                window.to.as_deref(),
            )?;
            let mut report = SpendingReport::generate(&snapshot, window, other);
            if let Some(limit) = top {
                report.rows = report.top_categories(limit).to_vec();
            }
            if !emit_csv(out.output.as_deref(), out.csv, |w| report.export_csv(w))? {
                print!("{}", report.format_terminal(&fmt));
            }
        }

        ReportCommands::Trend {
            window,
            granularity,
            category,
            out,
        } => {
            let window = resolve_window(
                window.period.as_deref(),
                window.from.as_deref(),
                window.to.as_deref(),
            )?;
            let granularity = granularity_or_default(granularity.as_deref(), settings)?;
            let report =
                TrendReport::generate(&snapshot, granularity, window, category.as_deref(), other)?;
            if !emit_csv(out.output.as_deref(), out.csv, |w| report.export_csv(w))? {
                print!("{}", report.format_terminal(&fmt));
            }
        }

        ReportCommands::CashFlow {
            window,
            granularity,
            out,
        } => {
            let window = resolve_window(
                window.period.as_deref(),
                window.from.as_deref(),
                window.to.as_deref(),
            )?;
            let granularity = granularity_or_default(granularity.as_deref(), settings)?;
            let report = CashFlowReport::generate(&snapshot, granularity, window);
            if !emit_csv(out.output.as_deref(), out.csv, |w| report.export_csv(w))? {
                print!("{}", report.format_terminal(&fmt, use_color()));
            }
        }

        ReportCommands::Loans { out } => {
            let report = LoansReport::generate(&snapshot);
            if !emit_csv(out.output.as_deref(), out.csv, |w| report.export_csv(w))? {
                print!("{}", report.format_terminal(&fmt));
            }
        }

        ReportCommands::NetWorth { out } => {
            let report = NetWorthReport::generate(&snapshot);
            if !emit_csv(out.output.as_deref(), out.csv, |w| report.export_csv(w))? {
                print!("{}", report.format_terminal(&fmt, use_color()));
            }
        }
    }

    Ok(())
}
