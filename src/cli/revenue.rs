//! Revenue CLI commands

use clap::Subcommand;

use crate::config::Settings;
use crate::display::records::format_revenue_list;
use crate::error::TallyResult;
use crate::models::Revenue;
use crate::services::RecordService;
use crate::storage::Storage;

use super::{parse_amount, parse_date, resolve_window};

/// Revenue subcommands
#[derive(Subcommand)]
pub enum RevenueCommands {
    /// Record income
    Add {
        name: String,
        /// Amount received (e.g., "4000")
        amount: String,
        /// Source label such as "Salary"
        #[arg(short, long)]
        source: String,
        /// Date (YYYY-MM-DD), today if omitted
        #[arg(short, long)]
        date: Option<String>,
    },

    /// List income
    List {
        /// Period: YYYY, YYYY-MM, or YYYY-MM-DD
        #[arg(short, long)]
        period: Option<String>,
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
    },

    /// Remove an income entry
    Remove {
        /// Revenue ID or exact name
        revenue: String,
    },
}

pub fn handle_revenue_command(
    storage: &Storage,
    settings: &Settings,
    cmd: RevenueCommands,
) -> TallyResult<()> {
    let service = RecordService::new(storage);
    let fmt = settings.money_format();

    match cmd {
        RevenueCommands::Add {
            name,
            amount,
            source,
            date,
        } => {
            let revenue = service.add_revenue(Revenue::new(
                name,
                parse_date(date.as_deref())?,
                parse_amount(&amount)?,
                source,
            ))?;
            println!("Recorded revenue: {}", revenue.name);
            println!("  Amount: {}", revenue.amount.format(&fmt));
            println!("  Source: {}", revenue.source);
            println!("  ID:     {}", revenue.id);
        }

        RevenueCommands::List { period, from, to } => {
            let window = resolve_window(period.as_deref(), from.as_deref(), to.as_deref())?;
            let revenue = service.list_revenue(window.as_ref())?;
            print!("{}", format_revenue_list(&revenue, &fmt, &settings.date_format));
        }

        RevenueCommands::Remove { revenue } => {
            let removed = service.remove_revenue(&revenue)?;
            println!("Removed revenue: {} ({})", removed.name, removed.amount.format(&fmt));
        }
    }

    Ok(())
}
