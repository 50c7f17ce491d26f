//! Expense CLI commands

use clap::Subcommand;

use crate::config::Settings;
use crate::display::records::format_expense_list;
use crate::error::{TallyError, TallyResult};
use crate::models::{BillFrequency, Expense, ExpenseDetails};
use crate::services::RecordService;
use crate::storage::Storage;

use super::{parse_amount, parse_date, resolve_window};

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record an expense
    Add {
        /// What the money was spent on
        name: String,
        /// Amount spent (e.g., "35.41")
        amount: String,
        /// Category label; unknown labels count under the "Other" bucket
        #[arg(short, long)]
        category: String,
        /// Date (YYYY-MM-DD), today if omitted
        #[arg(short, long)]
        date: Option<String>,
        /// Free-form notes
        #[arg(short, long)]
        notes: Option<String>,
        /// Mark as a bill from this biller
        #[arg(long, conflicts_with_all = ["subscription", "fuel_volume"])]
        bill: Option<String>,
        /// Mark as a subscription charge for this service
        #[arg(long, conflicts_with = "fuel_volume")]
        subscription: Option<String>,
        /// Recurrence for bills and subscriptions (weekly, monthly, quarterly, yearly)
        #[arg(long)]
        frequency: Option<String>,
        /// Fuel volume, marks the expense as a fill-up
        #[arg(long, requires = "price_per_unit")]
        fuel_volume: Option<f64>,
        /// Fuel price per unit
        #[arg(long)]
        price_per_unit: Option<String>,
        /// Odometer reading at the fill-up
        #[arg(long)]
        odometer: Option<u32>,
    },

    /// List expenses
    List {
        /// Period: YYYY, YYYY-MM, or YYYY-MM-DD
        #[arg(short, long)]
        period: Option<String>,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        /// Only expenses with this exact category label
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Remove an expense
    Remove {
        /// Expense ID or exact name
        expense: String,
    },
}

fn parse_frequency(s: Option<&str>) -> TallyResult<BillFrequency> {
    match s {
        None => Ok(BillFrequency::default()),
        Some(s) => BillFrequency::parse(s).ok_or_else(|| {
            TallyError::Validation(format!(
                "Invalid frequency '{}'. Use weekly, monthly, quarterly, or yearly",
                s
            ))
        }),
    }
}

/// Handle an expense command
pub fn handle_expense_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ExpenseCommands,
) -> TallyResult<()> {
    let service = RecordService::new(storage);
    let fmt = settings.money_format();

    match cmd {
        ExpenseCommands::Add {
            name,
            amount,
            category,
            date,
            notes,
            bill,
            subscription,
            frequency,
            fuel_volume,
            price_per_unit,
            odometer,
        } => {
            let details = if let Some(biller) = bill {
                ExpenseDetails::Bill {
                    biller,
                    frequency: parse_frequency(frequency.as_deref())?,
                    due_date: None,
                }
            } else if let Some(service) = subscription {
                ExpenseDetails::Subscription {
                    service,
                    frequency: parse_frequency(frequency.as_deref())?,
                }
            } else if let Some(volume) = fuel_volume {
                let price = price_per_unit.as_deref().ok_or_else(|| {
                    TallyError::Validation("--price-per-unit is required for fuel".into())
                })?;
                ExpenseDetails::Fuel {
                    volume,
                    price_per_unit: parse_amount(price)?,
                    odometer,
                }
            } else {
                ExpenseDetails::General
            };

            let mut expense = Expense::new(
                name,
                parse_date(date.as_deref())?,
                parse_amount(&amount)?,
                category,
            )
            .with_details(details);
            expense.notes = notes.unwrap_or_default();

            let expense = service.add_expense(expense)?;
            println!("Recorded expense: {}", expense.name);
            println!("  Amount:   {}", expense.amount.format(&fmt));
            println!("  Category: {}", expense.category);
            println!("  Date:     {}", expense.date.format(&settings.date_format));
            println!("  ID:       {}", expense.id);
        }

        ExpenseCommands::List {
            period,
            from,
            to,
            category,
        } => {
            let window = resolve_window(period.as_deref(), from.as_deref(), to.as_deref())?;
            let expenses = service.list_expenses(window.as_ref(), category.as_deref())?;
            print!("{}", format_expense_list(&expenses, &fmt, &settings.date_format));
        }

        ExpenseCommands::Remove { expense } => {
            let removed = service.remove_expense(&expense)?;
            println!(
                "Removed expense: {} ({}, {})",
                removed.name,
                removed.amount.format(&fmt),
                removed.date
            );
        }
    }

    Ok(())
}
