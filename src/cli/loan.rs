//! Loan CLI commands

use clap::Subcommand;

use crate::config::Settings;
use crate::display::records::{format_loan_details, format_loan_list};
use crate::error::TallyResult;
use crate::models::{Loan, LoanPayment, Money};
use crate::services::{LoanLedger, RecordService};
use crate::storage::Storage;

use super::{parse_amount, parse_date};

/// Loan subcommands
#[derive(Subcommand)]
pub enum LoanCommands {
    /// Record a loan
    Add {
        name: String,
        /// Original principal
        amount: String,
        /// Category label interest and fees are budgeted under
        #[arg(short, long)]
        category: String,
        /// Start date (YYYY-MM-DD), today if omitted
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Record a loan payment
    Pay {
        /// Loan name or ID
        loan: String,
        /// Principal portion
        #[arg(long)]
        principal: String,
        #[arg(long)]
        interest: Option<String>,
        #[arg(long)]
        escrow: Option<String>,
        /// Fees and anything else
        #[arg(long)]
        other: Option<String>,
        /// Extra payment applied entirely to principal
        #[arg(long, conflicts_with_all = ["interest", "escrow", "other"])]
        extra: bool,
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Show a loan's ledger and payments
    Show {
        loan: String,
    },

    /// List loans
    List,

    /// Remove a loan, or a single payment with --payment
    Remove {
        loan: String,
        /// Payment ID to remove instead of the whole loan
        #[arg(long)]
        payment: Option<String>,
    },
}

fn optional_amount(s: Option<&str>) -> TallyResult<Money> {
    Ok(s.map(parse_amount).transpose()?.unwrap_or_default())
}

pub fn handle_loan_command(
    storage: &Storage,
    settings: &Settings,
    cmd: LoanCommands,
) -> TallyResult<()> {
    let service = RecordService::new(storage);
    let fmt = settings.money_format();

    match cmd {
        LoanCommands::Add {
            name,
            amount,
            category,
            date,
        } => {
            let loan = service.add_loan(Loan::new(
                name,
                category,
                parse_amount(&amount)?,
                parse_date(date.as_deref())?,
            ))?;
            println!("Recorded loan: {}", loan.name);
            println!("  Amount:   {}", loan.original_amount.format(&fmt));
            println!("  Category: {}", loan.category);
            println!("  ID:       {}", loan.id);
        }

        LoanCommands::Pay {
            loan,
            principal,
            interest,
            escrow,
            other,
            extra,
            date,
        } => {
            let date = parse_date(date.as_deref())?;
            let principal = parse_amount(&principal)?;
            let payment = if extra {
                LoanPayment::principal_only(date, principal)
            } else {
                LoanPayment::regular(
                    date,
                    principal,
                    optional_amount(interest.as_deref())?,
                    optional_amount(escrow.as_deref())?,
                    optional_amount(other.as_deref())?,
                )
            };
            let total = payment.total();

            let loan = service.add_loan_payment(&loan, payment)?;
            let ledger = LoanLedger::new(&loan);
            println!("Recorded payment of {} on {}", total.format(&fmt), loan.name);
            println!("  Remaining: {}", ledger.remaining_amount().format(&fmt));
            if ledger.is_paid_off() {
                println!("  This loan is paid off.");
            }
        }

        LoanCommands::Show { loan } => {
            let loan = service.get_loan(&loan)?;
            print!("{}", format_loan_details(&loan, &fmt, &settings.date_format));
        }

        LoanCommands::List => {
            let loans = service.list_loans()?;
            print!("{}", format_loan_list(&loans, &fmt));
        }

        LoanCommands::Remove { loan, payment } => match payment {
            Some(payment) => {
                let loan = service.remove_loan_payment(&loan, &payment)?;
                println!("Removed payment {} from {}", payment, loan.name);
            }
            None => {
                let removed = service.remove_loan(&loan)?;
                println!(
                    "Removed loan: {} ({} payment(s))",
                    removed.name,
                    removed.payments.len()
                );
            }
        },
    }

    Ok(())
}
