use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use tally::cli::{
    handle_asset_command, handle_audit_command, handle_category_command, handle_expense_command,
    handle_export_command, handle_import_command, handle_loan_command, handle_report_command,
    handle_revenue_command, AssetCommands, CategoryCommands, ExpenseCommands, ExportCommands,
    ImportCommands, LoanCommands, ReportCommands, RevenueCommands,
};
use tally::config::{paths::DATA_DIR_ENV, Settings, TallyPaths};
use tally::storage::{initialize_storage, Storage};

#[derive(Parser)]
#[command(
    name = "tally",
    version,
    about = "Personal-finance ledger with hierarchical budgets",
    long_about = "Tally records expenses, income, assets, and loans against a tree of \
                  budget categories, and reports where the money went."
)]
struct Cli {
    /// Directory holding the ledger and settings
    #[arg(long, global = true, env = DATA_DIR_ENV)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Category tree management
    #[command(subcommand, alias = "cat")]
    Category(CategoryCommands),

    /// Expense management
    #[command(subcommand, alias = "exp")]
    Expense(ExpenseCommands),

    /// Income management
    #[command(subcommand, alias = "income")]
    Revenue(RevenueCommands),

    /// Asset management
    #[command(subcommand)]
    Asset(AssetCommands),

    /// Loan management
    #[command(subcommand)]
    Loan(LoanCommands),

    /// Reports
    #[command(subcommand)]
    Report(ReportCommands),

    /// Export the ledger
    #[command(subcommand)]
    Export(ExportCommands),

    /// Restore the ledger from an export
    #[command(subcommand)]
    Import(ImportCommands),

    /// Show recent changes
    Audit {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value = "20")]
        count: usize,
        /// Only this entity type (category, expense, revenue, asset, loan, ...)
        #[arg(short, long)]
        entity: Option<String>,
    },

    /// Initialize a new ledger
    Init {
        /// Start with no categories instead of the starter set
        #[arg(long)]
        empty: bool,
    },

    /// Show or change settings
    Config {
        #[command(subcommand)]
        action: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration and paths
    Show,
    /// Change a setting
    Set {
        /// Setting name, e.g. currency_symbol or other_category
        key: String,
        value: String,
    },
}

fn show_config(paths: &TallyPaths, settings: &Settings) {
    println!("Tally Configuration");
    println!("===================");
    println!("Base directory:  {}", paths.base_dir().display());
    println!("Data directory:  {}", paths.data_dir().display());
    println!("Audit log:       {}", paths.audit_log().display());
    println!();
    println!("Settings:");
    println!("  currency_symbol:     {}", settings.currency_symbol);
    println!("  thousands_separator: {}", settings.thousands_separator);
    println!("  decimal_separator:   {}", settings.decimal_separator);
    println!("  date_format:         {}", settings.date_format);
    println!("  other_category:      {}", settings.other_category);
    println!("  default_granularity: {}", settings.default_granularity);
    println!("  log_filter:          {}", settings.log_filter);
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = match cli.data_dir {
        Some(dir) => TallyPaths::with_base_dir(dir),
        None => TallyPaths::new()?,
    };
    let mut settings = Settings::load_or_create(&paths)?;
    tally::logging::init(&settings.log_filter);
    tracing::debug!(base = %paths.base_dir().display(), "starting");

    let storage = Storage::new(paths.clone())?;
    storage.load_all().context("failed to load ledger")?;

    match cli.command {
        Some(Commands::Category(cmd)) => handle_category_command(&storage, &settings, cmd)?,
        Some(Commands::Expense(cmd)) => handle_expense_command(&storage, &settings, cmd)?,
        Some(Commands::Revenue(cmd)) => handle_revenue_command(&storage, &settings, cmd)?,
        Some(Commands::Asset(cmd)) => handle_asset_command(&storage, &settings, cmd)?,
        Some(Commands::Loan(cmd)) => handle_loan_command(&storage, &settings, cmd)?,
        Some(Commands::Report(cmd)) => handle_report_command(&storage, &settings, cmd)?,
        Some(Commands::Export(cmd)) => handle_export_command(&storage, &settings, cmd)?,
        Some(Commands::Import(cmd)) => handle_import_command(&storage, cmd)?,
        Some(Commands::Audit { count, entity }) => {
            handle_audit_command(&storage, count, entity.as_deref())?
        }
        Some(Commands::Init { empty }) => {
            println!("Initializing Tally at: {}", paths.base_dir().display());
            let fresh = initialize_storage(&paths, !empty)?;
            if fresh {
                println!("Initialization complete!");
            } else {
                println!("Already initialized; existing data was left untouched.");
            }
            if !empty {
                println!();
                println!("Starter categories: Housing, Food, Car, Entertainment, Health, Other");
                println!("Run 'tally category list' to see the full tree.");
            }
        }
        Some(Commands::Config { action }) => match action {
            None | Some(ConfigCommands::Show) => show_config(&paths, &settings),
            Some(ConfigCommands::Set { key, value }) => {
                settings.set(&key, &value)?;
                settings.save(&paths)?;
                println!("Set {} = {}", key, value);
            }
        },
        None => {
            println!("Tally - personal-finance ledger with hierarchical budgets");
            println!();
            println!("Run 'tally init' to create a ledger.");
            println!("Run 'tally --help' for usage information.");
        }
    }

    Ok(())
}
