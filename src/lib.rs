//! Tally - personal-finance ledger with hierarchical budgets
//!
//! Tally records expenses, revenue, assets, and loans, and attributes every
//! outflow to a tree of budget categories. Budgets roll up the tree, labels
//! that match no category land in an "Other" bucket, and loan payments count
//! only their interest, escrow, and fees against the budget.
//!
//! # Architecture
//!
//! - `models`: money, the category tree, and the ledger records
//! - `services`: the pure core (classifier, loan ledger, aggregator) and the
//!   storage-backed services that edit categories and records
//! - `storage`: JSON file storage layer
//! - `reports`: budget, spending, trend, cash-flow, loan, and net-worth reports
//! - `export`: JSON/YAML ledger export and import, CSV transaction export
//! - `audit`: append-only change log
//! - `display`: terminal formatting
//! - `config`: paths and user settings
//! - `cli`: command handlers behind the `tally` binary
//! - `logging`: `tracing` subscriber setup
//!
//! # Example
//!
//! ```rust,ignore
//! use tally::config::{Settings, TallyPaths};
//! use tally::reports::BudgetOverviewReport;
//! use tally::services::DateWindow;
//! use tally::storage::Storage;
//!
//! let paths = TallyPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::new(paths)?;
//! storage.load_all()?;
//!
//! let window = DateWindow::month(2024, 11)?;
//! let report = BudgetOverviewReport::generate(&storage.snapshot()?, window, &settings.other_category);
//! print!("{}", report.format_terminal(&settings.money_format(), false));
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{TallyError, TallyResult};
