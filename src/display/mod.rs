//! Display formatting for terminal output
//!
//! Category trees, record tables, and the shared helpers the reports use
//! for amounts, percentages, and bars.

pub mod category;
pub mod records;
pub mod report;

pub use category::{format_category_details, format_category_tree};
pub use records::{
    format_asset_details, format_asset_list, format_expense_list, format_loan_details,
    format_loan_list, format_revenue_list,
};
