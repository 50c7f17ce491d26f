//! Category CLI commands
//!
//! Implements CLI commands for editing the category tree.

use clap::Subcommand;

use crate::config::Settings;
use crate::display::category::{format_category_details, format_category_tree};
use crate::error::TallyResult;
use crate::models::CategoryColor;
use crate::services::CategoryService;
use crate::storage::Storage;

use super::{parse_amount, use_color};

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// Show the category tree with monthly budgets
    List,

    /// Add a category
    Add {
        /// Category name
        name: String,
        /// Parent category (name, alias, path, or ID); top level if omitted
        #[arg(short, long)]
        parent: Option<String>,
        /// Monthly budget (e.g., "200" or "200.00")
        #[arg(short, long)]
        budget: Option<String>,
    },

    /// Show category details
    Show {
        /// Category name, alias, "Parent > Child" path, or ID
        category: String,
    },

    /// Set or clear a category's own monthly budget
    #[command(name = "set-budget")]
    SetBudget {
        category: String,
        #[arg(required_unless_present = "clear")]
        amount: Option<String>,
        /// Remove the budget
        #[arg(long, conflicts_with = "amount")]
        clear: bool,
    },

    /// Set or clear a category's chart color
    #[command(name = "set-color")]
    SetColor {
        category: String,
        #[arg(required_unless_present = "clear")]
        color: Option<String>,
        #[arg(long, conflicts_with = "color")]
        clear: bool,
    },

    /// Set or clear the asset kind a category answers to
    #[command(name = "set-alias")]
    SetAlias {
        category: String,
        #[arg(required_unless_present = "clear")]
        alias: Option<String>,
        #[arg(long, conflicts_with = "alias")]
        clear: bool,
    },

    /// Rename a category
    Rename {
        category: String,
        new_name: String,
    },

    /// Move a category (and everything below it)
    Move {
        category: String,
        /// New parent; omit to move to the top level
        #[arg(short, long)]
        to: Option<String>,
    },

    /// Remove a category and everything below it
    Remove {
        category: String,
    },
}

/// Handle a category command
pub fn handle_category_command(
    storage: &Storage,
    settings: &Settings,
    cmd: CategoryCommands,
) -> TallyResult<()> {
    let service = CategoryService::new(storage);
    let fmt = settings.money_format();

    match cmd {
        CategoryCommands::List => {
            let tree = service.tree()?;
            print!("{}", format_category_tree(&tree, &fmt, use_color()));
        }

        CategoryCommands::Add {
            name,
            parent,
            budget,
        } => {
            let budget = budget.as_deref().map(parse_amount).transpose()?;
            let node = service.add(&name, parent.as_deref())?;
            if budget.is_some() {
                service.set_budget(&node.id().to_string(), budget)?;
            }

            let detail = service.detail(&node.id().to_string())?;
            println!("Created category: {}", detail.path);
            if let Some(amount) = budget {
                println!("  Budget: {}/mo", amount.format(&fmt));
            }
            println!("  ID: {}", node.id());
        }

        CategoryCommands::Show { category } => {
            let detail = service.detail(&category)?;
            print!("{}", format_category_details(&detail, &fmt));
        }

        CategoryCommands::SetBudget {
            category,
            amount,
            clear,
        } => {
            let amount = if clear {
                None
            } else {
                amount.as_deref().map(parse_amount).transpose()?
            };
            let node = service.set_budget(&category, amount)?;
            match amount {
                Some(a) => println!("Budget for {} set to {}/mo", node.name(), a.format(&fmt)),
                None => println!("Budget for {} cleared", node.name()),
            }
        }

        CategoryCommands::SetColor {
            category,
            color,
            clear,
        } => {
            let color = if clear {
                None
            } else {
                color.as_deref().map(CategoryColor::parse).transpose()?
            };
            let node = service.set_color(&category, color)?;
            match color {
                Some(c) => println!("Color for {} set to {}", node.name(), c.name()),
                None => println!("Color for {} cleared", node.name()),
            }
        }

        CategoryCommands::SetAlias {
            category,
            alias,
            clear,
        } => {
            let alias = if clear { None } else { alias };
            let node = service.set_alias(&category, alias.as_deref())?;
            match node.alias_name() {
                Some(a) => println!("{} now also answers to '{}'", node.name(), a),
                None => println!("Alias for {} cleared", node.name()),
            }
        }

        CategoryCommands::Rename { category, new_name } => {
            let node = service.rename(&category, &new_name)?;
            println!("Renamed '{}' to '{}'", category, node.name());
        }

        CategoryCommands::Move { category, to } => {
            let node = service.move_to(&category, to.as_deref())?;
            let detail = service.detail(&node.id().to_string())?;
            println!("Moved category to: {}", detail.path);
        }

        CategoryCommands::Remove { category } => {
            let removed = service.remove(&category)?;
            println!("Removed {} categor{}:", removed.len(), if removed.len() == 1 { "y" } else { "ies" });
            for node in &removed {
                println!("  {}", node.name());
            }
            println!(
                "Records labelled with these categories now count under '{}'.",
                settings.other_category
            );
        }
    }

    Ok(())
}
