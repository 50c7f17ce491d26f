//! Asset CLI commands

use clap::Subcommand;

use crate::config::Settings;
use crate::display::records::{format_asset_details, format_asset_list};
use crate::error::TallyResult;
use crate::models::{Asset, AssetPayment};
use crate::services::RecordService;
use crate::storage::Storage;

use super::{parse_amount, parse_date};

/// Asset subcommands
#[derive(Subcommand)]
pub enum AssetCommands {
    /// Record an asset
    Add {
        name: String,
        /// Current value
        value: String,
        /// Asset kind such as "Vehicle"; payments are budgeted under the
        /// category whose name or alias matches it
        #[arg(short, long)]
        kind: String,
        /// Acquisition date (YYYY-MM-DD), today if omitted
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Record a payment toward an asset
    Pay {
        /// Asset name or ID
        asset: String,
        amount: String,
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short, long)]
        memo: Option<String>,
    },

    /// List assets
    List,

    /// Show an asset and its payments
    Show {
        asset: String,
    },

    /// Remove an asset and its payments
    Remove {
        asset: String,
    },
}

pub fn handle_asset_command(
    storage: &Storage,
    settings: &Settings,
    cmd: AssetCommands,
) -> TallyResult<()> {
    let service = RecordService::new(storage);
    let fmt = settings.money_format();

    match cmd {
        AssetCommands::Add {
            name,
            value,
            kind,
            date,
        } => {
            let asset = service.add_asset(Asset::new(
                name,
                kind,
                parse_amount(&value)?,
                parse_date(date.as_deref())?,
            ))?;
            println!("Recorded asset: {}", asset.name);
            println!("  Kind:  {}", asset.kind);
            println!("  Value: {}", asset.value.format(&fmt));
            println!("  ID:    {}", asset.id);
        }

        AssetCommands::Pay {
            asset,
            amount,
            date,
            memo,
        } => {
            let mut payment = AssetPayment::new(parse_date(date.as_deref())?, parse_amount(&amount)?);
            payment.memo = memo.unwrap_or_default();
            let amount = payment.amount;

            let asset = service.add_asset_payment(&asset, payment)?;
            println!("Recorded payment of {} toward {}", amount.format(&fmt), asset.name);
            println!("  Total paid: {}", asset.total_paid().format(&fmt));
        }

        AssetCommands::List => {
            let assets = service.list_assets()?;
            print!("{}", format_asset_list(&assets, &fmt, &settings.date_format));
        }

        AssetCommands::Show { asset } => {
            let asset = service.get_asset(&asset)?;
            print!("{}", format_asset_details(&asset, &fmt, &settings.date_format));
        }

        AssetCommands::Remove { asset } => {
            let removed = service.remove_asset(&asset)?;
            println!(
                "Removed asset: {} ({} payment(s))",
                removed.name,
                removed.payments.len()
            );
        }
    }

    Ok(())
}
