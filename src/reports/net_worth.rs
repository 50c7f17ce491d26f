//! Net Worth Report
//!
//! Asset values minus the outstanding balance of every loan.
//!
//! An overpaid loan counts as a zero liability and is left out of the
//! listing. The overpayment is money the lender holds, not an asset the
//! ledger tracks, so it must not raise net worth. `LoanLedger` and the loans
//! report still show the negative remaining balance.

use std::io::Write;

use crate::display::report::{format_money_signed, format_title, separator};
use crate::error::TallyResult;
use crate::models::{LedgerSnapshot, Money, MoneyFormat};
use crate::services::loan::LoanLedger;

use super::csv_amount;

/// One asset or liability line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetWorthLine {
    pub name: String,
    /// Asset kind or loan category label
    pub kind: String,
    pub amount: Money,
}

/// Net Worth Report
#[derive(Debug, Clone)]
pub struct NetWorthReport {
    pub assets: Vec<NetWorthLine>,
    pub liabilities: Vec<NetWorthLine>,
    pub total_assets: Money,
    pub total_liabilities: Money,
}

impl NetWorthReport {
    pub fn generate(snapshot: &LedgerSnapshot) -> Self {
        let mut assets: Vec<NetWorthLine> = snapshot
            .assets
            .iter()
            .map(|a| NetWorthLine {
                name: a.name.clone(),
                kind: a.kind.clone(),
                amount: a.value,
            })
            .collect();
        assets.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.name.cmp(&b.name)));

        let mut liabilities: Vec<NetWorthLine> = snapshot
            .loans
            .iter()
            .map(|loan| NetWorthLine {
                name: loan.name.clone(),
                kind: loan.category.clone(),
                amount: LoanLedger::new(loan).remaining_amount().max(Money::zero()),
            })
            .filter(|l| l.amount.is_positive())
            .collect();
        liabilities.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.name.cmp(&b.name)));

        Self {
            total_assets: assets.iter().map(|a| a.amount).sum(),
            total_liabilities: liabilities.iter().map(|l| l.amount).sum(),
            assets,
            liabilities,
        }
    }

    pub fn net_worth(&self) -> Money {
        self.total_assets - self.total_liabilities
    }

    pub fn format_terminal(&self, fmt: &MoneyFormat, color: bool) -> String {
        let mut output = format_title("Net Worth");

        output.push_str("ASSETS\n");
        if self.assets.is_empty() {
            output.push_str("  (none)\n");
        }
        for line in &self.assets {
            output.push_str(&format!(
                "  {:<30} {:<16} {:>16}\n",
                line.name,
                line.kind,
                line.amount.format(fmt)
            ));
        }
        output.push_str(&format!("  {:<47} {:>16}\n\n", "Total assets", self.total_assets.format(fmt)));

        output.push_str("LIABILITIES\n");
        if self.liabilities.is_empty() {
            output.push_str("  (none)\n");
        }
        for line in &self.liabilities {
            output.push_str(&format!(
                "  {:<30} {:<16} {:>16}\n",
                line.name,
                line.kind,
                line.amount.format(fmt)
            ));
        }
        output.push_str(&format!(
            "  {:<47} {:>16}\n",
            "Total liabilities",
            self.total_liabilities.format(fmt)
        ));

        output.push_str(&separator());
        output.push('\n');
        output.push_str(&format!(
            "  {:<47} {:>16}\n",
            "NET WORTH",
            format_money_signed(self.net_worth(), fmt, color)
        ));

        output
    }

    pub fn export_csv<W: Write>(&self, writer: W) -> TallyResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(["Type", "Name", "Kind", "Amount"])?;

        for line in &self.assets {
            csv.write_record(["Asset", &line.name, &line.kind, &csv_amount(line.amount)])?;
        }
        for line in &self.liabilities {
            csv.write_record(["Liability", &line.name, &line.kind, &csv_amount(line.amount)])?;
        }
        csv.write_record(["Net Worth", "", "", &csv_amount(self.net_worth())])?;

        csv.flush()?;
        Ok(())
    }
}
