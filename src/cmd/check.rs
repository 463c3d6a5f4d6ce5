//! Check command - recompute a saved return and report drift

use crate::cmd::{print_json, LedgerArgs};
use clap::Args;
use serde::Serialize;
use std::io::{self, Write};
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};
use vatc::core::{format_gbp, SavedComparison, SavedReturn};

#[derive(Args, Debug)]
pub struct CheckCommand {
    #[command(flatten)]
    ledger: LedgerArgs,

    /// Id of the saved return to check
    #[arg(short, long)]
    return_id: String,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct CheckOutput<'a> {
    return_id: &'a str,
    #[serde(flatten)]
    comparison: &'a SavedComparison,
}

#[derive(Debug, Tabled)]
struct DiscrepancyRow {
    #[tabled(rename = "Box")]
    number: u8,
    #[tabled(rename = "Saved")]
    saved: String,
    #[tabled(rename = "Calculated")]
    calculated: String,
    #[tabled(rename = "Difference")]
    difference: String,
}

impl CheckCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let service = self.ledger.open()?;
        let saved = service
            .store()
            .saved_return(&self.return_id)
            .ok_or_else(|| anyhow::anyhow!("No saved return with id '{}'", self.return_id))?;
        let comparison = service.recheck_saved_return(saved)?;

        if self.json {
            print_json(&CheckOutput {
                return_id: &saved.id,
                comparison: &comparison,
            })?;
        } else {
            print_check(saved, &comparison);
        }

        if !comparison.is_valid {
            // exit skips destructors, so buffered output must go first
            io::stdout().flush()?;
            std::process::exit(1);
        }
        Ok(())
    }
}

fn print_check(saved: &SavedReturn, comparison: &SavedComparison) {
    println!();
    println!(
        "SAVED RETURN {} ({}, {} accounting, {:?})",
        saved.id, saved.period, saved.scheme, saved.status
    );
    println!();

    if comparison.is_valid {
        println!("\u{2713} Saved boxes match the ledger.");
        return;
    }

    println!(
        "\u{26A0} {} box(es) differ from the ledger:",
        comparison.discrepancies.len()
    );
    let rows: Vec<DiscrepancyRow> = comparison
        .discrepancies
        .iter()
        .map(|d| DiscrepancyRow {
            number: d.key.number(),
            saved: format_gbp(d.saved),
            calculated: format_gbp(d.calculated),
            difference: format_gbp(d.difference),
        })
        .collect();
    println!(
        "{}",
        Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
    );
}
