//! Compare command - box by box change between two periods

use crate::cmd::{print_json, LedgerArgs, PeriodArgs};
use clap::Args;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};
use vatc::core::{format_gbp, PeriodComparison};

#[derive(Args, Debug)]
pub struct CompareCommand {
    #[command(flatten)]
    ledger: LedgerArgs,

    #[command(flatten)]
    period: PeriodArgs,

    /// First day of the period to compare against (YYYY-MM-DD)
    #[arg(long)]
    prev_start: String,

    /// Last day of the period to compare against (YYYY-MM-DD)
    #[arg(long)]
    prev_end: String,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Tabled)]
struct ChangeRow {
    #[tabled(rename = "Box")]
    number: u8,
    #[tabled(rename = "Current")]
    current: String,
    #[tabled(rename = "Previous")]
    previous: String,
    #[tabled(rename = "Change")]
    change: String,
    #[tabled(rename = "%")]
    percent: String,
}

impl CompareCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let service = self.ledger.open()?;
        let comparison = service.compare_vat_periods(
            self.ledger.user(),
            (self.period.start(), self.period.end()),
            (&self.prev_start, &self.prev_end),
            &self.period.options()?,
        )?;

        if self.json {
            print_json(&comparison)
        } else {
            print_comparison(&comparison);
            Ok(())
        }
    }
}

fn print_comparison(comparison: &PeriodComparison) {
    let rows: Vec<ChangeRow> = comparison
        .changes
        .iter()
        .map(|c| ChangeRow {
            number: c.key.number(),
            current: format_gbp(c.current),
            previous: format_gbp(c.previous),
            change: format_gbp(c.change),
            percent: c
                .percent_change
                .map_or("n/a".to_string(), |p| format!("{:.2}", p)),
        })
        .collect();

    println!();
    println!(
        "PERIOD COMPARISON ({} vs {})",
        comparison.current.period, comparison.previous.period
    );
    println!();
    println!(
        "{}",
        Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
    );
}
