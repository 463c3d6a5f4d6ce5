//! Stats command - yearly totals across the ledger

use crate::cmd::{print_json, LedgerArgs};
use clap::Args;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};
use vatc::core::{format_gbp, CategoryTotals, VatStatistics};

#[derive(Args, Debug)]
pub struct StatsCommand {
    #[command(flatten)]
    ledger: LedgerArgs,

    /// Calendar year (e.g., 2024)
    #[arg(short, long)]
    year: i32,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Tabled)]
struct TotalsRow {
    #[tabled(rename = "Records")]
    category: &'static str,
    #[tabled(rename = "Count")]
    count: usize,
    #[tabled(rename = "Net")]
    net: String,
    #[tabled(rename = "VAT")]
    vat: String,
    #[tabled(rename = "Gross")]
    gross: String,
}

impl TotalsRow {
    fn new(category: &'static str, totals: &CategoryTotals) -> Self {
        TotalsRow {
            category,
            count: totals.count,
            net: format_gbp(totals.net),
            vat: format_gbp(totals.vat),
            gross: format_gbp(totals.gross),
        }
    }
}

impl StatsCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let service = self.ledger.open()?;
        let stats = service.get_vat_statistics(self.ledger.user(), self.year)?;

        if self.json {
            print_json(&stats)
        } else {
            print_stats(&stats);
            Ok(())
        }
    }
}

fn print_stats(stats: &VatStatistics) {
    let rows = vec![
        TotalsRow::new("Income", &stats.income),
        TotalsRow::new("Expenses", &stats.expenses),
        TotalsRow::new("Invoices", &stats.invoices),
    ];

    println!();
    println!("VAT STATISTICS ({})", stats.year);
    println!();
    println!(
        "{}",
        Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
    );
    println!();

    let returns = &stats.returns;
    println!("RETURNS");
    println!("  Count: {}", returns.count);
    for (status, count) in &returns.by_status {
        println!("  {:?}: {}", status, count);
    }
    println!(
        "  VAT due: {} | Reclaimed: {} | Net: {}",
        format_gbp(returns.total_vat_due),
        format_gbp(returns.total_vat_reclaimed),
        format_gbp(returns.total_net_vat)
    );
}
