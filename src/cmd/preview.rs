//! Preview command - labelled boxes and the MTD submission body

use crate::cmd::{net_vat_line, print_json, LedgerArgs, PeriodArgs};
use clap::Args;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};
use vatc::core::{format_gbp, Language, VatReturnPreview};

#[derive(Args, Debug)]
pub struct PreviewCommand {
    #[command(flatten)]
    ledger: LedgerArgs,

    #[command(flatten)]
    period: PeriodArgs,

    /// Label language: en or cy
    #[arg(long, default_value = "en")]
    language: Language,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Tabled)]
struct PreviewRow {
    #[tabled(rename = "Box")]
    number: u8,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

impl PreviewCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let service = self.ledger.open()?;
        let preview = service.get_vat_return_preview(
            self.ledger.user(),
            self.period.start(),
            self.period.end(),
            &self.period.options()?,
            self.language,
        )?;

        if self.json {
            print_json(&preview)
        } else {
            print_preview(&preview)
        }
    }
}

fn print_preview(preview: &VatReturnPreview) -> anyhow::Result<()> {
    let rows: Vec<PreviewRow> = preview
        .summary
        .boxes
        .iter()
        .map(|line| PreviewRow {
            number: line.key.number(),
            name: line.name.clone(),
            description: line.description.clone(),
            amount: format_gbp(line.value),
        })
        .collect();

    println!();
    println!(
        "VAT RETURN PREVIEW ({}, {} accounting)",
        preview.result.period, preview.result.scheme
    );
    println!();
    println!(
        "{}",
        Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Columns::new(3..)).with(Alignment::right()))
    );
    println!("{}", net_vat_line(&preview.result.boxes.values));
    println!();
    println!("SUBMISSION");
    println!("{}", serde_json::to_string_pretty(&preview.submission)?);
    Ok(())
}
