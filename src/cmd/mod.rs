pub mod calculate;
pub mod check;
pub mod compare;
pub mod estimate;
pub mod prepare;
pub mod preview;
pub mod schema;
pub mod stats;

use anyhow::Context;
use clap::Args;
use std::path::PathBuf;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};
use vatc::core::{
    box_label, format_gbp, resolve_scheme, BoxValues, CalculationOptions, CalculationService,
    Language,
};
use vatc::ledger::{LedgerStore, DEFAULT_USER_ID};

/// Where the records come from and whose they are
#[derive(Args, Debug)]
pub struct LedgerArgs {
    /// JSON ledger or CSV transaction file ("-" reads JSON from stdin)
    #[arg(short, long)]
    ledger: PathBuf,

    /// User whose records to use
    #[arg(short, long, default_value_t = DEFAULT_USER_ID)]
    user: i64,
}

impl LedgerArgs {
    pub fn user(&self) -> i64 {
        self.user
    }

    pub fn open(&self) -> anyhow::Result<CalculationService<LedgerStore>> {
        let store = LedgerStore::open(&self.ledger)
            .with_context(|| format!("Failed to read ledger {}", self.ledger.display()))?;
        Ok(CalculationService::new(store))
    }
}

/// A VAT period and the scheme to calculate it under
#[derive(Args, Debug)]
pub struct PeriodArgs {
    /// First day of the period (YYYY-MM-DD)
    #[arg(long)]
    start: String,

    /// Last day of the period, inclusive (YYYY-MM-DD)
    #[arg(long)]
    end: String,

    /// Accounting scheme: standard or cash
    #[arg(long)]
    scheme: Option<String>,
}

impl PeriodArgs {
    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn end(&self) -> &str {
        &self.end
    }

    pub fn options(&self) -> anyhow::Result<CalculationOptions> {
        let scheme = resolve_scheme(self.scheme.as_deref())?;
        Ok(CalculationOptions::with_scheme(scheme))
    }
}

#[derive(Debug, Clone, Tabled)]
struct BoxRow {
    #[tabled(rename = "Box")]
    number: u8,
    #[tabled(rename = "Description")]
    name: &'static str,
    #[tabled(rename = "Amount")]
    amount: String,
}

/// Render the nine boxes with their labels
pub fn box_table(values: &BoxValues, language: Language) -> String {
    let rows: Vec<BoxRow> = values
        .iter()
        .map(|(key, value)| BoxRow {
            number: key.number(),
            name: box_label(key, language).name,
            amount: format_gbp(value),
        })
        .collect();
    Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(2..)).with(Alignment::right()))
        .to_string()
}

/// Net VAT line shared by the text outputs
pub fn net_vat_line(values: &BoxValues) -> String {
    if values.is_refund_due() {
        format!("Refund due from HMRC: {}", format_gbp(-values.box5))
    } else {
        format!("VAT payable to HMRC: {}", format_gbp(values.box5))
    }
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
