//! Schema command - print expected input formats

use clap::Args;
use schemars::schema_for;
use vatc::core::{AccountingScheme, SETTLED_STATUSES};
use vatc::ledger::{LedgerInput, TransactionRow};

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format: json-schema, csv-header or csv-fields
    #[arg(value_enum, default_value = "json-schema")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for the ledger file
    JsonSchema,
    /// CSV header row with column names
    CsvHeader,
    /// CSV column descriptions
    CsvFields,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::JsonSchema => {
                let schema = schema_for!(LedgerInput);
                println!("{}", serde_json::to_string_pretty(&schema)?);
            }
            SchemaFormat::CsvHeader => println!("{}", TransactionRow::csv_header()),
            SchemaFormat::CsvFields => print_csv_fields(),
        }
        Ok(())
    }
}

fn print_csv_fields() {
    println!("CSV Input Format");
    println!("================");
    println!();
    for column in TransactionRow::csv_columns() {
        let req = if column.required { "required" } else { "optional" };
        println!("{:12} ({:8})  {}", column.name, req, column.description);
    }
    println!();
    let settled: Vec<_> = SETTLED_STATUSES.iter().map(|s| s.as_str()).collect();
    println!(
        "Schemes: {}. Cash accounting counts only {} records.",
        AccountingScheme::ALL.map(|s| s.as_str()).join(", "),
        settled.join("/")
    );
}
