//! Calculate command - the nine boxes for one period

use crate::cmd::{box_table, net_vat_line, print_json, LedgerArgs, PeriodArgs};
use clap::Args;
use vatc::core::{format_gbp, Breakdown, CalculationResult, Language, OutputSource};

#[derive(Args, Debug)]
pub struct CalculateCommand {
    #[command(flatten)]
    ledger: LedgerArgs,

    #[command(flatten)]
    period: PeriodArgs,

    /// Show which records contributed to each box
    #[arg(long)]
    breakdown: bool,

    /// Round the boxes to whole pounds
    #[arg(long)]
    round_pounds: bool,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

impl CalculateCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let service = self.ledger.open()?;
        let mut options = self.period.options()?;
        options.include_breakdown = self.breakdown;
        options.round_to_pounds = self.round_pounds;

        let result = service.calculate_vat_return(
            self.ledger.user(),
            self.period.start(),
            self.period.end(),
            &options,
        )?;

        if self.json {
            print_json(&result)
        } else {
            print_result(&result);
            Ok(())
        }
    }
}

fn print_result(result: &CalculationResult) {
    let values = &result.boxes.values;
    let metadata = &result.boxes.metadata;

    println!();
    println!("VAT RETURN ({}, {} accounting)", result.period, result.scheme);
    println!();
    println!("{}", box_table(values, Language::En));
    println!("{}", net_vat_line(values));
    println!(
        "Records: {} income, {} expenses, {} invoices{}",
        metadata.income_count,
        metadata.expense_count,
        metadata.invoice_count,
        if metadata.rounded_to_pounds {
            " (rounded to pounds)"
        } else {
            ""
        }
    );

    if let Some(ref breakdown) = result.breakdown {
        print_breakdown(breakdown);
    }

    if !result.validation.is_valid {
        println!();
        println!("\u{26A0} {} check(s) failed:", result.validation.errors.len());
        for error in &result.validation.errors {
            println!("  - {}", error);
        }
    }
}

fn print_breakdown(breakdown: &Breakdown) {
    let source = match breakdown.output_source {
        OutputSource::Invoices => "sales invoices",
        OutputSource::IncomeTransactions => "income transactions",
    };
    println!();
    println!("BREAKDOWN (outputs from {})", source);
    println!(
        "  Income:   {} records, VAT {}, net {}",
        breakdown.income.count,
        format_gbp(breakdown.income.vat),
        format_gbp(breakdown.income.net)
    );
    if let Some(ref invoices) = breakdown.invoices {
        println!(
            "  Invoices: {} records, VAT {}, net {}",
            invoices.count,
            format_gbp(invoices.vat),
            format_gbp(invoices.net)
        );
    }
    println!(
        "  Expenses: {} records, VAT {}, net {}",
        breakdown.expenses.count,
        format_gbp(breakdown.expenses.vat),
        format_gbp(breakdown.expenses.net)
    );
}
