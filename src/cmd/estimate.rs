//! Estimate command - next liability from recent filed returns

use crate::cmd::{box_table, net_vat_line, print_json, LedgerArgs};
use clap::Args;
use vatc::core::{EstimateOptions, Language, DEFAULT_PERIODS_TO_AVERAGE};

#[derive(Args, Debug)]
pub struct EstimateCommand {
    #[command(flatten)]
    ledger: LedgerArgs,

    /// Number of recent submitted or accepted returns to average
    #[arg(short, long, default_value_t = DEFAULT_PERIODS_TO_AVERAGE)]
    periods: usize,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

impl EstimateCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let service = self.ledger.open()?;
        let estimate = service.estimate_vat_liability(
            self.ledger.user(),
            &EstimateOptions {
                periods_to_average: self.periods,
            },
        )?;

        if self.json {
            return print_json(&estimate);
        }

        println!();
        match estimate.averages {
            Some(ref averages) => {
                println!(
                    "ESTIMATED LIABILITY (average of {} return(s))",
                    estimate.periods_used
                );
                println!();
                println!("{}", box_table(averages, Language::En));
                println!("{}", net_vat_line(averages));
            }
            None => println!("No submitted or accepted returns to estimate from"),
        }
        Ok(())
    }
}
