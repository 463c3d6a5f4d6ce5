//! Prepare command - draft return ready to be saved

use crate::cmd::{print_json, LedgerArgs, PeriodArgs};
use clap::Args;

#[derive(Args, Debug)]
pub struct PrepareCommand {
    #[command(flatten)]
    ledger: LedgerArgs,

    #[command(flatten)]
    period: PeriodArgs,
}

impl PrepareCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let service = self.ledger.open()?;
        let draft = service.calculate_and_prepare_vat_return(
            self.ledger.user(),
            self.period.start(),
            self.period.end(),
            &self.period.options()?,
        )?;
        print_json(&draft)
    }
}
