//! UK VAT return calculation: boxes 1 to 9 from income, expenses and sales
//! invoices, under standard or cash accounting.

pub mod core;
pub mod ledger;
