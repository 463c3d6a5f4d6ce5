//! CSV transaction import

use super::{LedgerError, TransactionEntry, DEFAULT_USER_ID};
use crate::core::{checked_hmrc_round, MoneyAmount, RecordKind, RecordStatus};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;
use vatc_derive::CsvColumns;

/// Column metadata for CSV input, generated by `#[derive(CsvColumns)]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvColumn {
    pub name: &'static str,
    pub required: bool,
    pub description: &'static str,
}

#[derive(Debug, Deserialize, CsvColumns)]
pub struct TransactionRow {
    /// Unique transaction identifier
    pub id: String,
    /// Owner of the transaction (defaults to 1)
    pub user_id: Option<i64>,
    /// Transaction date (YYYY-MM-DD)
    pub date: NaiveDate,
    /// income or expense
    pub kind: RecordKind,
    /// Net amount excluding VAT, in pence; fractions round half up
    #[serde(rename = "net")]
    pub amount: Decimal,
    /// VAT amount, in pence; fractions round half up
    #[serde(rename = "vat")]
    pub vat_amount: Decimal,
    /// pending, confirmed, cleared, reconciled, void, ...
    #[serde(default)]
    pub status: RecordStatus,
    /// Free text description
    pub description: Option<String>,
}

impl TryFrom<TransactionRow> for TransactionEntry {
    type Error = LedgerError;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        let pence = |column: &'static str, value: Decimal| -> Result<MoneyAmount, LedgerError> {
            checked_hmrc_round(value).ok_or_else(|| LedgerError::AmountOutOfRange {
                id: row.id.clone(),
                column,
                value,
            })
        };
        let amount = pence("net", row.amount)?;
        let vat_amount = pence("vat", row.vat_amount)?;

        Ok(TransactionEntry {
            id: row.id,
            user_id: row.user_id.unwrap_or(DEFAULT_USER_ID),
            date: row.date,
            kind: row.kind,
            amount,
            vat_amount,
            status: row.status,
            description: row.description.filter(|d| !d.is_empty()),
        })
    }
}

pub fn read_transactions_csv<R: Read>(reader: R) -> Result<Vec<TransactionEntry>, LedgerError> {
    let mut rdr = ::csv::ReaderBuilder::new().trim(::csv::Trim::All).from_reader(reader);
    let mut entries = Vec::new();
    for row in rdr.deserialize::<TransactionRow>() {
        entries.push(TransactionEntry::try_from(row?)?);
    }
    log::info!("Read {} csv transactions", entries.len());
    Ok(entries)
}
