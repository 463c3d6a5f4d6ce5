//! File-backed record store.
//!
//! A ledger is a JSON document holding transactions, sales invoices and saved
//! returns, or a CSV file of transactions only. It is loaded once and never
//! written, so every query against it sees the same data.

pub mod csv;

use crate::core::{
    AccountingScheme, FinancialRecord, MoneyAmount, Period, RecordKind, RecordStatus,
    RecordStore, ReturnStatus, SavedReturn, StoreError,
};
use crate::core::store::invoice_admitted;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

pub use self::csv::{read_transactions_csv, CsvColumn, TransactionRow};

pub const DEFAULT_USER_ID: i64 = 1;

fn default_user_id() -> i64 {
    DEFAULT_USER_ID
}

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid ledger JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid CSV: {0}")]
    Csv(#[from] ::csv::Error),
    #[error("duplicate {kind} id: {id}")]
    DuplicateId { kind: &'static str, id: String },
    #[error("{kind} {id} has invalid user id {user_id}")]
    InvalidUser {
        kind: &'static str,
        id: String,
        user_id: i64,
    },
    #[error("no input received, provide a file or pipe data to stdin")]
    EmptyInput,
    #[error("transaction {id}: {column} amount {value} does not fit in pence")]
    AmountOutOfRange {
        id: String,
        column: &'static str,
        value: Decimal,
    },
}

/// Root of the JSON ledger format
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct LedgerInput {
    #[serde(default)]
    pub transactions: Vec<TransactionEntry>,
    #[serde(default)]
    pub invoices: Vec<InvoiceEntry>,
    #[serde(default)]
    pub returns: Vec<SavedReturn>,
}

/// A ledger transaction (money in or out)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TransactionEntry {
    pub id: String,
    #[serde(default = "default_user_id")]
    pub user_id: i64,
    #[schemars(with = "String")]
    pub date: NaiveDate,
    pub kind: RecordKind,
    /// Net amount excluding VAT, in pence
    pub amount: MoneyAmount,
    /// VAT in pence
    pub vat_amount: MoneyAmount,
    #[serde(default)]
    pub status: RecordStatus,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<&TransactionEntry> for FinancialRecord {
    fn from(entry: &TransactionEntry) -> Self {
        FinancialRecord::transaction(
            entry.kind,
            entry.status.clone(),
            entry.date,
            entry.amount,
            entry.vat_amount,
        )
        .with_id(entry.id.clone())
    }
}

/// A sales invoice issued to a customer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct InvoiceEntry {
    pub id: String,
    #[serde(default = "default_user_id")]
    pub user_id: i64,
    #[schemars(with = "String")]
    pub issue_date: NaiveDate,
    /// Invoice total excluding VAT, in pence
    pub subtotal: MoneyAmount,
    pub vat_amount: MoneyAmount,
    #[serde(default)]
    pub status: RecordStatus,
    #[serde(default)]
    pub customer: Option<String>,
}

impl From<&InvoiceEntry> for FinancialRecord {
    fn from(entry: &InvoiceEntry) -> Self {
        FinancialRecord::invoice(
            entry.status.clone(),
            entry.issue_date,
            entry.subtotal,
            entry.vat_amount,
        )
        .with_id(entry.id.clone())
    }
}

#[derive(Debug, Clone, Default)]
pub struct LedgerStore {
    transactions: Vec<TransactionEntry>,
    invoices: Vec<InvoiceEntry>,
    returns: Vec<SavedReturn>,
}

impl LedgerStore {
    pub fn from_input(input: LedgerInput) -> Result<Self, LedgerError> {
        check_ids("transaction", input.transactions.iter().map(|t| (&t.id, t.user_id)))?;
        check_ids("invoice", input.invoices.iter().map(|i| (&i.id, i.user_id)))?;
        check_ids("return", input.returns.iter().map(|r| (&r.id, r.user_id)))?;

        log::debug!(
            "Ledger: {} transactions, {} invoices, {} returns",
            input.transactions.len(),
            input.invoices.len(),
            input.returns.len()
        );
        Ok(LedgerStore {
            transactions: input.transactions,
            invoices: input.invoices,
            returns: input.returns,
        })
    }

    pub fn read_json<R: Read>(reader: R) -> Result<Self, LedgerError> {
        let input: LedgerInput = serde_json::from_reader(reader)?;
        LedgerStore::from_input(input)
    }

    pub fn read_csv<R: Read>(reader: R) -> Result<Self, LedgerError> {
        LedgerStore::from_input(LedgerInput {
            transactions: read_transactions_csv(reader)?,
            ..Default::default()
        })
    }

    /// Load a ledger file; `.csv` files are transaction lists, anything else is
    /// JSON. A path of "-" reads JSON from stdin.
    pub fn open(path: &Path) -> Result<Self, LedgerError> {
        if path.as_os_str() == "-" {
            return read_from_stdin();
        }
        let reader = BufReader::new(File::open(path)?);
        let is_csv = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv {
            LedgerStore::read_csv(reader)
        } else {
            LedgerStore::read_json(reader)
        }
    }

    pub fn saved_return(&self, id: &str) -> Option<&SavedReturn> {
        self.returns.iter().find(|r| r.id == id)
    }

    fn transactions(
        &self,
        user_id: i64,
        kind: RecordKind,
        period: &Period,
        scheme: AccountingScheme,
    ) -> Vec<FinancialRecord> {
        self.transactions
            .iter()
            .filter(|t| {
                t.user_id == user_id
                    && t.kind == kind
                    && period.contains(t.date)
                    && scheme.admits(&t.status)
            })
            .map(FinancialRecord::from)
            .collect()
    }
}

fn read_from_stdin() -> Result<LedgerStore, LedgerError> {
    let mut buffer = Vec::new();
    io::stdin().lock().read_to_end(&mut buffer)?;
    if buffer.is_empty() {
        return Err(LedgerError::EmptyInput);
    }
    LedgerStore::read_json(io::Cursor::new(buffer))
}

fn check_ids<'a>(
    kind: &'static str,
    entries: impl Iterator<Item = (&'a String, i64)>,
) -> Result<(), LedgerError> {
    let mut seen = HashSet::new();
    for (id, user_id) in entries {
        if user_id <= 0 {
            return Err(LedgerError::InvalidUser {
                kind,
                id: id.clone(),
                user_id,
            });
        }
        if !seen.insert(id) {
            return Err(LedgerError::DuplicateId {
                kind,
                id: id.clone(),
            });
        }
    }
    Ok(())
}

impl RecordStore for LedgerStore {
    fn fetch_income_transactions(
        &self,
        user_id: i64,
        period: &Period,
        scheme: AccountingScheme,
    ) -> Result<Vec<FinancialRecord>, StoreError> {
        Ok(self.transactions(user_id, RecordKind::Income, period, scheme))
    }

    fn fetch_expense_transactions(
        &self,
        user_id: i64,
        period: &Period,
        scheme: AccountingScheme,
    ) -> Result<Vec<FinancialRecord>, StoreError> {
        Ok(self.transactions(user_id, RecordKind::Expense, period, scheme))
    }

    fn fetch_sales_invoices(
        &self,
        user_id: i64,
        period: &Period,
    ) -> Result<Vec<FinancialRecord>, StoreError> {
        Ok(self
            .invoices
            .iter()
            .filter(|i| {
                i.user_id == user_id
                    && period.contains(i.issue_date)
                    && invoice_admitted(&i.status)
            })
            .map(FinancialRecord::from)
            .collect())
    }

    fn fetch_recent_returns(
        &self,
        user_id: i64,
        statuses: &[ReturnStatus],
        limit: usize,
    ) -> Result<Vec<SavedReturn>, StoreError> {
        let mut returns: Vec<SavedReturn> = self
            .returns
            .iter()
            .filter(|r| r.user_id == user_id && statuses.contains(&r.status))
            .cloned()
            .collect();
        returns.sort_by(|a, b| b.period.end().cmp(&a.period.end()));
        returns.truncate(limit);
        Ok(returns)
    }

    fn fetch_returns(&self, user_id: i64, period: &Period) -> Result<Vec<SavedReturn>, StoreError> {
        Ok(self
            .returns
            .iter()
            .filter(|r| r.user_id == user_id && period.contains(r.period.end()))
            .cloned()
            .collect())
    }
}
