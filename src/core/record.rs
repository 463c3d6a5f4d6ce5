use super::money::{AmountOverflow, MoneyAmount};
use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Failure to parse one of the closed vocabularies (scheme, language, box key, ...)
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
#[error("unknown {kind} '{value}', expected one of: {expected}")]
pub struct ParseError {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}

/// When VAT liability is recognised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum AccountingScheme {
    /// On invoice issue
    #[default]
    Standard,
    /// On confirmed settlement only
    Cash,
}

impl AccountingScheme {
    pub const ALL: [AccountingScheme; 2] = [AccountingScheme::Standard, AccountingScheme::Cash];

    pub fn as_str(self) -> &'static str {
        match self {
            AccountingScheme::Standard => "standard",
            AccountingScheme::Cash => "cash",
        }
    }

    /// Whether a record with `status` belongs in a return under this scheme
    pub fn admits(self, status: &RecordStatus) -> bool {
        match self {
            AccountingScheme::Standard => !status.is_void() && !status.is_cancelled(),
            AccountingScheme::Cash => status.is_settled(),
        }
    }

    /// Sales invoices only count while liability follows issuance
    pub fn uses_invoices(self) -> bool {
        self == AccountingScheme::Standard
    }
}

impl FromStr for AccountingScheme {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "standard" => Ok(AccountingScheme::Standard),
            "cash" => Ok(AccountingScheme::Cash),
            _ => Err(ParseError {
                kind: "accounting scheme",
                value: s.to_string(),
                expected: "standard, cash",
            }),
        }
    }
}

impl std::fmt::Display for AccountingScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Income,
    Expense,
}

/// Where a normalised record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum RecordSource {
    #[default]
    Transaction,
    Invoice,
}

/// Lifecycle status of a transaction or invoice.
///
/// The vocabulary is open: statuses the engine has no rule for are kept as
/// [`RecordStatus::Other`] and treated as neither void nor settled.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecordStatus {
    #[default]
    Pending,
    Confirmed,
    Cleared,
    Reconciled,
    Paid,
    Draft,
    Sent,
    Overdue,
    Void,
    Cancelled,
    Other(String),
}

/// Statuses that count as confirmed settlement under cash accounting
pub const SETTLED_STATUSES: &[RecordStatus] = &[
    RecordStatus::Confirmed,
    RecordStatus::Cleared,
    RecordStatus::Reconciled,
    RecordStatus::Paid,
];

impl RecordStatus {
    pub fn is_void(&self) -> bool {
        matches!(self, RecordStatus::Void)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, RecordStatus::Cancelled)
    }

    pub fn is_settled(&self) -> bool {
        SETTLED_STATUSES.contains(self)
    }

    pub fn as_str(&self) -> &str {
        match self {
            RecordStatus::Pending => "pending",
            RecordStatus::Confirmed => "confirmed",
            RecordStatus::Cleared => "cleared",
            RecordStatus::Reconciled => "reconciled",
            RecordStatus::Paid => "paid",
            RecordStatus::Draft => "draft",
            RecordStatus::Sent => "sent",
            RecordStatus::Overdue => "overdue",
            RecordStatus::Void => "void",
            RecordStatus::Cancelled => "cancelled",
            RecordStatus::Other(s) => s,
        }
    }
}

impl From<&str> for RecordStatus {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "" | "pending" => RecordStatus::Pending,
            "confirmed" => RecordStatus::Confirmed,
            "cleared" => RecordStatus::Cleared,
            "reconciled" => RecordStatus::Reconciled,
            "paid" => RecordStatus::Paid,
            "draft" => RecordStatus::Draft,
            "sent" => RecordStatus::Sent,
            "overdue" => RecordStatus::Overdue,
            "void" => RecordStatus::Void,
            // Both spellings appear in exported ledgers
            "cancelled" | "canceled" => RecordStatus::Cancelled,
            other => RecordStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for RecordStatus {
    fn from(s: String) -> Self {
        RecordStatus::from(s.as_str())
    }
}

impl From<RecordStatus> for String {
    fn from(status: RecordStatus) -> Self {
        status.as_str().to_string()
    }
}

impl JsonSchema for RecordStatus {
    fn schema_name() -> String {
        "RecordStatus".to_string()
    }

    fn json_schema(gen: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
        String::json_schema(gen)
    }
}

impl std::fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A ledger transaction or sales invoice reduced to what the VAT boxes need
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FinancialRecord {
    #[serde(default)]
    pub id: Option<String>,
    pub kind: RecordKind,
    #[serde(default)]
    pub source: RecordSource,
    #[serde(default)]
    pub status: RecordStatus,
    #[schemars(with = "String")]
    pub date: NaiveDate,
    /// Value excluding VAT, in minor units
    pub net_amount: MoneyAmount,
    /// VAT charged, in minor units
    pub vat_amount: MoneyAmount,
}

impl FinancialRecord {
    pub fn transaction(
        kind: RecordKind,
        status: impl Into<RecordStatus>,
        date: NaiveDate,
        net_amount: MoneyAmount,
        vat_amount: MoneyAmount,
    ) -> Self {
        FinancialRecord {
            id: None,
            kind,
            source: RecordSource::Transaction,
            status: status.into(),
            date,
            net_amount,
            vat_amount,
        }
    }

    /// Sales invoices are always income
    pub fn invoice(
        status: impl Into<RecordStatus>,
        date: NaiveDate,
        subtotal: MoneyAmount,
        vat_amount: MoneyAmount,
    ) -> Self {
        FinancialRecord {
            id: None,
            kind: RecordKind::Income,
            source: RecordSource::Invoice,
            status: status.into(),
            date,
            net_amount: subtotal,
            vat_amount,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn gross_amount(&self) -> Result<MoneyAmount, AmountOverflow> {
        self.net_amount
            .checked_add(self.vat_amount)
            .ok_or(AmountOverflow("gross amount"))
    }
}

/// The records selected for one period: what the box calculator consumes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodRecords {
    pub income: Vec<FinancialRecord>,
    pub expenses: Vec<FinancialRecord>,
    /// Sales invoices; always empty under cash accounting
    pub invoices: Vec<FinancialRecord>,
}

impl PeriodRecords {
    pub fn is_empty(&self) -> bool {
        self.income.is_empty() && self.expenses.is_empty() && self.invoices.is_empty()
    }
}
