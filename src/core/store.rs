//! Read-only access to the records a calculation needs.
//!
//! Storage lives outside the engine; anything able to answer these queries can
//! back a [`crate::core::CalculationService`].

use super::boxes::BoxValues;
use super::period::Period;
use super::record::{AccountingScheme, FinancialRecord, PeriodRecords, RecordStatus};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record store unavailable: {0}")]
    Unavailable(String),
}

/// Lifecycle of a saved VAT return
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ReturnStatus {
    #[default]
    Draft,
    Submitted,
    Accepted,
    Rejected,
}

impl ReturnStatus {
    /// Returns that made it to HMRC and can inform estimates
    pub const FILED: [ReturnStatus; 2] = [ReturnStatus::Submitted, ReturnStatus::Accepted];
}

/// A VAT return previously persisted by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SavedReturn {
    pub id: String,
    pub user_id: i64,
    pub period: Period,
    pub status: ReturnStatus,
    #[serde(default)]
    pub scheme: AccountingScheme,
    #[serde(flatten)]
    pub boxes: BoxValues,
}

pub trait RecordStore {
    /// Income transactions dated within `period` that `scheme` admits
    fn fetch_income_transactions(
        &self,
        user_id: i64,
        period: &Period,
        scheme: AccountingScheme,
    ) -> Result<Vec<FinancialRecord>, StoreError>;

    /// Expense transactions dated within `period` that `scheme` admits
    fn fetch_expense_transactions(
        &self,
        user_id: i64,
        period: &Period,
        scheme: AccountingScheme,
    ) -> Result<Vec<FinancialRecord>, StoreError>;

    /// Sales invoices issued within `period`, excluding void and cancelled ones
    fn fetch_sales_invoices(
        &self,
        user_id: i64,
        period: &Period,
    ) -> Result<Vec<FinancialRecord>, StoreError>;

    /// Up to `limit` returns with a status in `statuses`, latest period end first
    fn fetch_recent_returns(
        &self,
        user_id: i64,
        statuses: &[ReturnStatus],
        limit: usize,
    ) -> Result<Vec<SavedReturn>, StoreError>;

    /// All returns whose period ends within `period`
    fn fetch_returns(&self, user_id: i64, period: &Period) -> Result<Vec<SavedReturn>, StoreError>;

    /// Everything one calculation reads.
    ///
    /// The default makes independent queries, so a write landing between them
    /// can be seen by one and not the others. Stores that can read from a
    /// single snapshot should override this.
    fn fetch_period_records(
        &self,
        user_id: i64,
        period: &Period,
        scheme: AccountingScheme,
    ) -> Result<PeriodRecords, StoreError> {
        let income = self.fetch_income_transactions(user_id, period, scheme)?;
        let expenses = self.fetch_expense_transactions(user_id, period, scheme)?;
        let invoices = if scheme.uses_invoices() {
            self.fetch_sales_invoices(user_id, period)?
        } else {
            Vec::new()
        };
        Ok(PeriodRecords {
            income,
            expenses,
            invoices,
        })
    }
}

/// Status filter shared by store implementations
pub fn invoice_admitted(status: &RecordStatus) -> bool {
    AccountingScheme::Standard.admits(status)
}
