//! Calculation service: validates requests, pulls the records for a period
//! from a [`RecordStore`] and turns them into VAT return results.

use super::boxes::{BoxKey, BoxSet, BoxValues};
use super::calculator::{
    calculate_all_boxes, calculate_box1, calculate_box4, calculate_box6, calculate_box7,
    create_calculation_summary, format_for_submission, output_source, validate_box_calculations,
    BoxOptions, BoxValidation, CalculationSummary, OutputSource, SubmissionPayload,
};
use super::error::{FieldErrors, ServiceError};
use super::i18n::Language;
use super::money::{checked_hmrc_round, AmountOverflow, MoneyAmount};
use super::period::{parse_date, Period};
use super::record::{AccountingScheme, FinancialRecord, PeriodRecords};
use super::store::{RecordStore, ReturnStatus, SavedReturn};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

pub const DEFAULT_PERIODS_TO_AVERAGE: usize = 4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CalculationOptions {
    pub scheme: AccountingScheme,
    /// Attach per-source counts and contributions to the result
    pub include_breakdown: bool,
    /// Round every box to whole pounds
    pub round_to_pounds: bool,
}

impl CalculationOptions {
    pub fn with_scheme(scheme: AccountingScheme) -> Self {
        CalculationOptions {
            scheme,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EstimateOptions {
    pub periods_to_average: usize,
}

impl Default for EstimateOptions {
    fn default() -> Self {
        EstimateOptions {
            periods_to_average: DEFAULT_PERIODS_TO_AVERAGE,
        }
    }
}

/// Resolve a scheme name supplied as text; no name means standard accounting
pub fn resolve_scheme(raw: Option<&str>) -> Result<AccountingScheme, ServiceError> {
    match raw {
        None => Ok(AccountingScheme::default()),
        Some(name) => name.parse().map_err(|_| {
            ServiceError::field(
                "accounting_scheme",
                "Accounting scheme must be one of: standard, cash",
            )
        }),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamValidation {
    pub is_valid: bool,
    pub errors: FieldErrors,
}

/// Check the inputs every calculation shares. Never fails; problems are reported per field.
pub fn validate_calculation_params(
    user_id: i64,
    period_start: &str,
    period_end: &str,
) -> ParamValidation {
    let mut errors = FieldErrors::new();

    if user_id <= 0 {
        errors.add("user_id", "User ID must be a positive integer");
    }

    let start = parse_date(period_start);
    if start.is_err() {
        errors.add(
            "period_start",
            "Period start must be a valid date in YYYY-MM-DD format",
        );
    }
    let end = parse_date(period_end);
    if end.is_err() {
        errors.add(
            "period_end",
            "Period end must be a valid date in YYYY-MM-DD format",
        );
    }

    if let (Ok(start), Ok(end)) = (start, end) {
        if end < start {
            errors.add("period_end", "Period end must be on or after period start");
        }
    }

    ParamValidation {
        is_valid: errors.is_empty(),
        errors,
    }
}

fn checked_period(user_id: i64, start: &str, end: &str) -> Result<Period, ServiceError> {
    let validation = validate_calculation_params(user_id, start, end);
    if !validation.is_valid {
        return Err(ServiceError::Validation(validation.errors));
    }
    Ok(Period::parse(start, end)?)
}

fn check_user(user_id: i64) -> Result<(), ServiceError> {
    if user_id <= 0 {
        return Err(ServiceError::field(
            "user_id",
            "User ID must be a positive integer",
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultSummary {
    pub vat_due: MoneyAmount,
    pub vat_reclaimed: MoneyAmount,
    pub net_vat: MoneyAmount,
    pub is_refund_due: bool,
    pub total_sales: MoneyAmount,
    pub total_purchases: MoneyAmount,
}

impl From<&BoxValues> for ResultSummary {
    fn from(values: &BoxValues) -> Self {
        ResultSummary {
            vat_due: values.box3,
            vat_reclaimed: values.box4,
            net_vat: values.box5,
            is_refund_due: values.is_refund_due(),
            total_sales: values.box6,
            total_purchases: values.box7,
        }
    }
}

/// What one group of records contributed to the boxes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourceBreakdown {
    pub count: usize,
    /// Contribution to box 1 (outputs) or box 4 (inputs)
    pub vat: MoneyAmount,
    /// Contribution to box 6 (outputs) or box 7 (inputs)
    pub net: MoneyAmount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breakdown {
    pub output_source: OutputSource,
    pub income: SourceBreakdown,
    pub expenses: SourceBreakdown,
    /// Absent under cash accounting, where invoices are not read
    pub invoices: Option<SourceBreakdown>,
}

impl Breakdown {
    fn new(records: &PeriodRecords, scheme: AccountingScheme) -> Result<Self, AmountOverflow> {
        let source = output_source(&records.invoices, scheme);
        let outputs = |selected: OutputSource,
                       records: &[FinancialRecord]|
         -> Result<SourceBreakdown, AmountOverflow> {
            let (income, invoices): (&[FinancialRecord], &[FinancialRecord]) = match selected {
                OutputSource::Invoices => (&[], records),
                OutputSource::IncomeTransactions => (records, &[]),
            };
            if selected == source {
                Ok(SourceBreakdown {
                    count: records.len(),
                    vat: calculate_box1(income, invoices, scheme)?,
                    net: calculate_box6(income, invoices, scheme)?,
                })
            } else {
                Ok(SourceBreakdown {
                    count: records.len(),
                    ..Default::default()
                })
            }
        };

        Ok(Breakdown {
            output_source: source,
            income: outputs(OutputSource::IncomeTransactions, &records.income)?,
            expenses: SourceBreakdown {
                count: records.expenses.len(),
                vat: calculate_box4(&records.expenses, scheme)?,
                net: calculate_box7(&records.expenses, scheme)?,
            },
            invoices: scheme
                .uses_invoices()
                .then(|| outputs(OutputSource::Invoices, &records.invoices))
                .transpose()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalculationResult {
    pub user_id: i64,
    pub period: Period,
    pub scheme: AccountingScheme,
    pub boxes: BoxSet,
    pub summary: ResultSummary,
    pub validation: BoxValidation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<Breakdown>,
}

/// A calculated return shaped for the caller to persist
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DraftReturn {
    pub user_id: i64,
    pub period: Period,
    pub scheme: AccountingScheme,
    pub status: ReturnStatus,
    #[serde(flatten)]
    pub boxes: BoxValues,
    pub calculated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VatReturnPreview {
    pub result: CalculationResult,
    pub summary: CalculationSummary,
    pub submission: SubmissionPayload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoxChange {
    pub key: BoxKey,
    pub current: MoneyAmount,
    pub previous: MoneyAmount,
    pub change: MoneyAmount,
    /// None when the previous value was zero and the current one isn't
    #[serde(with = "rust_decimal::serde::float_option")]
    pub percent_change: Option<Decimal>,
}

impl BoxChange {
    pub fn new(
        key: BoxKey,
        current: MoneyAmount,
        previous: MoneyAmount,
    ) -> Result<Self, AmountOverflow> {
        let change = current
            .checked_sub(previous)
            .ok_or(AmountOverflow("box change"))?;
        let percent_change = match (previous, current) {
            (0, 0) => Some(Decimal::ZERO),
            (0, _) => None,
            _ => Some(
                (Decimal::from(change) / Decimal::from(previous).abs() * Decimal::ONE_HUNDRED)
                    .round_dp(2),
            ),
        };
        Ok(BoxChange {
            key,
            current,
            previous,
            change,
            percent_change,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodComparison {
    pub current: CalculationResult,
    pub previous: CalculationResult,
    pub changes: Vec<BoxChange>,
}

/// Compare two sets of box values box by box
pub fn compare_box_values(
    current: &BoxValues,
    previous: &BoxValues,
) -> Result<Vec<BoxChange>, AmountOverflow> {
    BoxKey::ALL
        .into_iter()
        .map(|key| BoxChange::new(key, current.get(key), previous.get(key)))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LiabilityEstimate {
    /// False when there were no filed returns to average
    pub estimated: bool,
    pub periods_used: usize,
    pub averages: Option<BoxValues>,
    pub estimated_net_vat: Option<MoneyAmount>,
    pub is_estimated_refund: bool,
}

impl LiabilityEstimate {
    fn from_returns(returns: &[SavedReturn]) -> Result<Self, AmountOverflow> {
        if returns.is_empty() {
            return Ok(LiabilityEstimate {
                estimated: false,
                periods_used: 0,
                averages: None,
                estimated_net_vat: None,
                is_estimated_refund: false,
            });
        }

        let count = Decimal::from(returns.len());
        let averages = BoxValues::try_from_fn(|key| {
            returns
                .iter()
                .try_fold(Decimal::ZERO, |total, r| {
                    total.checked_add(Decimal::from(r.boxes.get(key)))
                })
                .and_then(|total| total.checked_div(count))
                .and_then(checked_hmrc_round)
                .ok_or(AmountOverflow("average"))
        })?;

        Ok(LiabilityEstimate {
            estimated: true,
            periods_used: returns.len(),
            averages: Some(averages),
            estimated_net_vat: Some(averages.box5),
            is_estimated_refund: averages.is_refund_due(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryTotals {
    pub count: usize,
    pub net: MoneyAmount,
    pub vat: MoneyAmount,
    pub gross: MoneyAmount,
}

impl CategoryTotals {
    fn of(records: &[FinancialRecord]) -> Result<Self, AmountOverflow> {
        records
            .iter()
            .try_fold(CategoryTotals::default(), |totals, r| {
                Ok::<_, AmountOverflow>(CategoryTotals {
                    count: totals.count + 1,
                    net: add(totals.net, r.net_amount, "net total")?,
                    vat: add(totals.vat, r.vat_amount, "VAT total")?,
                    gross: add(totals.gross, r.gross_amount()?, "gross total")?,
                })
            })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReturnTotals {
    pub count: usize,
    pub by_status: BTreeMap<ReturnStatus, usize>,
    pub total_vat_due: MoneyAmount,
    pub total_vat_reclaimed: MoneyAmount,
    pub total_net_vat: MoneyAmount,
}

impl ReturnTotals {
    fn of(returns: &[SavedReturn]) -> Result<Self, AmountOverflow> {
        returns
            .iter()
            .try_fold(ReturnTotals::default(), |mut totals, r| {
                totals.count += 1;
                *totals.by_status.entry(r.status).or_default() += 1;
                totals.total_vat_due = add(totals.total_vat_due, r.boxes.box3, "VAT due total")?;
                totals.total_vat_reclaimed =
                    add(totals.total_vat_reclaimed, r.boxes.box4, "VAT reclaimed total")?;
                totals.total_net_vat = add(totals.total_net_vat, r.boxes.box5, "net VAT total")?;
                Ok::<_, AmountOverflow>(totals)
            })
    }
}

fn add(
    total: MoneyAmount,
    amount: MoneyAmount,
    what: &'static str,
) -> Result<MoneyAmount, AmountOverflow> {
    total.checked_add(amount).ok_or(AmountOverflow(what))
}

/// Calendar year rollup for reporting; not used for filing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VatStatistics {
    pub year: i32,
    pub period: Period,
    pub income: CategoryTotals,
    pub expenses: CategoryTotals,
    pub invoices: CategoryTotals,
    pub returns: ReturnTotals,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Discrepancy {
    pub key: BoxKey,
    pub saved: MoneyAmount,
    pub calculated: MoneyAmount,
    /// calculated - saved
    pub difference: MoneyAmount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedComparison {
    pub is_valid: bool,
    pub discrepancies: Vec<Discrepancy>,
}

/// Compare saved box values with freshly calculated ones
pub fn validate_against_saved(
    saved: &BoxValues,
    calculated: &BoxValues,
) -> Result<SavedComparison, AmountOverflow> {
    let discrepancies = BoxKey::ALL
        .into_iter()
        .filter(|key| saved.get(*key) != calculated.get(*key))
        .map(|key| {
            Ok::<_, AmountOverflow>(Discrepancy {
                key,
                saved: saved.get(key),
                calculated: calculated.get(key),
                difference: calculated
                    .get(key)
                    .checked_sub(saved.get(key))
                    .ok_or(AmountOverflow("difference"))?,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    for d in &discrepancies {
        log::warn!(
            "{} differs: saved {}, calculated {} ({:+})",
            d.key,
            d.saved,
            d.calculated,
            d.difference
        );
    }

    Ok(SavedComparison {
        is_valid: discrepancies.is_empty(),
        discrepancies,
    })
}

fn prefixed(prefix: &str, err: ServiceError) -> ServiceError {
    match err {
        ServiceError::Validation(errors) => {
            let mut out = FieldErrors::new();
            for (field, message) in errors.iter() {
                out.add(&format!("{prefix}_{field}"), message);
            }
            ServiceError::Validation(out)
        }
        general => general,
    }
}

pub struct CalculationService<S> {
    store: S,
}

impl<S: RecordStore> CalculationService<S> {
    pub fn new(store: S) -> Self {
        CalculationService { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Calculate the nine boxes for a user and period
    pub fn calculate_vat_return(
        &self,
        user_id: i64,
        period_start: &str,
        period_end: &str,
        options: &CalculationOptions,
    ) -> Result<CalculationResult, ServiceError> {
        let period = checked_period(user_id, period_start, period_end)?;
        self.calculate_for_period(user_id, period, options)
    }

    fn calculate_for_period(
        &self,
        user_id: i64,
        period: Period,
        options: &CalculationOptions,
    ) -> Result<CalculationResult, ServiceError> {
        let scheme = options.scheme;
        let records = self
            .store
            .fetch_period_records(user_id, &period, scheme)
            .map_err(|e| ServiceError::unexpected("calculate VAT return", e))?;

        let boxes = calculate_all_boxes(
            &records,
            BoxOptions {
                scheme,
                round_to_pounds: options.round_to_pounds,
            },
        )
        .map_err(|e| ServiceError::unexpected("calculate VAT return", e))?;
        let validation = validate_box_calculations(&boxes.values);
        if !validation.is_valid {
            for error in &validation.errors {
                log::warn!("User {user_id} {period}: {error}");
            }
        }

        log::info!(
            "Calculated VAT return for user {} ({}, {}): net VAT {}",
            user_id,
            period,
            scheme,
            boxes.values.box5
        );

        let breakdown = options
            .include_breakdown
            .then(|| Breakdown::new(&records, scheme))
            .transpose()
            .map_err(|e| ServiceError::unexpected("calculate VAT return", e))?;

        Ok(CalculationResult {
            user_id,
            period,
            scheme,
            summary: ResultSummary::from(&boxes.values),
            boxes,
            validation,
            breakdown,
        })
    }

    /// Calculate and shape the result as a draft return ready to be saved
    pub fn calculate_and_prepare_vat_return(
        &self,
        user_id: i64,
        period_start: &str,
        period_end: &str,
        options: &CalculationOptions,
    ) -> Result<DraftReturn, ServiceError> {
        let result = self.calculate_vat_return(user_id, period_start, period_end, options)?;
        Ok(DraftReturn {
            user_id,
            period: result.period,
            scheme: result.scheme,
            status: ReturnStatus::Draft,
            boxes: result.boxes.values,
            calculated_at: result.boxes.metadata.calculated_at,
        })
    }

    /// Calculate with breakdown, labels and the submission payload. Nothing is saved.
    pub fn get_vat_return_preview(
        &self,
        user_id: i64,
        period_start: &str,
        period_end: &str,
        options: &CalculationOptions,
        language: Language,
    ) -> Result<VatReturnPreview, ServiceError> {
        let options = CalculationOptions {
            include_breakdown: true,
            ..*options
        };
        let result = self.calculate_vat_return(user_id, period_start, period_end, &options)?;
        let summary = create_calculation_summary(&result.boxes.values, language);
        let submission = format_for_submission(&result.boxes.values);
        Ok(VatReturnPreview {
            result,
            summary,
            submission,
        })
    }

    /// Calculate two periods independently and report the change in every box.
    /// Periods are `(start, end)` pairs of `YYYY-MM-DD` dates.
    pub fn compare_vat_periods(
        &self,
        user_id: i64,
        current: (&str, &str),
        previous: (&str, &str),
        options: &CalculationOptions,
    ) -> Result<PeriodComparison, ServiceError> {
        let current_period =
            checked_period(user_id, current.0, current.1).map_err(|e| prefixed("current", e));
        let previous_period =
            checked_period(user_id, previous.0, previous.1).map_err(|e| prefixed("previous", e));

        let (current_period, previous_period) = match (current_period, previous_period) {
            (Ok(c), Ok(p)) => (c, p),
            (Err(ServiceError::Validation(mut a)), Err(ServiceError::Validation(b))) => {
                for (field, message) in b.iter() {
                    a.add(field, message);
                }
                return Err(ServiceError::Validation(a));
            }
            (Err(e), _) | (_, Err(e)) => return Err(e),
        };

        let current = self.calculate_for_period(user_id, current_period, options)?;
        let previous = self.calculate_for_period(user_id, previous_period, options)?;
        let changes = compare_box_values(&current.boxes.values, &previous.boxes.values)
            .map_err(|e| ServiceError::unexpected("compare VAT periods", e))?;

        Ok(PeriodComparison {
            current,
            previous,
            changes,
        })
    }

    /// Average the most recent filed returns to estimate the next liability
    pub fn estimate_vat_liability(
        &self,
        user_id: i64,
        options: &EstimateOptions,
    ) -> Result<LiabilityEstimate, ServiceError> {
        let mut errors = FieldErrors::new();
        if user_id <= 0 {
            errors.add("user_id", "User ID must be a positive integer");
        }
        if options.periods_to_average == 0 {
            errors.add("periods_to_average", "Periods to average must be at least 1");
        }
        if !errors.is_empty() {
            return Err(ServiceError::Validation(errors));
        }

        let returns = self
            .store
            .fetch_recent_returns(user_id, &ReturnStatus::FILED, options.periods_to_average)
            .map_err(|e| ServiceError::unexpected("estimate VAT liability", e))?;
        // Guard against stores that ignore the limit
        let returns = &returns[..returns.len().min(options.periods_to_average)];

        let estimate = LiabilityEstimate::from_returns(returns)
            .map_err(|e| ServiceError::unexpected("estimate VAT liability", e))?;
        if estimate.estimated {
            log::info!(
                "Estimated net VAT for user {} from {} returns: {:?}",
                user_id,
                estimate.periods_used,
                estimate.estimated_net_vat
            );
        } else {
            log::info!("No filed returns to estimate from for user {user_id}");
        }
        Ok(estimate)
    }

    /// Totals of transactions, invoices and saved returns for a calendar year
    pub fn get_vat_statistics(&self, user_id: i64, year: i32) -> Result<VatStatistics, ServiceError> {
        check_user(user_id)?;
        if !(1900..=9999).contains(&year) {
            return Err(ServiceError::field("year", "Year must be between 1900 and 9999"));
        }
        let period = Period::calendar_year(year)?;

        let load = || -> Result<_, super::store::StoreError> {
            let scheme = AccountingScheme::Standard;
            Ok((
                self.store.fetch_income_transactions(user_id, &period, scheme)?,
                self.store.fetch_expense_transactions(user_id, &period, scheme)?,
                self.store.fetch_sales_invoices(user_id, &period)?,
                self.store.fetch_returns(user_id, &period)?,
            ))
        };
        let (income, expenses, invoices, returns) =
            load().map_err(|e| ServiceError::unexpected("load VAT statistics", e))?;

        let totals = || -> Result<_, AmountOverflow> {
            Ok(VatStatistics {
                year,
                period,
                income: CategoryTotals::of(&income)?,
                expenses: CategoryTotals::of(&expenses)?,
                invoices: CategoryTotals::of(&invoices)?,
                returns: ReturnTotals::of(&returns)?,
            })
        };
        totals().map_err(|e| ServiceError::unexpected("load VAT statistics", e))
    }

    /// Recalculate a saved return's period under its scheme and compare
    pub fn recheck_saved_return(&self, saved: &SavedReturn) -> Result<SavedComparison, ServiceError> {
        check_user(saved.user_id)?;
        let result = self.calculate_for_period(
            saved.user_id,
            saved.period,
            &CalculationOptions::with_scheme(saved.scheme),
        )?;
        validate_against_saved(&saved.boxes, &result.boxes.values)
            .map_err(|e| ServiceError::unexpected("recheck saved return", e))
    }
}
