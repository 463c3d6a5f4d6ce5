//! VAT box calculation.
//!
//! Every function here is pure: callers hand in records that were already
//! selected for the period and scheme, and get box values back. Box 2, 8 and 9
//! cover EU trade and are fixed at zero since the UK left the EU.

use super::boxes::{BoxKey, BoxMetadata, BoxSet, BoxValues};
use super::i18n::{box_label, Language};
use super::money::{checked_sum, round_to_pounds, to_major, AmountOverflow, MoneyAmount};
use super::record::{AccountingScheme, FinancialRecord, PeriodRecords};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which records supply box 1 and box 6
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputSource {
    /// Sales invoices, excluding void and cancelled ones
    Invoices,
    /// Income transactions, excluding void ones
    IncomeTransactions,
}

/// Standard accounting reads sales invoices when there are any, and falls back
/// to income transactions otherwise. Cash accounting never reads invoices.
pub fn output_source(invoices: &[FinancialRecord], scheme: AccountingScheme) -> OutputSource {
    match scheme {
        AccountingScheme::Standard if !invoices.is_empty() => OutputSource::Invoices,
        _ => OutputSource::IncomeTransactions,
    }
}

fn output_records<'a>(
    income: &'a [FinancialRecord],
    invoices: &'a [FinancialRecord],
    scheme: AccountingScheme,
) -> impl Iterator<Item = &'a FinancialRecord> {
    let source = output_source(invoices, scheme);
    let records = match source {
        OutputSource::Invoices => invoices,
        OutputSource::IncomeTransactions => income,
    };
    records.iter().filter(move |r| match source {
        OutputSource::Invoices => !r.status.is_void() && !r.status.is_cancelled(),
        OutputSource::IncomeTransactions => !r.status.is_void(),
    })
}

fn input_records(expenses: &[FinancialRecord]) -> impl Iterator<Item = &FinancialRecord> {
    expenses.iter().filter(|r| !r.status.is_void())
}

/// Box 1: VAT due on sales and other outputs
pub fn calculate_box1(
    income: &[FinancialRecord],
    invoices: &[FinancialRecord],
    scheme: AccountingScheme,
) -> Result<MoneyAmount, AmountOverflow> {
    checked_sum(
        output_records(income, invoices, scheme).map(|r| r.vat_amount),
        "box 1",
    )
}

/// Box 2: VAT due on EU acquisitions (always zero)
pub fn calculate_box2() -> MoneyAmount {
    0
}

/// Box 3: total VAT due
pub fn calculate_box3(
    box1: MoneyAmount,
    box2: MoneyAmount,
) -> Result<MoneyAmount, AmountOverflow> {
    box1.checked_add(box2).ok_or(AmountOverflow("box 3"))
}

/// Box 4: VAT reclaimed on purchases and other inputs.
///
/// The scheme has already decided which expenses were fetched, so the filter
/// here is the same for both.
pub fn calculate_box4(
    expenses: &[FinancialRecord],
    _scheme: AccountingScheme,
) -> Result<MoneyAmount, AmountOverflow> {
    checked_sum(input_records(expenses).map(|r| r.vat_amount), "box 4")
}

/// Box 5: net VAT, negative when a refund is due
pub fn calculate_box5(
    box3: MoneyAmount,
    box4: MoneyAmount,
) -> Result<MoneyAmount, AmountOverflow> {
    box3.checked_sub(box4).ok_or(AmountOverflow("box 5"))
}

/// Box 6: total sales excluding VAT, from the same records as box 1
pub fn calculate_box6(
    income: &[FinancialRecord],
    invoices: &[FinancialRecord],
    scheme: AccountingScheme,
) -> Result<MoneyAmount, AmountOverflow> {
    checked_sum(
        output_records(income, invoices, scheme).map(|r| r.net_amount),
        "box 6",
    )
}

/// Box 7: total purchases excluding VAT, from the same records as box 4
pub fn calculate_box7(
    expenses: &[FinancialRecord],
    _scheme: AccountingScheme,
) -> Result<MoneyAmount, AmountOverflow> {
    checked_sum(input_records(expenses).map(|r| r.net_amount), "box 7")
}

/// Box 8: supplies of goods to the EU (always zero)
pub fn calculate_box8() -> MoneyAmount {
    0
}

/// Box 9: acquisitions of goods from the EU (always zero)
pub fn calculate_box9() -> MoneyAmount {
    0
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoxOptions {
    pub scheme: AccountingScheme,
    /// Round to whole pounds, for submission-grade figures only
    pub round_to_pounds: bool,
}

/// Compute all nine boxes, stamped with the current time.
///
/// Fails only when a total leaves the range of [`MoneyAmount`].
pub fn calculate_all_boxes(
    records: &PeriodRecords,
    options: BoxOptions,
) -> Result<BoxSet, AmountOverflow> {
    calculate_all_boxes_at(records, options, Utc::now())
}

/// [`calculate_all_boxes`] with an explicit `calculated_at`
pub fn calculate_all_boxes_at(
    records: &PeriodRecords,
    options: BoxOptions,
    calculated_at: DateTime<Utc>,
) -> Result<BoxSet, AmountOverflow> {
    let BoxOptions {
        scheme,
        round_to_pounds: whole_pounds,
    } = options;
    let round = |amount: MoneyAmount| {
        if whole_pounds {
            round_to_pounds(amount)
        } else {
            amount
        }
    };

    // Rounding happens on the source boxes so that 3 and 5 still add up
    let box1 = round(calculate_box1(&records.income, &records.invoices, scheme)?);
    let box2 = round(calculate_box2());
    let box3 = calculate_box3(box1, box2)?;
    let box4 = round(calculate_box4(&records.expenses, scheme)?);
    let box5 = calculate_box5(box3, box4)?;
    let box6 = round(calculate_box6(&records.income, &records.invoices, scheme)?);
    let box7 = round(calculate_box7(&records.expenses, scheme)?);
    let box8 = round(calculate_box8());
    let box9 = round(calculate_box9());

    log::debug!(
        "Boxes ({}): box1={} box3={} box4={} box5={} box6={} box7={} from {} income, {} expense, {} invoice records",
        scheme,
        box1,
        box3,
        box4,
        box5,
        box6,
        box7,
        records.income.len(),
        records.expenses.len(),
        records.invoices.len()
    );

    Ok(BoxSet {
        values: BoxValues {
            box1,
            box2,
            box3,
            box4,
            box5,
            box6,
            box7,
            box8,
            box9,
        },
        metadata: BoxMetadata {
            scheme,
            income_count: records.income.len(),
            expense_count: records.expenses.len(),
            invoice_count: records.invoices.len(),
            calculated_at,
            rounded_to_pounds: whole_pounds,
        },
    })
}

/// An inconsistency found in a set of box values
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BoxCheck {
    #[error("Box 3 should be {expected} (box 1 + box 2) but is {actual}")]
    Box3Mismatch {
        expected: MoneyAmount,
        actual: MoneyAmount,
    },
    #[error("Box 5 should be {expected} (box 3 - box 4) but is {actual}")]
    Box5Mismatch {
        expected: MoneyAmount,
        actual: MoneyAmount,
    },
    #[error("{key} cannot be negative, got {value}")]
    Negative { key: BoxKey, value: MoneyAmount },
    #[error("{key} must be 0 for UK returns, got {value}")]
    LegacyNonZero { key: BoxKey, value: MoneyAmount },
    #[error("{key} cannot be re-derived without overflowing")]
    Overflow { key: BoxKey },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxValidation {
    pub is_valid: bool,
    pub errors: Vec<BoxCheck>,
}

/// Re-derive boxes 3 and 5 and check sign and EU rules on the rest
pub fn validate_box_calculations(values: &BoxValues) -> BoxValidation {
    let mut errors = Vec::new();

    match calculate_box3(values.box1, values.box2) {
        Ok(expected) if expected != values.box3 => errors.push(BoxCheck::Box3Mismatch {
            expected,
            actual: values.box3,
        }),
        Ok(_) => {}
        Err(_) => errors.push(BoxCheck::Overflow { key: BoxKey::Box3 }),
    }

    match calculate_box5(values.box3, values.box4) {
        Ok(expected) if expected != values.box5 => errors.push(BoxCheck::Box5Mismatch {
            expected,
            actual: values.box5,
        }),
        Ok(_) => {}
        Err(_) => errors.push(BoxCheck::Overflow { key: BoxKey::Box5 }),
    }

    for (key, value) in values.iter() {
        if !key.allows_negative() && value < 0 {
            errors.push(BoxCheck::Negative { key, value });
        }
    }

    for (key, value) in values.iter().filter(|(key, _)| key.is_legacy_eu()) {
        if value != 0 {
            errors.push(BoxCheck::LegacyNonZero { key, value });
        }
    }

    BoxValidation {
        is_valid: errors.is_empty(),
        errors,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxSummaryLine {
    pub key: BoxKey,
    pub value: MoneyAmount,
    pub value_major: Decimal,
    pub name: String,
    pub description: String,
}

/// Box values with labels in the requested language
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationSummary {
    pub language: Language,
    pub boxes: Vec<BoxSummaryLine>,
    pub vat_due: MoneyAmount,
    pub vat_reclaimed: MoneyAmount,
    pub net_vat: MoneyAmount,
    pub is_refund_due: bool,
}

pub fn create_calculation_summary(values: &BoxValues, language: Language) -> CalculationSummary {
    let boxes = values
        .iter()
        .map(|(key, value)| {
            let label = box_label(key, language);
            BoxSummaryLine {
                key,
                value,
                value_major: to_major(value),
                name: label.name.to_string(),
                description: label.description.to_string(),
            }
        })
        .collect();

    CalculationSummary {
        language,
        boxes,
        vat_due: values.box3,
        vat_reclaimed: values.box4,
        net_vat: values.box5,
        is_refund_due: values.is_refund_due(),
    }
}

/// Box values in pounds, keyed by the field names of the HMRC VAT return API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    #[serde(rename = "vatDueSales", with = "rust_decimal::serde::float")]
    pub vat_due_sales: Decimal,
    #[serde(rename = "vatDueAcquisitions", with = "rust_decimal::serde::float")]
    pub vat_due_acquisitions: Decimal,
    #[serde(rename = "totalVatDue", with = "rust_decimal::serde::float")]
    pub total_vat_due: Decimal,
    #[serde(rename = "vatReclaimedCurrPeriod", with = "rust_decimal::serde::float")]
    pub vat_reclaimed_curr_period: Decimal,
    #[serde(rename = "netVatDue", with = "rust_decimal::serde::float")]
    pub net_vat_due: Decimal,
    #[serde(rename = "totalValueSalesExVAT", with = "rust_decimal::serde::float")]
    pub total_value_sales_ex_vat: Decimal,
    #[serde(rename = "totalValuePurchasesExVAT", with = "rust_decimal::serde::float")]
    pub total_value_purchases_ex_vat: Decimal,
    #[serde(rename = "totalValueGoodsSuppliedExVAT", with = "rust_decimal::serde::float")]
    pub total_value_goods_supplied_ex_vat: Decimal,
    #[serde(rename = "totalAcquisitionsExVAT", with = "rust_decimal::serde::float")]
    pub total_acquisitions_ex_vat: Decimal,
}

pub fn format_for_submission(values: &BoxValues) -> SubmissionPayload {
    SubmissionPayload {
        vat_due_sales: to_major(values.box1),
        vat_due_acquisitions: to_major(values.box2),
        total_vat_due: to_major(values.box3),
        vat_reclaimed_curr_period: to_major(values.box4),
        net_vat_due: to_major(values.box5),
        total_value_sales_ex_vat: to_major(values.box6),
        total_value_purchases_ex_vat: to_major(values.box7),
        total_value_goods_supplied_ex_vat: to_major(values.box8),
        total_acquisitions_ex_vat: to_major(values.box9),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record::{RecordKind, RecordStatus};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 15).unwrap()
    }

    fn income(status: &str, amount: MoneyAmount, vat: MoneyAmount) -> FinancialRecord {
        FinancialRecord::transaction(RecordKind::Income, status, date(), amount, vat)
    }

    fn expense(status: &str, amount: MoneyAmount, vat: MoneyAmount) -> FinancialRecord {
        FinancialRecord::transaction(RecordKind::Expense, status, date(), amount, vat)
    }

    fn invoice(status: &str, subtotal: MoneyAmount, vat: MoneyAmount) -> FinancialRecord {
        FinancialRecord::invoice(status, date(), subtotal, vat)
    }

    fn fixed_time() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-04-01T09:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn standard() -> BoxOptions {
        BoxOptions {
            scheme: AccountingScheme::Standard,
            round_to_pounds: false,
        }
    }

    fn cash() -> BoxOptions {
        BoxOptions {
            scheme: AccountingScheme::Cash,
            round_to_pounds: false,
        }
    }

    #[test]
    fn standard_scheme_refund_scenario() {
        let records = PeriodRecords {
            income: vec![],
            expenses: vec![expense("cleared", 25000, 5000)],
            invoices: vec![invoice("pending", 20000, 4000)],
        };

        let set = calculate_all_boxes(&records, standard()).unwrap();
        let v = set.values;
        assert_eq!(v.box1, 4000);
        assert_eq!(v.box2, 0);
        assert_eq!(v.box3, 4000);
        assert_eq!(v.box4, 5000);
        assert_eq!(v.box5, -1000);
        assert_eq!(v.box6, 20000);
        assert_eq!(v.box7, 25000);
        assert_eq!(v.box8, 0);
        assert_eq!(v.box9, 0);
        assert!(v.is_refund_due());
        assert_eq!(set.metadata.invoice_count, 1);
        assert_eq!(set.metadata.scheme, AccountingScheme::Standard);
    }

    #[test]
    fn cash_scheme_scenario() {
        let records = PeriodRecords {
            income: vec![
                income("confirmed", 10000, 2000),
                income("confirmed", 5000, 1000),
            ],
            expenses: vec![expense("cleared", 25000, 5000)],
            invoices: vec![],
        };

        let v = calculate_all_boxes(&records, cash()).unwrap().values;
        assert_eq!(v.box1, 3000);
        assert_eq!(v.box3, 3000);
        assert_eq!(v.box4, 5000);
        assert_eq!(v.box5, -2000);
        assert_eq!(v.box6, 15000);
        assert_eq!(v.box7, 25000);
    }

    #[test]
    fn empty_period_is_all_zero() {
        let set = calculate_all_boxes(&PeriodRecords::default(), standard()).unwrap();
        assert_eq!(set.values, BoxValues::default());
        assert!(validate_box_calculations(&set.values).is_valid);
    }

    #[test]
    fn standard_scheme_prefers_invoices_over_income() {
        let income = vec![income("cleared", 99999, 19999)];
        let invoices = vec![invoice("sent", 1000, 200)];
        let scheme = AccountingScheme::Standard;

        assert_eq!(output_source(&invoices, scheme), OutputSource::Invoices);
        assert_eq!(calculate_box1(&income, &invoices, scheme), Ok(200));
        assert_eq!(calculate_box6(&income, &invoices, scheme), Ok(1000));
    }

    #[test]
    fn standard_scheme_falls_back_to_income_without_invoices() {
        let income = vec![income("cleared", 1000, 200), income("void", 5000, 1000)];
        let scheme = AccountingScheme::Standard;

        assert_eq!(output_source(&[], scheme), OutputSource::IncomeTransactions);
        assert_eq!(calculate_box1(&income, &[], scheme), Ok(200));
        assert_eq!(calculate_box6(&income, &[], scheme), Ok(1000));
    }

    #[test]
    fn void_and_cancelled_invoices_excluded() {
        let invoices = vec![
            invoice("paid", 1000, 200),
            invoice("void", 2000, 400),
            invoice("cancelled", 3000, 600),
        ];
        let scheme = AccountingScheme::Standard;
        assert_eq!(calculate_box1(&[], &invoices, scheme), Ok(200));
        assert_eq!(calculate_box6(&[], &invoices, scheme), Ok(1000));
    }

    #[test]
    fn all_invoices_cancelled_still_selects_invoices() {
        // The fallback only applies when no invoices were supplied at all
        let income = vec![income("cleared", 1000, 200)];
        let invoices = vec![invoice("cancelled", 3000, 600)];
        assert_eq!(
            calculate_box1(&income, &invoices, AccountingScheme::Standard),
            Ok(0)
        );
    }

    #[test]
    fn cash_scheme_ignores_invoices() {
        let income = vec![income("cleared", 1000, 200)];
        let invoices = vec![invoice("paid", 5000, 1000)];
        let scheme = AccountingScheme::Cash;
        assert_eq!(calculate_box1(&income, &invoices, scheme), Ok(200));
        assert_eq!(calculate_box6(&income, &invoices, scheme), Ok(1000));
    }

    #[test]
    fn void_expenses_excluded_under_both_schemes() {
        let expenses = vec![expense("reconciled", 1000, 200), expense("void", 500, 100)];
        for scheme in AccountingScheme::ALL {
            assert_eq!(calculate_box4(&expenses, scheme), Ok(200));
            assert_eq!(calculate_box7(&expenses, scheme), Ok(1000));
        }
    }

    #[test]
    fn legacy_boxes_always_zero() {
        assert_eq!(calculate_box2(), 0);
        assert_eq!(calculate_box8(), 0);
        assert_eq!(calculate_box9(), 0);
    }

    #[test]
    fn pound_rounding_keeps_boxes_consistent() {
        let records = PeriodRecords {
            income: vec![income("cleared", 10049, 1050)],
            expenses: vec![expense("cleared", 5050, 1049)],
            invoices: vec![],
        };
        let options = BoxOptions {
            scheme: AccountingScheme::Standard,
            round_to_pounds: true,
        };
        let set = calculate_all_boxes(&records, options).unwrap();
        let v = set.values;
        assert_eq!(v.box1, 1100);
        assert_eq!(v.box4, 1000);
        assert_eq!(v.box3, 1100);
        assert_eq!(v.box5, 100);
        assert_eq!(v.box6, 10000);
        assert_eq!(v.box7, 5100);
        assert!(set.metadata.rounded_to_pounds);
        assert!(validate_box_calculations(&v).is_valid);
    }

    #[test]
    fn identical_inputs_give_identical_boxes() {
        let records = PeriodRecords {
            income: vec![income("cleared", 1234, 247)],
            expenses: vec![expense("cleared", 999, 200)],
            invoices: vec![invoice("sent", 5000, 1000)],
        };
        let first = calculate_all_boxes_at(&records, standard(), fixed_time()).unwrap();
        let second = calculate_all_boxes_at(&records, standard(), fixed_time()).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn validation_flags_box3_mismatch() {
        let values = BoxValues {
            box1: 4000,
            box3: 4001,
            box5: 4001,
            ..Default::default()
        };
        let result = validate_box_calculations(&values);
        assert!(!result.is_valid);
        assert_eq!(
            result.errors,
            vec![BoxCheck::Box3Mismatch {
                expected: 4000,
                actual: 4001
            }]
        );
    }

    #[test]
    fn validation_flags_box5_mismatch() {
        let values = BoxValues {
            box1: 4000,
            box3: 4000,
            box4: 1000,
            box5: 2000,
            ..Default::default()
        };
        let result = validate_box_calculations(&values);
        assert_eq!(
            result.errors,
            vec![BoxCheck::Box5Mismatch {
                expected: 3000,
                actual: 2000
            }]
        );
    }

    #[test]
    fn validation_flags_non_zero_box2() {
        let values = BoxValues {
            box1: 100,
            box2: 50,
            box3: 150,
            box5: 150,
            ..Default::default()
        };
        let result = validate_box_calculations(&values);
        assert!(!result.is_valid);
        assert!(result.errors.contains(&BoxCheck::LegacyNonZero {
            key: BoxKey::Box2,
            value: 50
        }));
    }

    #[test]
    fn validation_flags_negatives_but_not_box5() {
        let values = BoxValues {
            box4: 1000,
            box5: -1000,
            box7: -5,
            ..Default::default()
        };
        let result = validate_box_calculations(&values);
        assert_eq!(
            result.errors,
            vec![BoxCheck::Negative {
                key: BoxKey::Box7,
                value: -5
            }]
        );
    }

    #[test]
    fn totals_beyond_i64_are_errors() {
        let huge = 5_000_000_000_000_000_000;
        let records = PeriodRecords {
            income: vec![income("cleared", 100, huge), income("cleared", 100, huge)],
            expenses: vec![],
            invoices: vec![],
        };
        assert_eq!(
            calculate_all_boxes(&records, cash()),
            Err(AmountOverflow("box 1"))
        );

        let expenses = vec![expense("cleared", huge, 1), expense("cleared", huge, 1)];
        assert_eq!(
            calculate_box7(&expenses, AccountingScheme::Cash),
            Err(AmountOverflow("box 7"))
        );
        assert_eq!(calculate_box4(&expenses, AccountingScheme::Cash), Ok(2));
    }

    #[test]
    fn refund_beyond_i64_is_an_error() {
        let records = PeriodRecords {
            income: vec![income("cleared", 0, i64::MIN + 1)],
            expenses: vec![expense("cleared", 0, 2)],
            invoices: vec![],
        };
        assert_eq!(
            calculate_all_boxes(&records, cash()),
            Err(AmountOverflow("box 5"))
        );
    }

    #[test]
    fn pound_rounding_near_the_limit() {
        let records = PeriodRecords {
            income: vec![income("cleared", i64::MAX, i64::MAX)],
            expenses: vec![],
            invoices: vec![],
        };
        let options = BoxOptions {
            scheme: AccountingScheme::Cash,
            round_to_pounds: true,
        };
        let v = calculate_all_boxes(&records, options).unwrap().values;
        assert_eq!(v.box1, i64::MAX - 7);
        assert_eq!(v.box5, i64::MAX - 7);
    }

    #[test]
    fn validation_flags_overflow_instead_of_panicking() {
        let values = BoxValues {
            box1: i64::MAX,
            box2: 1,
            box3: i64::MAX,
            box4: -1,
            box5: i64::MAX,
            ..Default::default()
        };
        let result = validate_box_calculations(&values);
        assert!(!result.is_valid);
        assert!(result.errors.contains(&BoxCheck::Overflow { key: BoxKey::Box3 }));
        assert!(result.errors.contains(&BoxCheck::Overflow { key: BoxKey::Box5 }));
    }

    #[test]
    fn validation_messages_are_readable() {
        let check = BoxCheck::Negative {
            key: BoxKey::Box4,
            value: -1,
        };
        assert_eq!(check.to_string(), "Box 4 cannot be negative, got -1");
    }

    #[test]
    fn summary_includes_labels_and_totals() {
        let values = BoxValues {
            box1: 4000,
            box3: 4000,
            box4: 5000,
            box5: -1000,
            box6: 20000,
            box7: 25000,
            ..Default::default()
        };
        let summary = create_calculation_summary(&values, Language::En);
        assert_eq!(summary.boxes.len(), 9);
        assert_eq!(summary.boxes[0].name, "VAT due on sales");
        assert_eq!(summary.boxes[0].value_major, dec!(40.00));
        assert_eq!(summary.vat_due, 4000);
        assert_eq!(summary.vat_reclaimed, 5000);
        assert_eq!(summary.net_vat, -1000);
        assert!(summary.is_refund_due);

        let welsh = create_calculation_summary(&values, Language::Cy);
        assert_eq!(welsh.boxes[0].value, 4000);
        assert_ne!(welsh.boxes[0].name, summary.boxes[0].name);
    }

    #[test]
    fn submission_uses_major_units() {
        let values = BoxValues {
            box1: 123456,
            box3: 123456,
            box4: 100,
            box5: 123356,
            box6: 617280,
            ..Default::default()
        };
        let payload = format_for_submission(&values);
        assert_eq!(payload.vat_due_sales, dec!(1234.56));
        assert_eq!(payload.net_vat_due, dec!(1233.56));
        assert_eq!(payload.total_value_sales_ex_vat, dec!(6172.80));

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["vatDueSales"], serde_json::json!(1234.56));
        assert_eq!(json["totalAcquisitionsExVAT"], serde_json::json!(0.0));
    }

    #[test]
    fn status_helpers_used_for_filtering() {
        // Unknown statuses are neither void nor cancelled, so they count
        let invoices = vec![invoice("disputed", 1000, 200)];
        assert_eq!(
            invoices[0].status,
            RecordStatus::Other("disputed".to_string())
        );
        assert_eq!(
            calculate_box1(&[], &invoices, AccountingScheme::Standard),
            Ok(200)
        );
    }
}
