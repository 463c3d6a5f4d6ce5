pub mod boxes;
pub mod calculator;
pub mod error;
pub mod i18n;
pub mod money;
pub mod period;
pub mod record;
pub mod service;
pub mod store;

// Flat public surface for domain types and functions.
pub use boxes::{BoxKey, BoxMetadata, BoxSet, BoxValues};
pub use calculator::{
    calculate_all_boxes, calculate_all_boxes_at, calculate_box1, calculate_box2, calculate_box3,
    calculate_box4, calculate_box5, calculate_box6, calculate_box7, calculate_box8,
    calculate_box9, create_calculation_summary, format_for_submission, output_source,
    validate_box_calculations, BoxCheck, BoxOptions, BoxSummaryLine, BoxValidation,
    CalculationSummary, OutputSource, SubmissionPayload,
};
pub use error::{FieldErrors, ServiceError};
pub use i18n::{box_label, BoxLabel, Language};
pub use money::{
    checked_hmrc_round, checked_sum, format_gbp, hmrc_round, hmrc_round_str, round_to_pounds,
    to_major, AmountOverflow, MoneyAmount, MINOR_UNITS,
};
pub use period::{parse_date, Period, PeriodError};
pub use record::{
    AccountingScheme, FinancialRecord, ParseError, PeriodRecords, RecordKind, RecordSource,
    RecordStatus, SETTLED_STATUSES,
};
pub use service::{
    compare_box_values, resolve_scheme, validate_against_saved, validate_calculation_params,
    BoxChange, Breakdown, CalculationOptions, CalculationResult, CalculationService,
    CategoryTotals, Discrepancy, DraftReturn, EstimateOptions, LiabilityEstimate,
    ParamValidation, PeriodComparison, ResultSummary, ReturnTotals, SavedComparison,
    SourceBreakdown, VatReturnPreview, VatStatistics, DEFAULT_PERIODS_TO_AVERAGE,
};
pub use store::{RecordStore, ReturnStatus, SavedReturn, StoreError};
