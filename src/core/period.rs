use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PeriodError {
    #[error("date must be in YYYY-MM-DD format: {0}")]
    Format(String),
    #[error("not a valid calendar date: {0}")]
    InvalidDate(String),
    #[error("period end {end} is before period start {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
    #[error("year out of range: {0}")]
    YearOutOfRange(i32),
}

/// Parse a strict `YYYY-MM-DD` date (zero padded, no time component)
pub fn parse_date(raw: &str) -> Result<NaiveDate, PeriodError> {
    if !has_iso_date_shape(raw) {
        return Err(PeriodError::Format(raw.to_string()));
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| PeriodError::InvalidDate(raw.to_string()))
}

fn has_iso_date_shape(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// An inclusive range of calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(try_from = "PeriodFields")]
pub struct Period {
    #[schemars(with = "String")]
    start: NaiveDate,
    #[schemars(with = "String")]
    end: NaiveDate,
}

#[derive(Deserialize)]
struct PeriodFields {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<PeriodFields> for Period {
    type Error = PeriodError;

    fn try_from(fields: PeriodFields) -> Result<Self, Self::Error> {
        Period::new(fields.start, fields.end)
    }
}

impl Period {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, PeriodError> {
        if end < start {
            return Err(PeriodError::EndBeforeStart { start, end });
        }
        Ok(Period { start, end })
    }

    pub fn parse(start: &str, end: &str) -> Result<Self, PeriodError> {
        Period::new(parse_date(start)?, parse_date(end)?)
    }

    /// 1 January to 31 December of `year`
    pub fn calendar_year(year: i32) -> Result<Self, PeriodError> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1).ok_or(PeriodError::YearOutOfRange(year))?;
        let end = NaiveDate::from_ymd_opt(year, 12, 31).ok_or(PeriodError::YearOutOfRange(year))?;
        Period::new(start, end)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format(DATE_FORMAT),
            self.end.format(DATE_FORMAT)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parse_strict_format() {
        assert_eq!(parse_date("2024-04-01"), Ok(date(2024, 4, 1)));
        assert!(matches!(parse_date("2024-4-1"), Err(PeriodError::Format(_))));
        assert!(matches!(parse_date("01/04/2024"), Err(PeriodError::Format(_))));
        assert!(matches!(parse_date("2024-04-01T00:00"), Err(PeriodError::Format(_))));
    }

    #[test]
    fn parse_rejects_impossible_dates() {
        assert!(matches!(parse_date("2024-02-30"), Err(PeriodError::InvalidDate(_))));
        assert!(matches!(parse_date("2023-13-01"), Err(PeriodError::InvalidDate(_))));
        assert_eq!(parse_date("2024-02-29"), Ok(date(2024, 2, 29)));
    }

    #[test]
    fn period_bounds_are_inclusive() {
        let period = Period::parse("2024-01-01", "2024-03-31").unwrap();
        assert!(period.contains(date(2024, 1, 1)));
        assert!(period.contains(date(2024, 3, 31)));
        assert!(!period.contains(date(2023, 12, 31)));
        assert!(!period.contains(date(2024, 4, 1)));
    }

    #[test]
    fn single_day_period_allowed() {
        let period = Period::parse("2024-06-30", "2024-06-30").unwrap();
        assert!(period.contains(date(2024, 6, 30)));
    }

    #[test]
    fn end_before_start_rejected() {
        assert_eq!(
            Period::parse("2024-03-31", "2024-01-01"),
            Err(PeriodError::EndBeforeStart {
                start: date(2024, 3, 31),
                end: date(2024, 1, 1)
            })
        );
    }

    #[test]
    fn deserialize_validates_order() {
        let ok: Period = serde_json::from_str(r#"{"start":"2024-01-01","end":"2024-03-31"}"#).unwrap();
        assert_eq!(ok.end(), date(2024, 3, 31));
        let inverted = serde_json::from_str::<Period>(r#"{"start":"2024-03-31","end":"2024-01-01"}"#);
        assert!(inverted.is_err());
    }

    #[test]
    fn calendar_year_bounds() {
        let year = Period::calendar_year(2024).unwrap();
        assert_eq!(year.start(), date(2024, 1, 1));
        assert_eq!(year.end(), date(2024, 12, 31));
        assert_eq!(year.to_string(), "2024-01-01 to 2024-12-31");
    }
}
