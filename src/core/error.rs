use super::period::PeriodError;
use serde::Serialize;
use std::collections::BTreeMap;

/// Validation messages keyed by the offending input field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for `field`; the first message per field wins
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.iter().map(|(k, v)| format!("{k}: {v}")).collect();
        f.write_str(&parts.join("; "))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// Malformed or missing input
    #[error("invalid input: {0}")]
    Validation(FieldErrors),
    /// Anything unforeseen, typically a store failure; details go to the log
    #[error("{0}")]
    General(String),
}

impl ServiceError {
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        ServiceError::Validation(FieldErrors::single(field, message))
    }

    /// Field-keyed view; unexpected failures are reported under `general`
    pub fn field_errors(&self) -> FieldErrors {
        match self {
            ServiceError::Validation(errors) => errors.clone(),
            ServiceError::General(message) => FieldErrors::single("general", message.clone()),
        }
    }

    /// Log a store or arithmetic failure and hide its details from the caller
    pub(crate) fn unexpected(context: &str, err: impl std::fmt::Display) -> Self {
        log::error!("{context}: {err}");
        ServiceError::General(format!("Failed to {context}"))
    }
}

impl From<PeriodError> for ServiceError {
    fn from(err: PeriodError) -> Self {
        match err {
            PeriodError::EndBeforeStart { .. } => {
                ServiceError::field("period_end", "Period end must be on or after period start")
            }
            other => ServiceError::field("period", other.to_string()),
        }
    }
}
