//! Field-level validation errors.

use core::fmt;

use serde::Serialize;

/// A single invalid field and what is wrong with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Field name as it appears in the JSON payload.
    pub field: &'static str,
    /// Human-readable problem description.
    pub message: String,
}

impl FieldError {
    /// Create a field error.
    #[must_use]
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.message)
    }
}

/// A payload failed validation on one or more fields.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid input: {}", summarize(.0))]
pub struct ValidationError(Vec<FieldError>);

impl ValidationError {
    /// Wrap a list of field errors.
    #[must_use]
    pub const fn new(details: Vec<FieldError>) -> Self {
        Self(details)
    }

    /// The individual field errors.
    #[must_use]
    pub fn details(&self) -> &[FieldError] {
        &self.0
    }

    /// Consume the error and return its field errors.
    #[must_use]
    pub fn into_details(self) -> Vec<FieldError> {
        self.0
    }
}

fn summarize(details: &[FieldError]) -> String {
    details
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
