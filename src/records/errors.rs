//! # Record Errors
//!
//! Error taxonomy for the record access layer:
//! - `NotFound`: a lookup by id matched no row
//! - `Validation`: missing/malformed field or dangling reference
//! - `Store`: the store rejected or failed a statement
//! - `Association`: linking employees to a new customer failed and the
//!   whole creation was rolled back

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Result type for record operations
pub type RecordResult<T> = Result<T, RecordError>;

/// Record access errors
#[derive(Debug, Error)]
pub enum RecordError {
    /// No row with this identifier
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// Input rejected before reaching the store
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    /// Statement or connectivity failure
    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),

    /// Association insert failed, customer creation rolled back
    #[error("failed to link employees to the new customer, creation rolled back: {source}")]
    Association {
        #[source]
        source: sqlx::Error,
    },
}

impl RecordError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        RecordError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

impl From<ValidationErrors> for RecordError {
    fn from(errors: ValidationErrors) -> Self {
        RecordError::Validation(errors)
    }
}

/// One rejected form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Form field name (e.g. "company_id")
    pub field: String,
    /// Human readable reason
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// All field errors found in one submission
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Whether any error was recorded against `field`
    pub fn has(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// `Ok(value)` when nothing was recorded, otherwise `Err(self)`
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}
