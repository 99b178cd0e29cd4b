//! CLI-specific error types
//!
//! Every CLI error ends the process with a non-zero exit code.

use std::fmt;
use std::io;

use crate::store::StoreError;
use crate::views::ViewError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Store configuration or connection failed
    StoreError,
    /// DDL bootstrap failed
    SchemaError,
    /// Templates failed to compile
    ViewError,
    /// Listener could not bind or serve
    ServeError,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::StoreError => "CLI_STORE_ERROR",
            Self::SchemaError => "CLI_SCHEMA_ERROR",
            Self::ViewError => "CLI_VIEW_ERROR",
            Self::ServeError => "CLI_SERVE_ERROR",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        let code = match e {
            StoreError::Schema(_) => CliErrorCode::SchemaError,
            _ => CliErrorCode::StoreError,
        };
        Self::new(code, e.to_string())
    }
}

impl From<ViewError> for CliError {
    fn from(e: ViewError) -> Self {
        Self::new(CliErrorCode::ViewError, e.to_string())
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::new(CliErrorCode::ServeError, e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_code() {
        let err = CliError::from(StoreError::MissingDatabase);
        assert_eq!(err.code(), &CliErrorCode::StoreError);
        assert!(err.to_string().starts_with("CLI_STORE_ERROR: "));
    }

    #[test]
    fn test_schema_errors_keep_their_code() {
        let err = CliError::from(StoreError::Schema(sqlx::Error::PoolClosed));
        assert_eq!(err.code_str(), "CLI_SCHEMA_ERROR");
    }
}
