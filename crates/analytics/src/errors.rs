//! Core error types for the analytics engine.
//!
//! Degenerate statistics (too little history, empty portfolios) are not errors;
//! they resolve to documented zero values. Only rejected input, unusable
//! configuration, and collaborator failures surface here.

use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the analytics engine.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Failed to load configuration: {0}")]
    ConfigIO(String),

    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Calculation failed: {0}")]
    Calculation(#[from] CalculatorError),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    /// Shorthand for an `InvalidInput` validation failure on `field`.
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Validation(ValidationError::InvalidInput {
            field: field.into(),
            message: message.into(),
        })
    }

    /// Returns the offending field name when this is an input validation error.
    pub fn invalid_field(&self) -> Option<&str> {
        match self {
            Error::Validation(ValidationError::InvalidInput { field, .. }) => Some(field),
            _ => None,
        }
    }
}

/// Validation errors for caller-supplied input.
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Invalid input for '{field}': {message}")]
    InvalidInput { field: String, message: String },
}

/// Errors raised while evaluating formulas on already-validated input.
#[derive(Error, Debug)]
pub enum CalculatorError {
    #[error("Numeric overflow while computing {0}")]
    Overflow(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidConfigValue(err.to_string())
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
