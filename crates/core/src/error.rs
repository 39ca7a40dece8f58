//! Core Error Types
//!
//! Errors raised while parsing or validating the verification domain types.
//! Kept dependency-free (only thiserror + serde_json) so the core crate stays
//! lightweight; the engine crate wraps these into its own error taxonomy.

use thiserror::Error;

/// Core error type for the verification domain.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A value could not be parsed into one of the closed enums
    #[error("Parse error: {0}")]
    Parse(String),

    /// A value parsed but violates a domain invariant
    #[error("Validation error: {0}")]
    Validation(String),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for core errors
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

impl From<CoreError> for String {
    fn from(err: CoreError) -> String {
        err.to_string()
    }
}
