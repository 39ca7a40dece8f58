//! Error Handling
//!
//! Unified error type for the verification engine.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

use cyrano_verify_core::CoreError;

/// Engine-wide error type
#[derive(Error, Debug)]
pub enum VerificationError {
    /// Custom mode resolved but no assignments could be found
    #[error("Invalid mode: {0}")]
    InvalidMode(String),

    /// No provider passed availability validation
    #[error("No AI provider configured: {0}")]
    NoProviderConfigured(String),

    /// A specifically named provider is unusable
    #[error("Provider '{provider}' failed validation: {reason}")]
    ProviderValidation { provider: String, reason: String },

    /// One assignment failed; recorded on its result, never returned from execute
    #[error("Assignment execution failed: {0}")]
    AssignmentExecution(String),

    /// Malformed request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Database errors
    #[error("Database error: {0}")]
    Database(String),

    /// SQLite errors (auto-converted from rusqlite::Error)
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for engine errors
pub type VerificationResult<T> = Result<T, VerificationError>;

impl VerificationError {
    pub fn invalid_mode(msg: impl Into<String>) -> Self {
        Self::InvalidMode(msg.into())
    }

    pub fn no_provider(msg: impl Into<String>) -> Self {
        Self::NoProviderConfigured(msg.into())
    }

    pub fn provider_validation(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ProviderValidation {
            provider: provider.into(),
            reason: reason.into(),
        }
    }

    pub fn assignment(msg: impl Into<String>) -> Self {
        Self::AssignmentExecution(msg.into())
    }

    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// True for errors raised before any model call was made.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidMode(_)
                | Self::NoProviderConfigured(_)
                | Self::ProviderValidation { .. }
                | Self::InvalidRequest(_)
        )
    }
}

impl From<CoreError> for VerificationError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Serialization(e) => Self::Serialization(e),
            other => Self::InvalidRequest(other.to_string()),
        }
    }
}

/// Flatten to a message for callers that only carry strings
impl From<VerificationError> for String {
    fn from(err: VerificationError) -> String {
        err.to_string()
    }
}
