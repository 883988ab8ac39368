//! Error taxonomy shared by the catalog, the store and the engine.

use thiserror::Error;

/// Errors produced by catalog operations, persistence and inference.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FisError {
    /// Malformed or out-of-range term/rule parameters.
    #[error("{0}")]
    Validation(String),

    /// A term, rule or variable referenced by name does not exist.
    #[error("{0}")]
    NotFound(String),

    /// A variable already exists with a conflicting domain or kind, or a
    /// second output variable was attempted.
    #[error("{0}")]
    Consistency(String),

    /// Reading or writing a session document failed.
    #[error("storage failure: {0}")]
    Storage(String),
}

/// Result type for fuzzy inference system operations.
pub type FisResult<T> = Result<T, FisError>;

impl FisError {
    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Creates a consistency error.
    pub fn consistency(message: impl Into<String>) -> Self {
        Self::Consistency(message.into())
    }

    /// Short machine-readable label of the error kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotFound(_) => "not_found",
            Self::Consistency(_) => "consistency",
            Self::Storage(_) => "storage",
        }
    }
}

impl From<std::io::Error> for FisError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for FisError {
    fn from(err: serde_json::Error) -> Self {
        Self::Storage(err.to_string())
    }
}
