//! Domain-level errors.
//!
//! These errors represent business rule violations and domain logic failures.
//! They are independent of infrastructure concerns (HTTP, database).

use thiserror::Error;

/// Domain-specific errors for business rule violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed for a field or input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Referenced record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Record already exists (conflict)
    #[error("{0} already exists")]
    Conflict(String),

    /// Internal domain error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        DomainError::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(what: impl Into<String>) -> Self {
        DomainError::NotFound(what.into())
    }

    /// Create a conflict error
    pub fn conflict(what: impl Into<String>) -> Self {
        DomainError::Conflict(what.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        DomainError::Internal(msg.into())
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
