//! Unified error handling for the CRM services and the HTTP gateway.
//!
//! Provides a single error type that converts to Axum HTTP responses and
//! absorbs domain and database failures.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::DomainError;
use serde::Serialize;
use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    // Resource errors
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0} already exists")]
    Conflict(String),

    // Validation
    #[error("{0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    BadRequest(String),

    // External service errors
    #[cfg(feature = "database")]
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

/// Error response body for HTTP
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            #[cfg(feature = "database")]
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::BadRequest(msg) => msg.clone(),

            #[cfg(feature = "database")]
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }

            _ => self.to_string(),
        }
    }

    /// True for errors caused by the caller's input
    pub fn is_client_error(&self) -> bool {
        self.status().is_client_error()
    }
}

// =============================================================================
// HTTP Response (Axum)
// =============================================================================

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code().to_string(),
                message: self.user_message(),
            },
        };

        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Domain Error Conversion
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => AppError::Validation(msg),
            DomainError::NotFound(what) => AppError::NotFound(what),
            DomainError::Conflict(msg) => AppError::Conflict(msg),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self, what: impl Into<String>) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, what: impl Into<String>) -> AppResult<T> {
        self.ok_or_else(|| AppError::NotFound(what.into()))
    }
}

/// Convenience constructors
impl AppError {
    pub fn not_found(what: impl Into<String>) -> Self {
        AppError::NotFound(what.into())
    }

    pub fn conflict(entity: impl Into<String>) -> Self {
        AppError::Conflict(entity.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_keep_their_message() {
        let err = AppError::from(DomainError::validation("invalid zip code for new city"));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.user_message(), "invalid zip code for new city");

        let err = AppError::from(DomainError::not_found("Action"));
        assert_eq!(err.code(), "NOT_FOUND");
        assert_eq!(err.user_message(), "Action not found");
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let err = AppError::internal("connection reset");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.user_message(), "An internal error occurred");
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_ok_or_not_found() {
        let missing: Option<u32> = None;
        assert!(matches!(missing.ok_or_not_found("Contact"), Err(AppError::NotFound(what)) if what == "Contact"));
        assert_eq!(Some(3).ok_or_not_found("Contact").unwrap(), 3);
    }
}
