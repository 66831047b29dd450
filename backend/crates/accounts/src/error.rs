//! Account Error Types
//!
//! Account-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use kernel::validation::FieldErrors;
use platform::document::StoreError;
use thiserror::Error;

/// Account-specific result type alias
pub type AccountResult<T> = Result<T, AccountError>;

/// Account-specific error variants
#[derive(Debug, Error)]
pub enum AccountError {
    /// Input failed the user validator
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// Email already registered (compared case-insensitively)
    #[error("Email is already registered")]
    EmailTaken,

    /// User not found
    #[error("User not found")]
    UserNotFound,

    /// Unknown email or wrong password (deliberately indistinguishable)
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Missing or malformed requester identity
    #[error("Authentication required")]
    Unauthenticated,

    /// Persistence unreachable
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AccountError {
    /// Single-field validation error
    pub fn invalid(field: &str, message: &str) -> Self {
        AccountError::Validation(FieldErrors::single(field, message))
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AccountError::Validation(_) => StatusCode::BAD_REQUEST,
            AccountError::EmailTaken => StatusCode::CONFLICT,
            AccountError::UserNotFound => StatusCode::NOT_FOUND,
            AccountError::InvalidCredentials | AccountError::Unauthenticated => {
                StatusCode::UNAUTHORIZED
            }
            AccountError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AccountError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AccountError::Validation(_) => ErrorKind::BadRequest,
            AccountError::EmailTaken => ErrorKind::Conflict,
            AccountError::UserNotFound => ErrorKind::NotFound,
            AccountError::InvalidCredentials | AccountError::Unauthenticated => {
                ErrorKind::Unauthorized
            }
            AccountError::StorageUnavailable(_) => ErrorKind::ServiceUnavailable,
            AccountError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        match self {
            AccountError::Validation(fields) => AppError::validation(fields.clone())
                .with_action("Please correct the highlighted fields"),
            AccountError::EmailTaken => AppError::conflict(self.to_string())
                .with_action("Sign in instead, or use a different email"),
            AccountError::Unauthenticated => {
                AppError::unauthorized(self.to_string()).with_action("Please sign in")
            }
            // Storage details stay in the logs
            AccountError::StorageUnavailable(_) => AppError::service_unavailable(
                "User storage is temporarily unavailable",
            )
            .with_action("Please try again later"),
            AccountError::Internal(_) => AppError::internal("Internal server error"),
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AccountError::StorageUnavailable(msg) => {
                tracing::error!(message = %msg, "Account storage unavailable");
            }
            AccountError::Internal(msg) => {
                tracing::error!(message = %msg, "Account internal error");
            }
            AccountError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            _ => {
                tracing::debug!(error = %self, "Account error");
            }
        }
    }
}

impl IntoResponse for AccountError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<FieldErrors> for AccountError {
    fn from(fields: FieldErrors) -> Self {
        AccountError::Validation(fields)
    }
}

impl From<StoreError> for AccountError {
    fn from(err: StoreError) -> Self {
        match err {
            // The only unique key on users is the canonical email
            StoreError::Duplicate { .. } => AccountError::EmailTaken,
            e if e.is_unavailable() => AccountError::StorageUnavailable(e.to_string()),
            e => AccountError::Internal(e.to_string()),
        }
    }
}
