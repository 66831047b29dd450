//! Marketplace Error Types
//!
//! Marketplace-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use accounts::AccountError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use kernel::validation::FieldErrors;
use platform::document::StoreError;
use thiserror::Error;

use crate::domain::value_objects::{ApplicationStatus, JobStatus};

/// Marketplace-specific result type alias
pub type MarketResult<T> = Result<T, MarketError>;

/// Marketplace-specific error variants
#[derive(Debug, Error)]
pub enum MarketError {
    /// Input failed an entity validator
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// Referenced entity does not exist ("Product", "Job", "Review", ...)
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Requester is not the owning party
    #[error("{0}")]
    Forbidden(String),

    /// Applicant already has a record for this job
    #[error("You have already applied to this job")]
    DuplicateApplication,

    /// Attempted change on a terminal (or otherwise disallowed) application state
    #[error("Cannot change application status from {from} to {to}")]
    InvalidTransition {
        from: ApplicationStatus,
        to: ApplicationStatus,
    },

    /// Job is not accepting applications
    #[error("This job is {0} and no longer accepts applications")]
    JobClosed(JobStatus),

    /// Persistence unreachable
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl MarketError {
    /// Single-field validation error
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        MarketError::Validation(FieldErrors::single(field, message))
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            MarketError::Validation(_) => StatusCode::BAD_REQUEST,
            MarketError::NotFound(_) => StatusCode::NOT_FOUND,
            MarketError::Forbidden(_) => StatusCode::FORBIDDEN,
            MarketError::DuplicateApplication
            | MarketError::InvalidTransition { .. }
            | MarketError::JobClosed(_) => StatusCode::CONFLICT,
            MarketError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            MarketError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            MarketError::Validation(_) => ErrorKind::BadRequest,
            MarketError::NotFound(_) => ErrorKind::NotFound,
            MarketError::Forbidden(_) => ErrorKind::Forbidden,
            MarketError::DuplicateApplication
            | MarketError::InvalidTransition { .. }
            | MarketError::JobClosed(_) => ErrorKind::Conflict,
            MarketError::StorageUnavailable(_) => ErrorKind::ServiceUnavailable,
            MarketError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        match self {
            MarketError::Validation(fields) => AppError::validation(fields.clone())
                .with_action("Please correct the highlighted fields"),
            MarketError::DuplicateApplication => AppError::conflict(self.to_string())
                .with_action("Check the status of your existing application"),
            MarketError::StorageUnavailable(_) => AppError::service_unavailable(
                "Marketplace storage is temporarily unavailable",
            )
            .with_action("Please try again later"),
            MarketError::Internal(_) => AppError::internal("Internal server error"),
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            MarketError::StorageUnavailable(msg) => {
                tracing::error!(message = %msg, "Marketplace storage unavailable");
            }
            MarketError::Internal(msg) => {
                tracing::error!(message = %msg, "Marketplace internal error");
            }
            MarketError::Forbidden(msg) => {
                tracing::warn!(message = %msg, "Forbidden marketplace operation");
            }
            _ => {
                tracing::debug!(error = %self, "Marketplace error");
            }
        }
    }
}

impl IntoResponse for MarketError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<FieldErrors> for MarketError {
    fn from(fields: FieldErrors) -> Self {
        MarketError::Validation(fields)
    }
}

impl From<StoreError> for MarketError {
    fn from(err: StoreError) -> Self {
        match err {
            e if e.is_unavailable() => MarketError::StorageUnavailable(e.to_string()),
            e => MarketError::Internal(e.to_string()),
        }
    }
}

impl From<AccountError> for MarketError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::Validation(fields) => MarketError::Validation(fields),
            AccountError::UserNotFound => MarketError::NotFound("User"),
            AccountError::StorageUnavailable(msg) => MarketError::StorageUnavailable(msg),
            other => MarketError::Internal(other.to_string()),
        }
    }
}
