//! Judge Error Types
//!
//! Judge-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Judge-specific result type alias
pub type JudgeResult<T> = Result<T, JudgeError>;

/// Failure to hand a job to the broker
#[derive(Debug, Error)]
#[error("{message}")]
pub struct DispatchError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl DispatchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Judge-specific error variants
#[derive(Debug, Error)]
pub enum JudgeError {
    /// Acting for another user, or reading someone else's data
    #[error("Unauthorized")]
    NotPermitted,

    #[error("problem not found")]
    ProblemNotFound,

    #[error("event not found")]
    EventNotFound,

    #[error("problem is not part of this event")]
    ProblemNotInEvent,

    #[error("language does not exist")]
    LanguageNotFound,

    #[error("user does not exist")]
    UserNotFound,

    /// Event not running, or the user is not registered for it
    #[error("cannot submit to this event")]
    EventClosed,

    #[error("submission not found")]
    SubmissionNotFound,

    /// Unknown or already consumed scratch run
    #[error("submission not found")]
    ScratchRunNotFound,

    /// Malformed worker verdict
    #[error("{0}")]
    InvalidVerdict(&'static str),

    /// Second verdict for a graded submission
    #[error("submission already has a verdict")]
    SubmissionAlreadyCompleted,

    /// Second result for a scratch run
    #[error("result already reported")]
    ScratchRunAlreadyCompleted,

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    /// The job could not be published
    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl JudgeError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            JudgeError::NotPermitted => ErrorKind::Unauthorized,
            JudgeError::ProblemNotFound
            | JudgeError::EventNotFound
            | JudgeError::LanguageNotFound
            | JudgeError::UserNotFound
            | JudgeError::SubmissionNotFound
            | JudgeError::ScratchRunNotFound => ErrorKind::NotFound,
            JudgeError::ProblemNotInEvent | JudgeError::InvalidVerdict(_) => {
                ErrorKind::InvalidArgument
            }
            JudgeError::EventClosed => ErrorKind::Forbidden,
            JudgeError::SubmissionAlreadyCompleted | JudgeError::ScratchRunAlreadyCompleted => {
                ErrorKind::Conflict
            }
            JudgeError::RateLimited => ErrorKind::RateLimited,
            JudgeError::Dispatch(_) | JudgeError::Database(_) | JudgeError::Internal(_) => {
                ErrorKind::Internal
            }
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        match self {
            JudgeError::Dispatch(_) => {
                AppError::internal("error dispatching job").with_action("Retry later")
            }
            JudgeError::Database(_) => AppError::internal("Database error").with_code("DATABASE_ERROR"),
            JudgeError::Internal(_) => AppError::internal("Internal error"),
            JudgeError::RateLimited => {
                AppError::rate_limited(self.to_string()).with_action("Wait before retrying")
            }
            other => AppError::new(other.kind(), other.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            JudgeError::Database(e) => {
                tracing::error!(error = %e, "Judge database error");
            }
            JudgeError::Dispatch(e) => {
                tracing::error!(error = %e, "Job dispatch failed");
            }
            JudgeError::Internal(msg) => {
                tracing::error!(message = %msg, "Judge internal error");
            }
            JudgeError::NotPermitted => {
                tracing::warn!("Caller tried to act for another user");
            }
            JudgeError::RateLimited => {
                tracing::warn!("Rate limit exceeded");
            }
            JudgeError::SubmissionAlreadyCompleted | JudgeError::ScratchRunAlreadyCompleted => {
                tracing::warn!(error = %self, "Duplicate worker callback");
            }
            _ => {
                tracing::debug!(error = %self, "Judge error");
            }
        }
    }
}

impl From<JudgeError> for AppError {
    fn from(err: JudgeError) -> Self {
        err.log();
        err.to_app_error()
    }
}

impl IntoResponse for JudgeError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(JudgeError::NotPermitted.to_app_error().status_code(), 401);
        assert_eq!(JudgeError::ProblemNotFound.to_app_error().status_code(), 404);
        assert_eq!(JudgeError::ProblemNotInEvent.to_app_error().status_code(), 400);
        assert_eq!(JudgeError::EventClosed.to_app_error().status_code(), 403);
        assert_eq!(
            JudgeError::SubmissionAlreadyCompleted.to_app_error().status_code(),
            409
        );
        assert_eq!(
            JudgeError::Dispatch(DispatchError::new("broker gone"))
                .to_app_error()
                .status_code(),
            500
        );
    }

    #[test]
    fn test_rate_limited_body() {
        let err = JudgeError::RateLimited.to_app_error();
        assert_eq!(err.status_code(), 429);
        assert_eq!(err.code(), "RATE_LIMIT_EXCEEDED");
        assert_eq!(err.message(), "Rate limit exceeded. Please try again later.");
    }

    #[test]
    fn test_internal_details_hidden() {
        let err = JudgeError::Internal("connection string leaked".to_string()).to_app_error();
        assert!(!err.message().contains("leaked"));
    }
}
