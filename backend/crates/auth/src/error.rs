//! Auth Error Types
//!
//! Auth-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// No `Authorization` header
    #[error("Authorization header missing")]
    MissingAuthorization,

    /// More than one `Authorization` header value
    #[error("Authorization header requires exactly one value")]
    AmbiguousAuthorization,

    /// Bad signature, wrong algorithm, malformed or expired token
    #[error("Invalid token")]
    InvalidToken(#[source] jsonwebtoken::errors::Error),

    /// Valid token, but the route's predicate rejected it
    #[error("Insufficient role")]
    InsufficientRole,

    /// Trusted-application or worker shared secret mismatch
    #[error("Unauthorized")]
    InvalidSecret,

    /// Unknown basic account or wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Basic registration for an existing account
    #[error("User already exists")]
    UserExists,

    #[error("{0}")]
    InvalidEmail(&'static str),

    #[error("Password validation failed: {0}")]
    PasswordValidation(#[from] platform::password::PasswordPolicyError),

    /// Token could not be signed
    #[error("Token creation failed")]
    TokenCreation(#[source] jsonwebtoken::errors::Error),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::MissingAuthorization
            | AuthError::AmbiguousAuthorization
            | AuthError::InvalidToken(_)
            | AuthError::InsufficientRole
            | AuthError::InvalidSecret
            | AuthError::InvalidCredentials => ErrorKind::Unauthorized,
            AuthError::UserExists => ErrorKind::Conflict,
            AuthError::InvalidEmail(_) | AuthError::PasswordValidation(_) => {
                ErrorKind::InvalidArgument
            }
            AuthError::TokenCreation(_) | AuthError::Database(_) | AuthError::Internal(_) => {
                ErrorKind::Internal
            }
        }
    }

    /// Stable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::UserExists => "USER_EXISTS",
            AuthError::TokenCreation(_) => "TOKEN_ERROR",
            AuthError::Database(_) => "DATABASE_ERROR",
            _ => self.kind().code(),
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        let message = match self {
            // internals stay in the logs
            AuthError::Database(_) => "Database error".to_string(),
            AuthError::Internal(_) => "Internal error".to_string(),
            other => other.to_string(),
        };
        AppError::new(self.kind(), message).with_code(self.code())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::TokenCreation(e) => {
                tracing::error!(error = %e, "Token signing failed");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidToken(e) => {
                tracing::warn!(error = %e, "Rejected session token");
            }
            AuthError::InvalidSecret => {
                tracing::warn!("Privileged login with wrong shared secret");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        err.log();
        err.to_app_error()
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

impl From<platform::password::PasswordHashError> for AuthError {
    fn from(err: platform::password::PasswordHashError) -> Self {
        AuthError::Internal(err.to_string())
    }
}
