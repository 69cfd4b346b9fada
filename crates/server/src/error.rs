//! Unified error handling with Sentry integration.
//!
//! Every handler returns `Result<T, AppError>`. Errors leave the server as
//!
//! ```json
//! { "error": "not_found", "message": "item not found" }
//! ```
//!
//! where `error` is a stable machine-readable kind. Store and internal error
//! text never reaches the client; those errors are captured to Sentry.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::{ErrorKind, ServiceError};

/// Application-level error type for the planner API.
#[derive(Debug, Error)]
pub enum AppError {
    /// A planner service rejected the operation.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for AppError {
    fn from(e: RepositoryError) -> Self {
        Self::Service(ServiceError::Store(e))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// JSON error body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

const UNAUTHORIZED: &str = "unauthorized";

impl AppError {
    /// HTTP status, wire kind and client-facing message.
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            Self::Service(err) => service_parts(err),
            Self::Auth(err) => auth_parts(err),
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, UNAUTHORIZED, msg.clone()),
            Self::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorKind::Validation.as_str(),
                msg.clone(),
            ),
            Self::Internal(_) => internal(),
        }
    }

    /// Returns true for errors worth reporting to Sentry.
    const fn is_server_error(&self) -> bool {
        match self {
            Self::Service(err) => matches!(
                err.kind(),
                ErrorKind::TransientStore | ErrorKind::Internal
            ),
            Self::Auth(err) => matches!(
                err,
                AuthError::Repository(_) | AuthError::PasswordHash | AuthError::TokenSigning(_)
            ),
            Self::Internal(_) => true,
            Self::Unauthorized(_) | Self::BadRequest(_) => false,
        }
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        ErrorKind::Internal.as_str(),
        "Internal server error".to_string(),
    )
}

fn service_parts(err: &ServiceError) -> (StatusCode, &'static str, String) {
    let kind = err.kind();
    let status = match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict | ErrorKind::InvalidState => StatusCode::CONFLICT,
        ErrorKind::TransientStore => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };

    // Don't expose store error details to clients
    let message = match err {
        ServiceError::Store(RepositoryError::NotFound) => "Not found".to_string(),
        ServiceError::Store(RepositoryError::Conflict(_)) => "Conflicting change".to_string(),
        ServiceError::Store(RepositoryError::Database(_)) => {
            "Storage temporarily unavailable, please retry".to_string()
        }
        ServiceError::Store(RepositoryError::DataCorruption(_)) => {
            "Internal server error".to_string()
        }
        other => other.to_string(),
    };

    (status, kind.as_str(), message)
}

fn auth_parts(err: &AuthError) -> (StatusCode, &'static str, String) {
    match err {
        AuthError::MissingField(_) | AuthError::WeakPassword(_) => (
            StatusCode::BAD_REQUEST,
            ErrorKind::Validation.as_str(),
            err.to_string(),
        ),
        AuthError::InvalidEmail(_) => (
            StatusCode::BAD_REQUEST,
            ErrorKind::Validation.as_str(),
            "Invalid email address".to_string(),
        ),
        AuthError::InvalidCredentials => (
            StatusCode::UNAUTHORIZED,
            UNAUTHORIZED,
            "Invalid credentials".to_string(),
        ),
        AuthError::InvalidToken(_) => (
            StatusCode::UNAUTHORIZED,
            UNAUTHORIZED,
            "Invalid or expired token".to_string(),
        ),
        AuthError::UserAlreadyExists => (
            StatusCode::CONFLICT,
            ErrorKind::Conflict.as_str(),
            "An account with this email already exists".to_string(),
        ),
        AuthError::Repository(RepositoryError::Database(_)) => (
            StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::TransientStore.as_str(),
            "Storage temporarily unavailable, please retry".to_string(),
        ),
        AuthError::Repository(_) | AuthError::PasswordHash | AuthError::TokenSigning(_) => {
            internal()
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let (status, error, message) = self.parts();
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context for the authenticated caller.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_service_error_status_codes() {
        assert_eq!(
            status_of(ServiceError::Validation("x".to_string()).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ServiceError::NotFound("x".to_string()).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(ServiceError::Conflict("x".to_string()).into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(ServiceError::InvalidState("x".to_string()).into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(RepositoryError::Database(sqlx::Error::PoolTimedOut).into()),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_of(AppError::Internal("boom".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_auth_error_status_codes() {
        assert_eq!(
            status_of(AuthError::InvalidCredentials.into()),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(AuthError::UserAlreadyExists.into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(AuthError::MissingField("email").into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::Unauthorized("no token".to_string())),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_kind_and_message() {
        let (_, kind, message) =
            AppError::from(ServiceError::InvalidState("can only archive on Saturday".to_string()))
                .parts();
        assert_eq!(kind, "invalid_state");
        assert_eq!(message, "can only archive on Saturday");
    }

    #[test]
    fn test_store_text_is_not_exposed() {
        let err = AppError::from(RepositoryError::DataCorruption(
            "row 7 has a bad enum".to_string(),
        ));
        let (status, kind, message) = err.parts();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(kind, "internal");
        assert!(!message.contains("row 7"));

        let (_, kind, message) =
            AppError::from(RepositoryError::Database(sqlx::Error::PoolTimedOut)).parts();
        assert_eq!(kind, "transient_store");
        assert!(!message.contains("pool"));
    }
}
