//! Service error types shared by the planner services.

use thiserror::Error;

use shopping_planner_core::{EmailError, ParseEnumError};

use crate::db::RepositoryError;

/// Stable classification of a [`ServiceError`], independent of transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Input was missing or malformed.
    Validation,
    /// The operation conflicts with current state (already in a family, taken token).
    Conflict,
    /// The referenced entity does not exist or is not visible to the caller.
    NotFound,
    /// The operation is not allowed right now (wrong day, nothing to archive).
    InvalidState,
    /// The store failed; retrying may succeed.
    TransientStore,
    /// Stored data could not be interpreted.
    Internal,
}

impl ErrorKind {
    /// Machine-readable name used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Conflict => "conflict",
            Self::NotFound => "not_found",
            Self::InvalidState => "invalid_state",
            Self::TransientStore => "transient_store",
            Self::Internal => "internal",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by the registry, invite, list and join services.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Input was missing or malformed.
    #[error("{0}")]
    Validation(String),

    /// The operation conflicts with current state.
    #[error("{0}")]
    Conflict(String),

    /// The referenced entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The operation is not allowed in the current state.
    #[error("{0}")]
    InvalidState(String),

    /// Repository/database error.
    #[error("store error: {0}")]
    Store(#[from] RepositoryError),
}

impl ServiceError {
    /// Classify this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Conflict(_) | Self::Store(RepositoryError::Conflict(_)) => ErrorKind::Conflict,
            Self::NotFound(_) | Self::Store(RepositoryError::NotFound) => ErrorKind::NotFound,
            Self::InvalidState(_) => ErrorKind::InvalidState,
            Self::Store(RepositoryError::Database(_)) => ErrorKind::TransientStore,
            Self::Store(RepositoryError::DataCorruption(_)) => ErrorKind::Internal,
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub(crate) fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub(crate) fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        Self::Store(RepositoryError::from(e))
    }
}

impl From<EmailError> for ServiceError {
    fn from(e: EmailError) -> Self {
        Self::Validation(format!("invalid email: {e}"))
    }
}

impl From<ParseEnumError> for ServiceError {
    fn from(e: ParseEnumError) -> Self {
        Self::Validation(e.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_are_stable() {
        assert_eq!(ErrorKind::Validation.as_str(), "validation");
        assert_eq!(ErrorKind::Conflict.as_str(), "conflict");
        assert_eq!(ErrorKind::NotFound.as_str(), "not_found");
        assert_eq!(ErrorKind::InvalidState.as_str(), "invalid_state");
        assert_eq!(ErrorKind::TransientStore.as_str(), "transient_store");
        assert_eq!(ErrorKind::Internal.as_str(), "internal");
    }

    #[test]
    fn test_store_errors_are_classified() {
        let err = ServiceError::from(RepositoryError::Database(sqlx::Error::PoolTimedOut));
        assert_eq!(err.kind(), ErrorKind::TransientStore);

        let err = ServiceError::from(RepositoryError::NotFound);
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = ServiceError::from(RepositoryError::Conflict("x".to_owned()));
        assert_eq!(err.kind(), ErrorKind::Conflict);

        let err = ServiceError::from(RepositoryError::DataCorruption("bad".to_owned()));
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_undecodable_row_is_internal() {
        let err = ServiceError::from(sqlx::Error::ColumnDecode {
            index: "role".to_owned(),
            source: "unexpected enum value".into(),
        });
        assert_eq!(err.kind(), ErrorKind::Internal);

        let err = ServiceError::from(sqlx::Error::PoolTimedOut);
        assert_eq!(err.kind(), ErrorKind::TransientStore);
    }

    #[test]
    fn test_bad_status_is_validation() {
        let err: ServiceError = "lost"
            .parse::<shopping_planner_core::ItemStatus>()
            .unwrap_err()
            .into();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.to_string(), "invalid item status: lost");
    }

    #[test]
    fn test_bad_email_is_validation() {
        let err: ServiceError = shopping_planner_core::Email::parse("nope")
            .unwrap_err()
            .into();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
