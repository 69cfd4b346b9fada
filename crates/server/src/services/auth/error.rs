//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A required registration field is missing.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] shopping_planner_core::EmailError),

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// User already exists.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Token missing, malformed, expired or signed with another key.
    #[error("invalid token")]
    InvalidToken(#[source] jsonwebtoken::errors::Error),

    /// Token could not be signed.
    #[error("token signing failed")]
    TokenSigning(#[source] jsonwebtoken::errors::Error),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
