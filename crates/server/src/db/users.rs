//! Database operations for users.
//!
//! Users are owned by the auth boundary; the core only looks them up by id or
//! email (invite recipients, member names).

use sqlx::PgExecutor;

use shopping_planner_core::Email;

use super::{RepositoryError, map_unique_violation};
use crate::models::User;

/// Constraint guarding one account per email.
pub const EMAIL_UNIQUE: &str = "user_email_unique";

/// Get a user by their email address.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn find_by_email(
    exec: impl PgExecutor<'_>,
    email: &Email,
) -> Result<Option<User>, RepositoryError> {
    let user = sqlx::query_as::<_, User>(
        r"
        SELECT id, full_name, email, created_at
        FROM planner.app_user
        WHERE email = $1
        ",
    )
    .bind(email)
    .fetch_optional(exec)
    .await?;

    Ok(user)
}

/// Create a new user with a pre-hashed password.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if the email already exists.
/// Returns `RepositoryError::Database` for other database errors.
pub async fn create(
    exec: impl PgExecutor<'_>,
    full_name: &str,
    email: &Email,
    password_hash: &str,
) -> Result<User, RepositoryError> {
    sqlx::query_as::<_, User>(
        r"
        INSERT INTO planner.app_user (full_name, email, password_hash)
        VALUES ($1, $2, $3)
        RETURNING id, full_name, email, created_at
        ",
    )
    .bind(full_name)
    .bind(email)
    .bind(password_hash)
    .fetch_one(exec)
    .await
    .map_err(map_unique_violation)
}

#[derive(sqlx::FromRow)]
struct UserWithHash {
    #[sqlx(flatten)]
    user: User,
    password_hash: String,
}

/// Get a user together with their password hash, for login.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn get_password_hash(
    exec: impl PgExecutor<'_>,
    email: &Email,
) -> Result<Option<(User, String)>, RepositoryError> {
    let row = sqlx::query_as::<_, UserWithHash>(
        r"
        SELECT id, full_name, email, created_at, password_hash
        FROM planner.app_user
        WHERE email = $1
        ",
    )
    .bind(email)
    .fetch_optional(exec)
    .await?;

    Ok(row.map(|r| (r.user, r.password_hash)))
}
