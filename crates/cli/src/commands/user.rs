//! User management commands.
//!
//! # Usage
//!
//! ```bash
//! sp-cli user create -e ana@example.com -n "Ana Lopez" -p 'correct horse'
//! ```

use shopping_planner_core::{Email, UserId};
use shopping_planner_server::db::{RepositoryError, users};
use shopping_planner_server::services::auth::{AuthError, hash_password, validate_password};

use super::{CommandError, connect};

/// Create a new user.
///
/// # Returns
///
/// The ID of the created user.
///
/// # Errors
///
/// Returns an error if the email is invalid, the password too short, or a
/// user with the email already exists.
pub async fn create(email: &str, name: &str, password: &str) -> Result<UserId, CommandError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AuthError::MissingField("full name").into());
    }
    let email = Email::parse(email).map_err(AuthError::from)?;
    validate_password(password)?;
    let password_hash = hash_password(password)?;

    let pool = connect().await?;

    tracing::info!("Creating user: {}", email);
    let user = users::create(&pool, name, &email, &password_hash)
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
            other => AuthError::Repository(other),
        })?;

    tracing::info!("User created successfully! ID: {}, Email: {}", user.id, user.email);
    Ok(user.id)
}
