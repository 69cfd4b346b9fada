//! Database operations for the notification inbox.

use sqlx::PgExecutor;

use shopping_planner_core::{Email, NotificationId};

use super::RepositoryError;
use crate::models::Notification;

/// Store a notification for an email address.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the insert fails.
pub async fn insert(
    exec: impl PgExecutor<'_>,
    email: &Email,
    message: &str,
    token: Option<&str>,
) -> Result<Notification, RepositoryError> {
    let notification = sqlx::query_as::<_, Notification>(
        r"
        INSERT INTO planner.notification (user_email, message, token)
        VALUES ($1, $2, $3)
        RETURNING id, message, token, read, created_at
        ",
    )
    .bind(email)
    .bind(message)
    .bind(token)
    .fetch_one(exec)
    .await?;

    Ok(notification)
}

/// List notifications addressed to an email, newest first.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn list_for(
    exec: impl PgExecutor<'_>,
    email: &Email,
) -> Result<Vec<Notification>, RepositoryError> {
    let notifications = sqlx::query_as::<_, Notification>(
        r"
        SELECT id, message, token, read, created_at
        FROM planner.notification
        WHERE user_email = $1
        ORDER BY created_at DESC, id DESC
        ",
    )
    .bind(email)
    .fetch_all(exec)
    .await?;

    Ok(notifications)
}

/// Mark one of the recipient's notifications read. Returns false when no
/// notification with that id is addressed to `email`.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the update fails.
pub async fn mark_read(
    exec: impl PgExecutor<'_>,
    id: NotificationId,
    email: &Email,
) -> Result<bool, RepositoryError> {
    let result = sqlx::query(
        r"
        UPDATE planner.notification
        SET read = TRUE
        WHERE id = $1 AND user_email = $2
        ",
    )
    .bind(id)
    .bind(email)
    .execute(exec)
    .await?;

    Ok(result.rows_affected() > 0)
}
