//! Database operations for single-use invites.

use sqlx::PgExecutor;

use shopping_planner_core::{Email, FamilyId, InviteId, UserId};

use super::RepositoryError;
use crate::models::Invite;

/// Insert an invite unless its token is already taken.
///
/// Returns `None` on a token collision so the caller can retry.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the insert fails.
pub async fn insert(
    exec: impl PgExecutor<'_>,
    family_id: FamilyId,
    email: &Email,
    token: &str,
) -> Result<Option<Invite>, RepositoryError> {
    let invite = sqlx::query_as::<_, Invite>(
        r"
        INSERT INTO planner.invite (family_id, email, token)
        VALUES ($1, $2, $3)
        ON CONFLICT ON CONSTRAINT invite_token_unique DO NOTHING
        RETURNING id, family_id, email, token, used_by, used_at, created_at
        ",
    )
    .bind(family_id)
    .bind(email)
    .bind(token)
    .fetch_optional(exec)
    .await?;

    Ok(invite)
}

/// List a family's invites, newest first.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn list_for_family(
    exec: impl PgExecutor<'_>,
    family_id: FamilyId,
) -> Result<Vec<Invite>, RepositoryError> {
    let invites = sqlx::query_as::<_, Invite>(
        r"
        SELECT id, family_id, email, token, used_by, used_at, created_at
        FROM planner.invite
        WHERE family_id = $1
        ORDER BY created_at DESC, id DESC
        ",
    )
    .bind(family_id)
    .fetch_all(exec)
    .await?;

    Ok(invites)
}

/// Find an unused invite by token and lock it for the rest of the
/// transaction, so only one redeemer can consume it.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn lock_unused_by_token(
    exec: impl PgExecutor<'_>,
    token: &str,
) -> Result<Option<Invite>, RepositoryError> {
    let invite = sqlx::query_as::<_, Invite>(
        r"
        SELECT id, family_id, email, token, used_by, used_at, created_at
        FROM planner.invite
        WHERE token = $1 AND used_at IS NULL
        FOR UPDATE
        ",
    )
    .bind(token)
    .fetch_optional(exec)
    .await?;

    Ok(invite)
}

/// Find an invite by token regardless of state.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn find_by_token(
    exec: impl PgExecutor<'_>,
    token: &str,
) -> Result<Option<Invite>, RepositoryError> {
    let invite = sqlx::query_as::<_, Invite>(
        r"
        SELECT id, family_id, email, token, used_by, used_at, created_at
        FROM planner.invite
        WHERE token = $1
        ",
    )
    .bind(token)
    .fetch_optional(exec)
    .await?;

    Ok(invite)
}

/// Mark an invite consumed by `user_id`.
///
/// The `used_at IS NULL` guard makes a second redemption a no-op.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the invite does not exist or was
/// already used.
/// Returns `RepositoryError::Database` for other database errors.
pub async fn mark_used(
    exec: impl PgExecutor<'_>,
    id: InviteId,
    user_id: UserId,
) -> Result<(), RepositoryError> {
    let result = sqlx::query(
        r"
        UPDATE planner.invite
        SET used_by = $2, used_at = NOW()
        WHERE id = $1 AND used_at IS NULL
        ",
    )
    .bind(id)
    .bind(user_id)
    .execute(exec)
    .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }

    Ok(())
}
