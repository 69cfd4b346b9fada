//! Database operations for families and memberships.

use sqlx::PgExecutor;

use shopping_planner_core::{FamilyId, FamilyRole, UserId};

use super::{RepositoryError, map_unique_violation};
use crate::models::{Family, Member, Membership};

/// Constraint guarding one membership per user.
pub const MEMBERSHIP_USER_UNIQUE: &str = "membership_user_unique";

/// Insert a family unless its token is already taken.
///
/// Returns `None` on a token collision so the caller can retry with a fresh
/// token without aborting the surrounding transaction.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the insert fails.
pub async fn insert_family(
    exec: impl PgExecutor<'_>,
    nickname: &str,
    token: &str,
) -> Result<Option<Family>, RepositoryError> {
    let family = sqlx::query_as::<_, Family>(
        r"
        INSERT INTO planner.family (nickname, token)
        VALUES ($1, $2)
        ON CONFLICT ON CONSTRAINT family_token_unique DO NOTHING
        RETURNING id, nickname, token, created_at
        ",
    )
    .bind(nickname)
    .bind(token)
    .fetch_optional(exec)
    .await?;

    Ok(family)
}

/// Get a family by its join token (already normalised).
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn find_by_token(
    exec: impl PgExecutor<'_>,
    token: &str,
) -> Result<Option<Family>, RepositoryError> {
    let family = sqlx::query_as::<_, Family>(
        r"
        SELECT id, nickname, token, created_at
        FROM planner.family
        WHERE token = $1
        ",
    )
    .bind(token)
    .fetch_optional(exec)
    .await?;

    Ok(family)
}

/// Get the family a user belongs to.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn find_for_user(
    exec: impl PgExecutor<'_>,
    user_id: UserId,
) -> Result<Option<Family>, RepositoryError> {
    let family = sqlx::query_as::<_, Family>(
        r"
        SELECT f.id, f.nickname, f.token, f.created_at
        FROM planner.family f
        JOIN planner.membership m ON m.family_id = f.id
        WHERE m.user_id = $1
        ",
    )
    .bind(user_id)
    .fetch_optional(exec)
    .await?;

    Ok(family)
}

/// Get a user's membership, if any.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn membership_for_user(
    exec: impl PgExecutor<'_>,
    user_id: UserId,
) -> Result<Option<Membership>, RepositoryError> {
    let membership = sqlx::query_as::<_, Membership>(
        r"
        SELECT id, user_id, family_id, role, created_at
        FROM planner.membership
        WHERE user_id = $1
        ",
    )
    .bind(user_id)
    .fetch_optional(exec)
    .await?;

    Ok(membership)
}

/// Insert a membership for a user who has none.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if the user already has a membership.
/// Returns `RepositoryError::Database` for other database errors.
pub async fn insert_membership(
    exec: impl PgExecutor<'_>,
    user_id: UserId,
    family_id: FamilyId,
    role: FamilyRole,
) -> Result<Membership, RepositoryError> {
    sqlx::query_as::<_, Membership>(
        r"
        INSERT INTO planner.membership (user_id, family_id, role)
        VALUES ($1, $2, $3)
        RETURNING id, user_id, family_id, role, created_at
        ",
    )
    .bind(user_id)
    .bind(family_id)
    .bind(role)
    .fetch_one(exec)
    .await
    .map_err(map_unique_violation)
}

/// Replace whatever membership a user holds with a new one.
///
/// A single upsert on `membership_user_unique`, so two concurrent joins by
/// the same user cannot both insert.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the statement fails.
pub async fn replace_membership(
    exec: impl PgExecutor<'_>,
    user_id: UserId,
    family_id: FamilyId,
    role: FamilyRole,
) -> Result<Membership, RepositoryError> {
    let membership = sqlx::query_as::<_, Membership>(
        r"
        INSERT INTO planner.membership (user_id, family_id, role)
        VALUES ($1, $2, $3)
        ON CONFLICT ON CONSTRAINT membership_user_unique
        DO UPDATE SET family_id = EXCLUDED.family_id,
                      role = EXCLUDED.role,
                      created_at = NOW()
        RETURNING id, user_id, family_id, role, created_at
        ",
    )
    .bind(user_id)
    .bind(family_id)
    .bind(role)
    .fetch_one(exec)
    .await?;

    Ok(membership)
}

/// Delete a user's membership. Returns the number of rows removed (0 or 1).
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the statement fails.
pub async fn delete_membership(
    exec: impl PgExecutor<'_>,
    user_id: UserId,
) -> Result<u64, RepositoryError> {
    let result = sqlx::query("DELETE FROM planner.membership WHERE user_id = $1")
        .bind(user_id)
        .execute(exec)
        .await?;

    Ok(result.rows_affected())
}

/// List a family's members ordered by full name.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn list_members(
    exec: impl PgExecutor<'_>,
    family_id: FamilyId,
) -> Result<Vec<Member>, RepositoryError> {
    let members = sqlx::query_as::<_, Member>(
        r"
        SELECT u.id AS user_id, u.full_name, u.email, m.role
        FROM planner.membership m
        JOIN planner.app_user u ON u.id = m.user_id
        WHERE m.family_id = $1
        ORDER BY u.full_name ASC, u.id ASC
        ",
    )
    .bind(family_id)
    .fetch_all(exec)
    .await?;

    Ok(members)
}
