//! Database operations for weekly lists.
//!
//! The partial unique index `list_active_unique` allows one row per family
//! with `archived_at IS NULL`. Inserts of an active list name that index in
//! their `ON CONFLICT` clause, so racing creators never produce a second
//! active list.

use sqlx::{PgConnection, PgExecutor};

use shopping_planner_core::{FamilyId, ListId, WeekWindow};

use super::RepositoryError;
use crate::models::List;

/// Get the family's active list.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn find_active(
    exec: impl PgExecutor<'_>,
    family_id: FamilyId,
) -> Result<Option<List>, RepositoryError> {
    let list = sqlx::query_as::<_, List>(
        r"
        SELECT id, family_id, week_start, week_end, archived_at, created_at
        FROM planner.list
        WHERE family_id = $1 AND archived_at IS NULL
        ",
    )
    .bind(family_id)
    .fetch_optional(exec)
    .await?;

    Ok(list)
}

/// Get the family's active list and hold a row lock on it until the
/// surrounding transaction ends.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn lock_active(
    exec: impl PgExecutor<'_>,
    family_id: FamilyId,
) -> Result<Option<List>, RepositoryError> {
    let list = sqlx::query_as::<_, List>(
        r"
        SELECT id, family_id, week_start, week_end, archived_at, created_at
        FROM planner.list
        WHERE family_id = $1 AND archived_at IS NULL
        FOR UPDATE
        ",
    )
    .bind(family_id)
    .fetch_optional(exec)
    .await?;

    Ok(list)
}

/// Get the family's active list under a share lock. Waits for a running
/// archive to finish; if that archive retires the list, the row no longer
/// matches and `None` is returned.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn share_active(
    exec: impl PgExecutor<'_>,
    family_id: FamilyId,
) -> Result<Option<List>, RepositoryError> {
    let list = sqlx::query_as::<_, List>(
        r"
        SELECT id, family_id, week_start, week_end, archived_at, created_at
        FROM planner.list
        WHERE family_id = $1 AND archived_at IS NULL
        FOR SHARE
        ",
    )
    .bind(family_id)
    .fetch_optional(exec)
    .await?;

    Ok(list)
}

/// Insert an active list for `window` unless the family already has one.
/// Returns the number of rows inserted (0 or 1).
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the insert fails.
pub async fn insert_active_if_absent(
    exec: impl PgExecutor<'_>,
    family_id: FamilyId,
    window: WeekWindow,
) -> Result<u64, RepositoryError> {
    let result = sqlx::query(
        r"
        INSERT INTO planner.list (family_id, week_start, week_end)
        VALUES ($1, $2, $3)
        ON CONFLICT (family_id) WHERE archived_at IS NULL DO NOTHING
        ",
    )
    .bind(family_id)
    .bind(window.start())
    .bind(window.end())
    .execute(exec)
    .await?;

    Ok(result.rows_affected())
}

/// Return the family's active list, creating one for `window` if needed.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if no active list is visible after
/// the insert (the family row does not exist).
/// Returns `RepositoryError::Database` for other database errors.
pub async fn ensure_active(
    conn: &mut PgConnection,
    family_id: FamilyId,
    window: WeekWindow,
) -> Result<List, RepositoryError> {
    if let Some(list) = find_active(&mut *conn, family_id).await? {
        return Ok(list);
    }

    let inserted = insert_active_if_absent(&mut *conn, family_id, window).await?;
    if inserted > 0 {
        tracing::info!(%family_id, week_start = %window.start(), "Created active list");
    }

    find_active(&mut *conn, family_id)
        .await?
        .ok_or(RepositoryError::NotFound)
}

/// Mark a list archived at the current transaction time.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the list does not exist.
/// Returns `RepositoryError::Database` for other database errors.
pub async fn stamp_archived(
    exec: impl PgExecutor<'_>,
    list_id: ListId,
) -> Result<List, RepositoryError> {
    sqlx::query_as::<_, List>(
        r"
        UPDATE planner.list
        SET archived_at = NOW()
        WHERE id = $1
        RETURNING id, family_id, week_start, week_end, archived_at, created_at
        ",
    )
    .bind(list_id)
    .fetch_optional(exec)
    .await?
    .ok_or(RepositoryError::NotFound)
}

/// Insert the active list for `window`, or move an existing active list to
/// that window if a concurrent creator got there first.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the statement fails.
pub async fn upsert_active(
    exec: impl PgExecutor<'_>,
    family_id: FamilyId,
    window: WeekWindow,
) -> Result<List, RepositoryError> {
    let list = sqlx::query_as::<_, List>(
        r"
        INSERT INTO planner.list (family_id, week_start, week_end)
        VALUES ($1, $2, $3)
        ON CONFLICT (family_id) WHERE archived_at IS NULL
        DO UPDATE SET week_start = EXCLUDED.week_start,
                      week_end = EXCLUDED.week_end
        RETURNING id, family_id, week_start, week_end, archived_at, created_at
        ",
    )
    .bind(family_id)
    .bind(window.start())
    .bind(window.end())
    .fetch_one(exec)
    .await?;

    Ok(list)
}

/// List a family's archived lists, most recent week first.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn list_archived(
    exec: impl PgExecutor<'_>,
    family_id: FamilyId,
) -> Result<Vec<List>, RepositoryError> {
    let lists = sqlx::query_as::<_, List>(
        r"
        SELECT id, family_id, week_start, week_end, archived_at, created_at
        FROM planner.list
        WHERE family_id = $1 AND archived_at IS NOT NULL
        ORDER BY week_start DESC, id DESC
        ",
    )
    .bind(family_id)
    .fetch_all(exec)
    .await?;

    Ok(lists)
}

/// Get one of the family's archived lists.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn find_archived(
    exec: impl PgExecutor<'_>,
    family_id: FamilyId,
    list_id: ListId,
) -> Result<Option<List>, RepositoryError> {
    let list = sqlx::query_as::<_, List>(
        r"
        SELECT id, family_id, week_start, week_end, archived_at, created_at
        FROM planner.list
        WHERE id = $1 AND family_id = $2 AND archived_at IS NOT NULL
        ",
    )
    .bind(list_id)
    .bind(family_id)
    .fetch_optional(exec)
    .await?;

    Ok(list)
}

/// Count a family's active lists.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn count_active(
    exec: impl PgExecutor<'_>,
    family_id: FamilyId,
) -> Result<i64, RepositoryError> {
    let count = sqlx::query_scalar::<_, i64>(
        r"
        SELECT COUNT(*)
        FROM planner.list
        WHERE family_id = $1 AND archived_at IS NULL
        ",
    )
    .bind(family_id)
    .fetch_one(exec)
    .await?;

    Ok(count)
}
