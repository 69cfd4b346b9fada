//! Database operations for list items.
//!
//! Mutations are scoped to a family: an item id only matches when its list
//! belongs to that family.

use sqlx::PgExecutor;

use shopping_planner_core::{FamilyId, ItemId, ItemStatus, ListId, UserId};

use super::RepositoryError;
use crate::models::{Item, ItemWithAuthor};

/// Insert a pending item on a list.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the insert fails.
pub async fn insert(
    exec: impl PgExecutor<'_>,
    list_id: ListId,
    name: &str,
    quantity: Option<&str>,
    added_by: UserId,
) -> Result<Item, RepositoryError> {
    let item = sqlx::query_as::<_, Item>(
        r"
        INSERT INTO planner.item (list_id, name, quantity, added_by)
        VALUES ($1, $2, $3, $4)
        RETURNING id, list_id, name, quantity, status, added_by, created_at
        ",
    )
    .bind(list_id)
    .bind(name)
    .bind(quantity)
    .bind(added_by)
    .fetch_one(exec)
    .await?;

    Ok(item)
}

/// Set an item's status. Returns `None` if the item does not exist in one of
/// the family's lists.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the update fails.
pub async fn set_status(
    exec: impl PgExecutor<'_>,
    family_id: FamilyId,
    item_id: ItemId,
    status: ItemStatus,
) -> Result<Option<Item>, RepositoryError> {
    let item = sqlx::query_as::<_, Item>(
        r"
        UPDATE planner.item it
        SET status = $3
        FROM planner.list l
        WHERE it.id = $1 AND it.list_id = l.id AND l.family_id = $2
        RETURNING it.id, it.list_id, it.name, it.quantity, it.status, it.added_by, it.created_at
        ",
    )
    .bind(item_id)
    .bind(family_id)
    .bind(status)
    .fetch_optional(exec)
    .await?;

    Ok(item)
}

/// Delete an item. Returns the number of rows removed (0 or 1).
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the delete fails.
pub async fn delete(
    exec: impl PgExecutor<'_>,
    family_id: FamilyId,
    item_id: ItemId,
) -> Result<u64, RepositoryError> {
    let result = sqlx::query(
        r"
        DELETE FROM planner.item it
        USING planner.list l
        WHERE it.id = $1 AND it.list_id = l.id AND l.family_id = $2
        ",
    )
    .bind(item_id)
    .bind(family_id)
    .execute(exec)
    .await?;

    Ok(result.rows_affected())
}

/// Turn every item on the list that is not bought into skipped.
/// Returns the number of items changed.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the update fails.
pub async fn skip_unbought(
    exec: impl PgExecutor<'_>,
    list_id: ListId,
) -> Result<u64, RepositoryError> {
    let result = sqlx::query(
        r"
        UPDATE planner.item
        SET status = 'skipped'
        WHERE list_id = $1 AND status <> 'bought'
        ",
    )
    .bind(list_id)
    .execute(exec)
    .await?;

    Ok(result.rows_affected())
}

/// Items on a list with the adding user's name, newest first.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn list_with_authors(
    exec: impl PgExecutor<'_>,
    list_id: ListId,
) -> Result<Vec<ItemWithAuthor>, RepositoryError> {
    let items = sqlx::query_as::<_, ItemWithAuthor>(
        r"
        SELECT it.id, it.list_id, it.name, it.quantity, it.status, it.added_by, it.created_at,
               u.full_name AS added_by_name
        FROM planner.item it
        LEFT JOIN planner.app_user u ON u.id = it.added_by
        WHERE it.list_id = $1
        ORDER BY it.created_at DESC, it.id DESC
        ",
    )
    .bind(list_id)
    .fetch_all(exec)
    .await?;

    Ok(items)
}
