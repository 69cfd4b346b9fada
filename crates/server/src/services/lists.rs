//! Weekly list lifecycle.
//!
//! Each family has a sequence of lists, one per week. At most one is active
//! (`archived_at IS NULL`); archiving it on the rollover day skips whatever
//! was not bought and opens the next week's list in the same transaction.

use chrono::{Local, NaiveDate, Weekday};
use sqlx::PgPool;

use shopping_planner_core::{FamilyId, ItemId, ItemStatus, ListId, RolloverDay, UserId, WeekWindow};

use super::ServiceError;
use crate::db::{items, lists};
use crate::models::{ArchivedItems, CurrentList, Item, List};

/// Attempts to find a list that stays active while an item is added.
const MAX_ADD_ATTEMPTS: usize = 3;

/// Today's date in the server's local time zone.
#[must_use]
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Manages the active list and its items.
pub struct ListService<'a> {
    pool: &'a PgPool,
    rollover: RolloverDay,
}

impl<'a> ListService<'a> {
    /// Create a new list service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, rollover: RolloverDay) -> Self {
        Self { pool, rollover }
    }

    /// The weekday on which lists are archived.
    #[must_use]
    pub const fn rollover(&self) -> RolloverDay {
        self.rollover
    }

    /// Return the family's active list, creating this week's list if there
    /// is none.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Store` if the database operation fails.
    pub async fn ensure_current_list(&self, family_id: FamilyId) -> Result<List, ServiceError> {
        self.ensure_current_list_on(family_id, today()).await
    }

    /// Like [`Self::ensure_current_list`], with an explicit date used to pick
    /// the window when a list has to be created.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Store` if the database operation fails.
    #[tracing::instrument(skip(self))]
    pub async fn ensure_current_list_on(
        &self,
        family_id: FamilyId,
        today: NaiveDate,
    ) -> Result<List, ServiceError> {
        let mut conn = self.pool.acquire().await?;
        let window = WeekWindow::containing(today, self.rollover);
        let list = lists::ensure_active(&mut conn, family_id, window).await?;
        Ok(list)
    }

    /// Add a pending item to the family's active list.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Validation` if the name is blank.
    /// Returns `ServiceError::Conflict` if every attempt lost a race with an
    /// archive.
    /// Returns `ServiceError::Store` if the database operation fails.
    #[tracing::instrument(skip(self))]
    pub async fn add_item(
        &self,
        family_id: FamilyId,
        user_id: UserId,
        name: &str,
        quantity: Option<&str>,
    ) -> Result<Item, ServiceError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::validation("item name is required"));
        }
        let quantity = quantity.map(str::trim).filter(|q| !q.is_empty());

        let window = WeekWindow::containing(today(), self.rollover);

        // The share lock keeps an archive from retiring the list until the
        // item is committed; an archive that won the race is retried against
        // the list it opened.
        for _ in 0..MAX_ADD_ATTEMPTS {
            let mut tx = self.pool.begin().await?;
            lists::ensure_active(&mut *tx, family_id, window).await?;

            let Some(list) = lists::share_active(&mut *tx, family_id).await? else {
                tracing::debug!(%family_id, "Active list archived while adding, retrying");
                continue;
            };

            let item = items::insert(&mut *tx, list.id, name, quantity, user_id).await?;
            tx.commit().await?;

            tracing::debug!(item_id = %item.id, list_id = %list.id, "Added item");
            return Ok(item);
        }

        Err(ServiceError::conflict(
            "the list was archived repeatedly, please retry",
        ))
    }

    /// Set the status of one of the family's items.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the item does not exist or belongs
    /// to another family.
    /// Returns `ServiceError::Store` if the database operation fails.
    #[tracing::instrument(skip(self))]
    pub async fn set_item_status(
        &self,
        family_id: FamilyId,
        item_id: ItemId,
        status: ItemStatus,
    ) -> Result<Item, ServiceError> {
        items::set_status(self.pool, family_id, item_id, status)
            .await?
            .ok_or_else(|| ServiceError::not_found("item not found"))
    }

    /// Delete one of the family's items. Deleting an item that is already
    /// gone succeeds; the return value says whether a row was removed.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Store` if the database operation fails.
    #[tracing::instrument(skip(self))]
    pub async fn delete_item(
        &self,
        family_id: FamilyId,
        item_id: ItemId,
    ) -> Result<bool, ServiceError> {
        let deleted = items::delete(self.pool, family_id, item_id).await?;
        Ok(deleted > 0)
    }

    /// The active list with its items, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Store` if the database operation fails.
    pub async fn get_current_list(&self, family_id: FamilyId) -> Result<CurrentList, ServiceError> {
        self.get_current_list_on(family_id, today()).await
    }

    /// Like [`Self::get_current_list`], with an explicit date for list creation.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Store` if the database operation fails.
    #[tracing::instrument(skip(self))]
    pub async fn get_current_list_on(
        &self,
        family_id: FamilyId,
        today: NaiveDate,
    ) -> Result<CurrentList, ServiceError> {
        let list = self.ensure_current_list_on(family_id, today).await?;
        let items = items::list_with_authors(self.pool, list.id).await?;
        Ok(CurrentList { list, items })
    }

    /// Archive the active list and open the next week's list.
    ///
    /// `today` is authoritative; it is never re-read from the clock. The new
    /// list starts seven days after the archived one, however late the
    /// archive runs.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::InvalidState` if `today` is not the rollover day
    /// or the family has no active list.
    /// Returns `ServiceError::Store` if any step fails; nothing is committed.
    #[tracing::instrument(skip(self))]
    pub async fn archive_week(
        &self,
        family_id: FamilyId,
        today: Weekday,
    ) -> Result<List, ServiceError> {
        if !self.rollover.is(today) {
            return Err(ServiceError::invalid_state(format!(
                "can only archive on {}",
                self.rollover
            )));
        }

        let mut tx = self.pool.begin().await?;

        let Some(active) = lists::lock_active(&mut *tx, family_id).await? else {
            return Err(ServiceError::invalid_state("no active list to archive"));
        };

        let skipped = items::skip_unbought(&mut *tx, active.id).await?;
        let archived = lists::stamp_archived(&mut *tx, active.id).await?;
        let next = lists::upsert_active(&mut *tx, family_id, archived.window().following()).await?;

        tx.commit().await?;

        tracing::info!(
            archived_list = %archived.id,
            next_list = %next.id,
            week_start = %next.week_start,
            skipped,
            "Archived week"
        );
        Ok(next)
    }

    /// The family's archived lists, most recent week first.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Store` if the database operation fails.
    pub async fn list_archived_lists(&self, family_id: FamilyId) -> Result<Vec<List>, ServiceError> {
        let lists = lists::list_archived(self.pool, family_id).await?;
        Ok(lists)
    }

    /// Items of one archived list split into bought and skipped.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` unless the list is archived and
    /// belongs to the family.
    /// Returns `ServiceError::Store` if the database operation fails.
    #[tracing::instrument(skip(self))]
    pub async fn get_archived_list_items(
        &self,
        family_id: FamilyId,
        list_id: ListId,
    ) -> Result<ArchivedItems, ServiceError> {
        let list = lists::find_archived(self.pool, family_id, list_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("archived list not found"))?;
        let items = items::list_with_authors(self.pool, list.id).await?;
        Ok(ArchivedItems::partition(items))
    }
}
