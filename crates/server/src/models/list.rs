//! Weekly list and item models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use shopping_planner_core::{FamilyId, ItemId, ItemStatus, ListId, UserId, WeekWindow};

/// A family's list for one week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct List {
    pub id: ListId,
    pub family_id: FamilyId,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    /// `None` while this is the family's active list.
    pub archived_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl List {
    /// Returns true while the list is the family's active list.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.archived_at.is_none()
    }

    /// The week this list covers.
    #[must_use]
    pub fn window(&self) -> WeekWindow {
        WeekWindow::starting(self.week_start)
    }
}

/// An item on a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub list_id: ListId,
    pub name: String,
    pub quantity: Option<String>,
    pub status: ItemStatus,
    pub added_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

/// An item joined with the display name of the user who added it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ItemWithAuthor {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub item: Item,
    /// `None` once the adding user has been deleted.
    pub added_by_name: Option<String>,
}

/// The active list with its items, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentList {
    pub list: List,
    pub items: Vec<ItemWithAuthor>,
}

/// Items of an archived list split by outcome.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ArchivedItems {
    pub bought: Vec<ItemWithAuthor>,
    pub skipped: Vec<ItemWithAuthor>,
}

impl ArchivedItems {
    /// Split items by their archived outcome; anything not bought counts as skipped.
    #[must_use]
    pub fn partition(items: Vec<ItemWithAuthor>) -> Self {
        let (bought, skipped): (Vec<_>, Vec<_>) = items
            .into_iter()
            .map(|mut entry| {
                entry.item.status = entry.item.status.archived();
                entry
            })
            .partition(|entry| entry.item.status == ItemStatus::Bought);
        Self { bought, skipped }
    }
}
