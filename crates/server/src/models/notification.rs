//! Notification model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use shopping_planner_core::NotificationId;

/// An inbox entry for a user, addressed by email.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    /// Join token carried by invite notifications.
    pub token: Option<String>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}
