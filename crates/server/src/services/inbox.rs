//! Per-user notification inbox.

use sqlx::PgPool;

use shopping_planner_core::{Email, NotificationId};

use super::ServiceError;
use crate::db::notifications;
use crate::models::Notification;

/// Reads and acknowledges the notifications addressed to a user.
pub struct Inbox<'a> {
    pool: &'a PgPool,
}

impl<'a> Inbox<'a> {
    /// Create a new inbox service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Notifications for `email`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Store` if the database operation fails.
    pub async fn list(&self, email: &Email) -> Result<Vec<Notification>, ServiceError> {
        let notifications = notifications::list_for(self.pool, email).await?;
        Ok(notifications)
    }

    /// Mark a notification read. Ids that are unknown or addressed to
    /// someone else are ignored.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Store` if the database operation fails.
    pub async fn mark_read(&self, id: NotificationId, email: &Email) -> Result<bool, ServiceError> {
        let updated = notifications::mark_read(self.pool, id, email).await?;
        Ok(updated)
    }
}
