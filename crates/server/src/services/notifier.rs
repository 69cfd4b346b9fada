//! Notification delivery.
//!
//! Invite tokens reach their recipient through a [`Notifier`]. Delivery is
//! best-effort: callers log a failed delivery and carry on.

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;

use shopping_planner_core::Email;

use crate::db::{RepositoryError, notifications};

/// Failure to deliver a notification.
#[derive(Debug, Error)]
#[error("notification delivery failed: {0}")]
pub struct NotifyError(String);

impl NotifyError {
    /// Create a delivery error with a description of what went wrong.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

impl From<RepositoryError> for NotifyError {
    fn from(e: RepositoryError) -> Self {
        Self(e.to_string())
    }
}

/// Delivers a message, optionally carrying a join token, to a user.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver `message` to `recipient`.
    async fn notify(
        &self,
        recipient: &Email,
        message: &str,
        token: Option<&str>,
    ) -> Result<(), NotifyError>;
}

/// Notifier that appends to the `planner.notification` inbox.
#[derive(Clone)]
pub struct PgNotifier {
    pool: PgPool,
}

impl PgNotifier {
    /// Create a notifier writing through `pool`.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Notifier for PgNotifier {
    async fn notify(
        &self,
        recipient: &Email,
        message: &str,
        token: Option<&str>,
    ) -> Result<(), NotifyError> {
        notifications::insert(&self.pool, recipient, message, token).await?;
        Ok(())
    }
}
