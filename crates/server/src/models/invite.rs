//! Invite model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use shopping_planner_core::{Email, FamilyId, InviteId, UserId};

/// A single-use invite into a family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Invite {
    pub id: InviteId,
    pub family_id: FamilyId,
    /// Recipient the token was delivered to.
    pub email: Email,
    pub token: String,
    pub used_by: Option<UserId>,
    pub used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Invite {
    /// Returns true if this invite has already been redeemed.
    #[must_use]
    pub const fn is_used(&self) -> bool {
        self.used_at.is_some()
    }
}
