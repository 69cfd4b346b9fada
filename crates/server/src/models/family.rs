//! Family and membership models.

use chrono::{DateTime, Utc};
use serde::Serialize;

use shopping_planner_core::{Affiliation, Email, FamilyId, FamilyRole, MembershipId, UserId};

/// A family: the unit that shares one weekly list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Family {
    pub id: FamilyId,
    pub nickname: String,
    /// Reusable join token, fixed for the family's lifetime.
    pub token: String,
    pub created_at: DateTime<Utc>,
}

/// A user's membership row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub id: MembershipId,
    pub user_id: UserId,
    pub family_id: FamilyId,
    pub role: FamilyRole,
    pub created_at: DateTime<Utc>,
}

impl Membership {
    /// Affiliation to put on the member's identity claim.
    #[must_use]
    pub const fn affiliation(&self) -> Affiliation {
        Affiliation::from_membership(self.family_id, self.role)
    }
}

/// A family member as shown in the member list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub user_id: UserId,
    pub full_name: String,
    pub email: Email,
    pub role: FamilyRole,
}
