//! User model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use shopping_planner_core::{Email, UserId};

/// A registered user.
///
/// The password hash is never loaded into this type; see
/// [`crate::db::users::get_password_hash`].
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub full_name: String,
    pub email: Email,
    pub created_at: DateTime<Utc>,
}
