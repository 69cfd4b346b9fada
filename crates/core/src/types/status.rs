//! Role and status enums.
//!
//! Both map to PostgreSQL enum types (`planner.family_role` and
//! `planner.item_status`) when the `postgres` feature is enabled.

use serde::{Deserialize, Serialize};

/// Error returned when a role or status string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind}: {value}")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

/// A member's role inside a family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "planner.family_role", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum FamilyRole {
    /// Created the family.
    Admin,
    /// Joined through a family token or an invite.
    Member,
}

impl FamilyRole {
    /// Wire name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Member => "member",
        }
    }
}

impl std::fmt::Display for FamilyRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FamilyRole {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "member" => Ok(Self::Member),
            _ => Err(ParseEnumError {
                kind: "family role",
                value: s.to_owned(),
            }),
        }
    }
}

/// Status of a shopping list item.
///
/// Items start `Pending`. Archival turns every item that is not `Bought`
/// into `Skipped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "planner.item_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    #[default]
    Pending,
    Bought,
    Skipped,
}

impl ItemStatus {
    /// Wire name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Bought => "bought",
            Self::Skipped => "skipped",
        }
    }

    /// Status an item ends up with once its list is archived.
    #[must_use]
    pub const fn archived(self) -> Self {
        match self {
            Self::Bought => Self::Bought,
            Self::Pending | Self::Skipped => Self::Skipped,
        }
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ItemStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "bought" => Ok(Self::Bought),
            "skipped" => Ok(Self::Skipped),
            _ => Err(ParseEnumError {
                kind: "item status",
                value: s.to_owned(),
            }),
        }
    }
}
