//! Joining a family by token.
//!
//! A token is either a family's reusable token or a single-use invite token.
//! Both are looked up on every join, invites first; the prefix a user typed
//! is not trusted to pick the namespace.

use sqlx::{PgConnection, PgPool};

use shopping_planner_core::{Email, FamilyId, FamilyRole, IdentityClaim, InviteId, JoinCode, UserId};

use super::ServiceError;
use crate::db::{families, invites};

/// What a join token resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedToken {
    /// An unused invite; consumed by the join.
    Invite {
        invite_id: InviteId,
        family_id: FamilyId,
    },
    /// A family's own token; reusable.
    Family { family_id: FamilyId },
}

impl ResolvedToken {
    /// The family the token grants entry to.
    #[must_use]
    pub const fn family_id(self) -> FamilyId {
        match self {
            Self::Invite { family_id, .. } | Self::Family { family_id } => family_id,
        }
    }
}

/// Resolves join tokens and moves the caller into the resolved family.
pub struct JoinResolver<'a> {
    pool: &'a PgPool,
}

impl<'a> JoinResolver<'a> {
    /// Create a new join resolver.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Join the family behind `token` as a member, replacing any membership
    /// the caller already has.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Validation` if the token is blank.
    /// Returns `ServiceError::NotFound` if the token matches neither an unused
    /// invite nor a family.
    /// Returns `ServiceError::Store` if the database operation fails; the
    /// caller's old membership is then left untouched.
    #[tracing::instrument(skip(self, email, token))]
    pub async fn join_with_token(
        &self,
        user_id: UserId,
        email: &Email,
        token: &str,
    ) -> Result<IdentityClaim, ServiceError> {
        let token = JoinCode::normalize(token);
        if token.is_empty() {
            return Err(ServiceError::validation("token is required"));
        }

        let mut tx = self.pool.begin().await?;

        let resolved = resolve(&mut *tx, &token)
            .await?
            .ok_or_else(|| ServiceError::not_found("invalid token"))?;
        let family_id = resolved.family_id();

        let membership =
            families::replace_membership(&mut *tx, user_id, family_id, FamilyRole::Member).await?;

        if let ResolvedToken::Invite { invite_id, .. } = resolved {
            invites::mark_used(&mut *tx, invite_id, user_id).await?;
        }

        tx.commit().await?;

        tracing::info!(%family_id, via = ?resolved, "Joined family");
        Ok(IdentityClaim::new(
            user_id,
            email.clone(),
            membership.affiliation(),
        ))
    }
}

/// Look `token` up as an unused invite (locking it), then as a family token.
///
/// # Errors
///
/// Returns `ServiceError::Store` if a query fails.
pub async fn resolve(
    conn: &mut PgConnection,
    token: &str,
) -> Result<Option<ResolvedToken>, ServiceError> {
    if let Some(invite) = invites::lock_unused_by_token(&mut *conn, token).await? {
        return Ok(Some(ResolvedToken::Invite {
            invite_id: invite.id,
            family_id: invite.family_id,
        }));
    }

    let family = families::find_by_token(&mut *conn, token).await?;
    Ok(family.map(|f| ResolvedToken::Family { family_id: f.id }))
}
