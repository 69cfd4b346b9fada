//! Invite issuing.
//!
//! An invite is a single-use `INV-` token aimed at one registered user. The
//! stored invite is the source of truth; the notification that carries the
//! token to its recipient may fail without undoing the invite.

use sqlx::PgPool;

use shopping_planner_core::{Email, FamilyId, TokenGenerator, TokenKind};

use super::notifier::Notifier;
use super::ServiceError;
use super::registry::MAX_TOKEN_ATTEMPTS;
use crate::db::{invites, users};
use crate::models::Invite;

/// Message stored with every invite notification.
pub const INVITE_MESSAGE: &str = "You have been invited to join a family. Use the token to join.";

/// Issues and lists invites.
pub struct InviteIssuer<'a> {
    pool: &'a PgPool,
    tokens: &'a dyn TokenGenerator,
    notifier: &'a dyn Notifier,
}

impl<'a> InviteIssuer<'a> {
    /// Create a new invite issuer.
    #[must_use]
    pub const fn new(
        pool: &'a PgPool,
        tokens: &'a dyn TokenGenerator,
        notifier: &'a dyn Notifier,
    ) -> Self {
        Self {
            pool,
            tokens,
            notifier,
        }
    }

    /// Issue an invite into `family_id` for the user registered under
    /// `recipient`, then notify them.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Validation` if the email is malformed or no user
    /// is registered under it.
    /// Returns `ServiceError::Conflict` if no unique token could be generated.
    /// Returns `ServiceError::Store` if the database operation fails.
    #[tracing::instrument(skip(self, recipient))]
    pub async fn create_invite(
        &self,
        family_id: FamilyId,
        recipient: &str,
    ) -> Result<Invite, ServiceError> {
        let email = Email::parse(recipient)?;

        if users::find_by_email(self.pool, &email).await?.is_none() {
            return Err(ServiceError::validation("no such user"));
        }

        let invite = self.insert_with_fresh_token(family_id, &email).await?;
        tracing::info!(invite_id = %invite.id, "Created invite");

        if let Err(e) = self
            .notifier
            .notify(&email, INVITE_MESSAGE, Some(&invite.token))
            .await
        {
            tracing::warn!(invite_id = %invite.id, error = %e, "Invite notification failed");
        }

        Ok(invite)
    }

    async fn insert_with_fresh_token(
        &self,
        family_id: FamilyId,
        email: &Email,
    ) -> Result<Invite, ServiceError> {
        for attempt in 1..=MAX_TOKEN_ATTEMPTS {
            let token = self.tokens.generate(TokenKind::Invite);
            if let Some(invite) = invites::insert(self.pool, family_id, email, token.as_str()).await? {
                return Ok(invite);
            }
            tracing::warn!(attempt, "Invite token collision, regenerating");
        }
        Err(ServiceError::conflict("could not generate a unique invite token"))
    }

    /// A family's invites, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Store` if the database operation fails.
    pub async fn list_invites(&self, family_id: FamilyId) -> Result<Vec<Invite>, ServiceError> {
        let invites = invites::list_for_family(self.pool, family_id).await?;
        Ok(invites)
    }
}
