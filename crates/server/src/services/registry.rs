//! Family and membership registry.
//!
//! A user belongs to at most one family. Creating a family makes the creator
//! its admin; leaving deletes only the caller's membership.

use sqlx::PgPool;

use shopping_planner_core::{
    Affiliation, Email, FamilyId, FamilyRole, IdentityClaim, RolloverDay, TokenGenerator,
    TokenKind, UserId, WeekWindow,
};

use super::ServiceError;
use super::lists::today;
use crate::db::{families, lists};
use crate::models::{Family, Member, Membership};

/// Attempts at generating a unique family token before giving up.
pub const MAX_TOKEN_ATTEMPTS: usize = 5;

/// Family and membership operations.
pub struct FamilyRegistry<'a> {
    pool: &'a PgPool,
    tokens: &'a dyn TokenGenerator,
    rollover: RolloverDay,
}

impl<'a> FamilyRegistry<'a> {
    /// Create a new registry.
    #[must_use]
    pub const fn new(
        pool: &'a PgPool,
        tokens: &'a dyn TokenGenerator,
        rollover: RolloverDay,
    ) -> Self {
        Self {
            pool,
            tokens,
            rollover,
        }
    }

    /// Create a family with the caller as admin and open its first list.
    ///
    /// Returns the family and the caller's refreshed claim.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Validation` if the nickname is blank.
    /// Returns `ServiceError::Conflict` if the caller already has a family or
    /// no unique token could be generated.
    /// Returns `ServiceError::Store` if the database operation fails.
    #[tracing::instrument(skip(self, email))]
    pub async fn create_family(
        &self,
        user_id: UserId,
        email: &Email,
        nickname: &str,
    ) -> Result<(Family, IdentityClaim), ServiceError> {
        let nickname = nickname.trim();
        if nickname.is_empty() {
            return Err(ServiceError::validation("family nickname is required"));
        }

        let mut tx = self.pool.begin().await?;

        if families::membership_for_user(&mut *tx, user_id).await?.is_some() {
            return Err(ServiceError::conflict("already in a family"));
        }

        let mut created = None;
        for attempt in 1..=MAX_TOKEN_ATTEMPTS {
            let token = self.tokens.generate(TokenKind::Family);
            if let Some(family) = families::insert_family(&mut *tx, nickname, token.as_str()).await? {
                created = Some(family);
                break;
            }
            tracing::warn!(attempt, "Family token collision, regenerating");
        }
        let Some(family) = created else {
            return Err(ServiceError::conflict("could not generate a unique family token"));
        };

        let membership =
            families::insert_membership(&mut *tx, user_id, family.id, FamilyRole::Admin)
                .await
                .map_err(|e| {
                    if e.is_conflict_on(families::MEMBERSHIP_USER_UNIQUE) {
                        ServiceError::conflict("already in a family")
                    } else {
                        ServiceError::Store(e)
                    }
                })?;

        let window = WeekWindow::containing(today(), self.rollover);
        lists::ensure_active(&mut *tx, family.id, window).await?;

        tx.commit().await?;

        tracing::info!(family_id = %family.id, "Created family");
        let claim = IdentityClaim::new(user_id, email.clone(), membership.affiliation());
        Ok((family, claim))
    }

    /// The caller's family.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the caller has no family.
    /// Returns `ServiceError::Store` if the database operation fails.
    pub async fn get_family(&self, user_id: UserId) -> Result<Family, ServiceError> {
        families::find_for_user(self.pool, user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("not in a family"))
    }

    /// Members of a family ordered by full name.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Store` if the database operation fails.
    pub async fn list_members(&self, family_id: FamilyId) -> Result<Vec<Member>, ServiceError> {
        let members = families::list_members(self.pool, family_id).await?;
        Ok(members)
    }

    /// Leave the current family. Succeeds without a membership too.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Store` if the database operation fails.
    #[tracing::instrument(skip(self, email))]
    pub async fn leave_family(
        &self,
        user_id: UserId,
        email: &Email,
    ) -> Result<IdentityClaim, ServiceError> {
        let removed = families::delete_membership(self.pool, user_id).await?;
        if removed == 0 {
            tracing::debug!("Leave without membership");
        }
        Ok(IdentityClaim::new(
            user_id,
            email.clone(),
            Affiliation::Unaffiliated,
        ))
    }

    /// The caller's current membership, read from the store.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Store` if the database operation fails.
    pub async fn membership(&self, user_id: UserId) -> Result<Option<Membership>, ServiceError> {
        let membership = families::membership_for_user(self.pool, user_id).await?;
        Ok(membership)
    }
}
