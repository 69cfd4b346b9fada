//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use shopping_planner_core::{RandomTokens, TokenGenerator};

use crate::config::PlannerConfig;
use crate::services::auth::{AuthService, JwtService};
use crate::services::{
    FamilyRegistry, Inbox, InviteIssuer, JoinResolver, ListService, Notifier, PgNotifier,
};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: PlannerConfig,
    pool: PgPool,
    jwt: JwtService,
    notifier: Arc<dyn Notifier>,
    tokens: Arc<dyn TokenGenerator>,
}

impl AppState {
    /// Create a new application state with the `PostgreSQL` notification
    /// inbox and random join tokens.
    ///
    /// # Arguments
    ///
    /// * `config` - Planner configuration
    /// * `pool` - `PostgreSQL` connection pool
    #[must_use]
    pub fn new(config: PlannerConfig, pool: PgPool) -> Self {
        let notifier = Arc::new(PgNotifier::new(pool.clone()));
        Self::with_collaborators(config, pool, notifier, Arc::new(RandomTokens))
    }

    /// Create application state with explicit notification and token
    /// collaborators.
    #[must_use]
    pub fn with_collaborators(
        config: PlannerConfig,
        pool: PgPool,
        notifier: Arc<dyn Notifier>,
        tokens: Arc<dyn TokenGenerator>,
    ) -> Self {
        let jwt = JwtService::new(
            &config.jwt_secret,
            chrono::Duration::days(config.jwt_ttl_days),
        );

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                jwt,
                notifier,
                tokens,
            }),
        }
    }

    /// Get a reference to the planner configuration.
    #[must_use]
    pub fn config(&self) -> &PlannerConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the token signer.
    #[must_use]
    pub fn jwt(&self) -> &JwtService {
        &self.inner.jwt
    }

    /// Authentication service.
    #[must_use]
    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(&self.inner.pool, &self.inner.jwt)
    }

    /// Family and membership registry.
    #[must_use]
    pub fn registry(&self) -> FamilyRegistry<'_> {
        FamilyRegistry::new(
            &self.inner.pool,
            self.inner.tokens.as_ref(),
            self.inner.config.rollover_day,
        )
    }

    /// Invite issuer.
    #[must_use]
    pub fn invites(&self) -> InviteIssuer<'_> {
        InviteIssuer::new(
            &self.inner.pool,
            self.inner.tokens.as_ref(),
            self.inner.notifier.as_ref(),
        )
    }

    /// Weekly list service.
    #[must_use]
    pub fn lists(&self) -> ListService<'_> {
        ListService::new(&self.inner.pool, self.inner.config.rollover_day)
    }

    /// Join resolver.
    #[must_use]
    pub fn join(&self) -> JoinResolver<'_> {
        JoinResolver::new(&self.inner.pool)
    }

    /// Notification inbox.
    #[must_use]
    pub fn inbox(&self) -> Inbox<'_> {
        Inbox::new(&self.inner.pool)
    }
}
