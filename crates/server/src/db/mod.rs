//! Database operations for the planner `PostgreSQL` store.
//!
//! # Schema: `planner`
//!
//! ## Tables
//!
//! - `app_user` - Registered users (credentials live here, not in the core)
//! - `family` - Families and their reusable join token
//! - `membership` - At most one row per user (`membership_user_unique`)
//! - `list` - Weekly lists; at most one active per family (`list_active_unique`)
//! - `item` - Items on a list
//! - `invite` - Single-use invite tokens
//! - `notification` - Per-email inbox used to deliver invite tokens
//!
//! # Executors
//!
//! Single-statement queries take any [`PgExecutor`](sqlx::PgExecutor), so the
//! same function runs against the pool or inside a transaction. Operations
//! that need several statements on one connection take `&mut PgConnection`;
//! callers pass `&mut *tx` to run them transactionally.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p shopping-planner-cli -- migrate
//! ```

pub mod families;
pub mod invites;
pub mod items;
pub mod lists;
pub mod notifications;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

/// Embedded schema migrations.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Unique constraint violation; holds the constraint name.
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Returns true for a violation of the named unique constraint.
    #[must_use]
    pub fn is_conflict_on(&self, constraint: &str) -> bool {
        matches!(self, Self::Conflict(name) if name == constraint)
    }
}

impl From<sqlx::Error> for RepositoryError {
    /// Rows that fail to decode are corrupt data, not a transient failure.
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::Decode(_)
            | sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::TypeNotFound { .. } => Self::DataCorruption(e.to_string()),
            other => Self::Database(other),
        }
    }
}

/// Turn a unique violation into [`RepositoryError::Conflict`] naming the
/// violated constraint; every other error stays a database error.
pub(crate) fn map_unique_violation(e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(db_err.constraint().unwrap_or("unique").to_owned());
    }
    RepositoryError::from(e)
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
