//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! sp-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `PLANNER_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! Migrations live in `crates/server/migrations/`.

use shopping_planner_server::db::MIGRATOR;

use super::{CommandError, connect};

/// Run the planner database migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    tracing::info!("Running planner migrations...");
    MIGRATOR.run(&pool).await?;

    tracing::info!("Planner migrations complete!");
    Ok(())
}
