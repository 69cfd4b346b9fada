//! CLI subcommands.

pub mod archive;
pub mod migrate;
pub mod user;

use secrecy::SecretString;
use sqlx::PgPool;
use thiserror::Error;

use shopping_planner_server::config::{ConfigError, get_database_url};
use shopping_planner_server::db;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// An argument could not be parsed.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A planner service rejected the operation.
    #[error(transparent)]
    Service(#[from] shopping_planner_server::services::ServiceError),

    /// User creation failed.
    #[error(transparent)]
    Auth(#[from] shopping_planner_server::services::auth::AuthError),
}

/// Connect to the planner database named by `PLANNER_DATABASE_URL`.
async fn connect() -> Result<PgPool, CommandError> {
    dotenvy::dotenv().ok();

    let database_url: SecretString = get_database_url("PLANNER_DATABASE_URL")?;

    tracing::info!("Connecting to planner database...");
    Ok(db::create_pool(&database_url).await?)
}
