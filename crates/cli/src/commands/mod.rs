//! Subcommand implementations.

pub mod migrate;
pub mod seed;
pub mod user;

use sqlx::PgPool;
use thiserror::Error;

use snippetbox_web::config::{ConfigError, SnippetboxConfig};
use snippetbox_web::db::RepositoryError;
use snippetbox_web::services::AuthError;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Database connection or query error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A migration failed to apply.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Repository operation failed.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// User management failed.
    #[error("{0}")]
    Auth(#[from] AuthError),

    /// Input rejected before touching the database.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Connect to the database named by `SNIPPETBOX_DATABASE_URL`.
async fn connect() -> Result<PgPool, CommandError> {
    let config = SnippetboxConfig::from_env()?;

    tracing::info!("Connecting to database...");
    Ok(snippetbox_web::db::create_pool(&config.database_url).await?)
}
