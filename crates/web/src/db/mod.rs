//! Database operations for Snippetbox.
//!
//! # Tables
//!
//! - `snippets` - Published snippets with an expiry time
//! - `users` - Registered users with Argon2id password hashes
//! - `tower_sessions.session` - Session storage (created by the session store)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/web/migrations/` and run via:
//! ```bash
//! cargo run -p snippetbox-cli -- migrate
//! ```
//!
//! Handlers only see the [`SnippetRepository`] and [`UserRepository`]
//! traits, so tests can swap the `PostgreSQL` implementations for the
//! in-memory ones in [`memory`].

#[cfg(any(test, feature = "test-support"))]
pub mod memory;
pub mod snippets;
pub mod users;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use snippetbox_core::{Email, SnippetId, UserId};

use crate::models::{Snippet, User};

pub use snippets::PgSnippetRepository;
pub use users::PgUserRepository;

/// Number of snippets shown on the home page.
pub const LATEST_SNIPPETS_LIMIT: usize = 10;

/// Errors returned by repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The underlying query failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A uniqueness constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Stored data failed validation when read back.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Storage for snippets.
#[async_trait]
pub trait SnippetRepository: Send + Sync {
    /// Store a new snippet that expires `expires_days` from now.
    async fn insert(
        &self,
        title: &str,
        content: &str,
        expires_days: i32,
    ) -> Result<SnippetId, RepositoryError>;

    /// Fetch an unexpired snippet by ID.
    async fn get(&self, id: SnippetId) -> Result<Option<Snippet>, RepositoryError>;

    /// The most recently created unexpired snippets, newest first.
    async fn latest(&self) -> Result<Vec<Snippet>, RepositoryError>;
}

/// Storage for user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a user.
    ///
    /// Returns `RepositoryError::Conflict` if the email is already registered.
    async fn insert(
        &self,
        name: &str,
        email: &Email,
        password_hash: &str,
    ) -> Result<User, RepositoryError>;

    /// Look up the ID and password hash for an email address.
    async fn get_credentials(
        &self,
        email: &Email,
    ) -> Result<Option<(UserId, String)>, RepositoryError>;

    /// Whether a user with this ID exists.
    async fn exists(&self, id: UserId) -> Result<bool, RepositoryError>;
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

/// Map a unique-constraint violation to `RepositoryError::Conflict`.
pub(crate) fn conflict_on_unique(e: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(format!("{what} already exists"));
    }
    RepositoryError::Database(e)
}
