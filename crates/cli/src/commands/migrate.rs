//! Database migration command.
//!
//! ```bash
//! snippetbox-cli migrate
//! ```
//!
//! Applies the embedded migrations from `crates/web/migrations/` and creates
//! the session table used by the `PostgreSQL` session store. Both steps are
//! idempotent.

use tower_sessions_sqlx_store::PostgresStore;

use super::{CommandError, connect};

/// Run all database migrations.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    tracing::info!("Running snippetbox migrations...");
    snippetbox_web::MIGRATOR.run(&pool).await?;

    tracing::info!("Creating session table...");
    PostgresStore::new(pool).migrate().await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
