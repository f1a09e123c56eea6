//! Seed the database with sample snippets for local development.

use snippetbox_core::SnippetId;
use snippetbox_web::db::{PgSnippetRepository, RepositoryError, SnippetRepository};

use super::{CommandError, connect};

/// A snippet to insert: title, content, lifetime in days.
type SampleSnippet = (&'static str, &'static str, i32);

/// Sample snippets, oldest first.
pub const SAMPLE_SNIPPETS: [SampleSnippet; 3] = [
    (
        "An old silent pond",
        "An old silent pond...\nA frog jumps into the pond,\nsplash! Silence again.\n\n- Matsuo Bashō",
        365,
    ),
    (
        "Over the wintry forest",
        "Over the wintry\nforest, winds howl in rage\nwith no leaves to blow.\n\n- Natsume Soseki",
        365,
    ),
    (
        "First autumn morning",
        "First autumn morning\nthe mirror I stare into\nshows my father's face.\n\n- Murakami Kijo",
        7,
    ),
];

/// Insert the sample snippets into `repo`, returning their IDs.
///
/// # Errors
///
/// Returns the first repository error encountered.
pub async fn seed_snippets(repo: &dyn SnippetRepository) -> Result<Vec<SnippetId>, RepositoryError> {
    let mut ids = Vec::with_capacity(SAMPLE_SNIPPETS.len());
    for (title, content, expires_days) in SAMPLE_SNIPPETS {
        let id = repo.insert(title, content, expires_days).await?;
        tracing::info!(snippet_id = %id, title, "Seeded snippet");
        ids.push(id);
    }
    Ok(ids)
}

/// Seed the configured database.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;
    let ids = seed_snippets(&PgSnippetRepository::new(pool)).await?;

    tracing::info!(count = ids.len(), "Seeding complete!");
    Ok(())
}
