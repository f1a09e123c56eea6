//! Snippet repository backed by `PostgreSQL`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use snippetbox_core::SnippetId;

use super::{LATEST_SNIPPETS_LIMIT, RepositoryError, SnippetRepository};
use crate::models::Snippet;

/// `PostgreSQL` implementation of [`SnippetRepository`].
#[derive(Clone)]
pub struct PgSnippetRepository {
    pool: PgPool,
}

impl PgSnippetRepository {
    /// Create a new snippet repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct SnippetRow {
    id: SnippetId,
    title: String,
    content: String,
    created: DateTime<Utc>,
    expires: DateTime<Utc>,
}

impl From<SnippetRow> for Snippet {
    fn from(r: SnippetRow) -> Self {
        Self {
            id: r.id,
            title: r.title,
            content: r.content,
            created: r.created,
            expires: r.expires,
        }
    }
}

#[async_trait]
impl SnippetRepository for PgSnippetRepository {
    async fn insert(
        &self,
        title: &str,
        content: &str,
        expires_days: i32,
    ) -> Result<SnippetId, RepositoryError> {
        let id: SnippetId = sqlx::query_scalar(
            r"
            INSERT INTO snippets (title, content, created, expires)
            VALUES ($1, $2, now(), now() + make_interval(days => $3))
            RETURNING id
            ",
        )
        .bind(title)
        .bind(content)
        .bind(expires_days)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn get(&self, id: SnippetId) -> Result<Option<Snippet>, RepositoryError> {
        let row = sqlx::query_as::<_, SnippetRow>(
            r"
            SELECT id, title, content, created, expires
            FROM snippets
            WHERE expires > now() AND id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Snippet::from))
    }

    async fn latest(&self) -> Result<Vec<Snippet>, RepositoryError> {
        #[allow(clippy::cast_possible_wrap)] // small constant
        let limit = LATEST_SNIPPETS_LIMIT as i64;

        let rows = sqlx::query_as::<_, SnippetRow>(
            r"
            SELECT id, title, content, created, expires
            FROM snippets
            WHERE expires > now()
            ORDER BY id DESC
            LIMIT $1
            ",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Snippet::from).collect())
    }
}
