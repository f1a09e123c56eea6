//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::SnippetboxConfig;
use crate::db::{PgSnippetRepository, PgUserRepository, SnippetRepository, UserRepository};
use crate::services::AuthService;

/// Application state shared across all handlers and middleware.
///
/// This struct is cheaply cloneable via `Arc`. Repositories are held as
/// trait objects so tests can run the full router against in-memory stores.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    secure_cookies: bool,
    snippets: Arc<dyn SnippetRepository>,
    users: Arc<dyn UserRepository>,
}

impl AppState {
    /// Create application state backed by `PostgreSQL`.
    #[must_use]
    pub fn new(config: &SnippetboxConfig, pool: PgPool) -> Self {
        Self::with_repositories(
            config.secure_cookies(),
            Arc::new(PgSnippetRepository::new(pool.clone())),
            Arc::new(PgUserRepository::new(pool)),
        )
    }

    /// Create application state from explicit repositories.
    #[must_use]
    pub fn with_repositories(
        secure_cookies: bool,
        snippets: Arc<dyn SnippetRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                secure_cookies,
                snippets,
                users,
            }),
        }
    }

    /// Whether cookies are marked `Secure`.
    #[must_use]
    pub fn secure_cookies(&self) -> bool {
        self.inner.secure_cookies
    }

    /// Snippet storage.
    #[must_use]
    pub fn snippets(&self) -> &dyn SnippetRepository {
        self.inner.snippets.as_ref()
    }

    /// User storage.
    #[must_use]
    pub fn users(&self) -> &dyn UserRepository {
        self.inner.users.as_ref()
    }

    /// Authentication service over the user store.
    #[must_use]
    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(self.users())
    }
}
