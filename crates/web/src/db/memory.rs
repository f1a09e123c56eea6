//! In-memory repositories for tests.
//!
//! Behave like the `PostgreSQL` repositories (expiry filtering, newest-first
//! ordering, unique emails) without needing a database.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::RwLock;

use snippetbox_core::{Email, SnippetId, UserId};

use super::{LATEST_SNIPPETS_LIMIT, RepositoryError, SnippetRepository, UserRepository};
use crate::models::{Snippet, User};

/// In-memory [`SnippetRepository`].
#[derive(Default)]
pub struct MemorySnippetRepository {
    snippets: RwLock<BTreeMap<SnippetId, Snippet>>,
}

#[async_trait]
impl SnippetRepository for MemorySnippetRepository {
    async fn insert(
        &self,
        title: &str,
        content: &str,
        expires_days: i32,
    ) -> Result<SnippetId, RepositoryError> {
        let mut snippets = self.snippets.write().await;
        let next = snippets.keys().next_back().map_or(1, |id| id.as_i32() + 1);
        let id = SnippetId::new(next);
        let created = Utc::now();

        snippets.insert(
            id,
            Snippet {
                id,
                title: title.to_owned(),
                content: content.to_owned(),
                created,
                expires: created + Duration::days(i64::from(expires_days)),
            },
        );

        Ok(id)
    }

    async fn get(&self, id: SnippetId) -> Result<Option<Snippet>, RepositoryError> {
        let now = Utc::now();
        Ok(self
            .snippets
            .read()
            .await
            .get(&id)
            .filter(|s| !s.is_expired(now))
            .cloned())
    }

    async fn latest(&self) -> Result<Vec<Snippet>, RepositoryError> {
        let now = Utc::now();
        Ok(self
            .snippets
            .read()
            .await
            .values()
            .rev()
            .filter(|s| !s.is_expired(now))
            .take(LATEST_SNIPPETS_LIMIT)
            .cloned()
            .collect())
    }
}

struct StoredUser {
    user: User,
    password_hash: String,
}

/// In-memory [`UserRepository`].
#[derive(Default)]
pub struct MemoryUserRepository {
    users: RwLock<Vec<StoredUser>>,
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn insert(
        &self,
        name: &str,
        email: &Email,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| &u.user.email == email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        let next = i32::try_from(users.len() + 1)
            .map_err(|_| RepositoryError::DataCorruption("too many users".to_owned()))?;
        let user = User {
            id: UserId::new(next),
            name: name.to_owned(),
            email: email.clone(),
            created: Utc::now(),
        };
        users.push(StoredUser {
            user: user.clone(),
            password_hash: password_hash.to_owned(),
        });

        Ok(user)
    }

    async fn get_credentials(
        &self,
        email: &Email,
    ) -> Result<Option<(UserId, String)>, RepositoryError> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|u| &u.user.email == email)
            .map(|u| (u.user.id, u.password_hash.clone())))
    }

    async fn exists(&self, id: UserId) -> Result<bool, RepositoryError> {
        Ok(self.users.read().await.iter().any(|u| u.user.id == id))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_snippets_get_and_latest() {
        let repo = MemorySnippetRepository::default();
        let first = repo.insert("First", "one", 7).await.unwrap();
        let second = repo.insert("Second", "two", 7).await.unwrap();

        assert_eq!(first, SnippetId::new(1));
        assert_eq!(second, SnippetId::new(2));
        assert_eq!(repo.get(first).await.unwrap().unwrap().title, "First");
        assert!(repo.get(SnippetId::new(99)).await.unwrap().is_none());

        let latest = repo.latest().await.unwrap();
        let titles: Vec<_> = latest.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, ["Second", "First"]);
    }

    #[tokio::test]
    async fn test_expired_snippets_are_hidden() {
        let repo = MemorySnippetRepository::default();
        let id = repo.insert("Gone", "already expired", 0).await.unwrap();

        assert!(repo.get(id).await.unwrap().is_none());
        assert!(repo.latest().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_latest_is_limited() {
        let repo = MemorySnippetRepository::default();
        for i in 0..15 {
            repo.insert(&format!("Snippet {i}"), "body", 1).await.unwrap();
        }

        let latest = repo.latest().await.unwrap();
        assert_eq!(latest.len(), LATEST_SNIPPETS_LIMIT);
        assert_eq!(latest[0].title, "Snippet 14");
    }

    #[tokio::test]
    async fn test_users_reject_duplicate_email() {
        let repo = MemoryUserRepository::default();
        let email = Email::parse("alice@example.com").unwrap();

        let alice = repo.insert("Alice", &email, "hash").await.unwrap();
        assert!(repo.exists(alice.id).await.unwrap());
        assert!(!repo.exists(UserId::new(42)).await.unwrap());

        let err = repo.insert("Alice again", &email, "hash").await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));

        let (id, hash) = repo.get_credentials(&email).await.unwrap().unwrap();
        assert_eq!(id, alice.id);
        assert_eq!(hash, "hash");
    }
}
