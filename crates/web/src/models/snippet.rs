//! Snippet domain type.

use chrono::{DateTime, Utc};

use snippetbox_core::SnippetId;

/// A published snippet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    /// Unique snippet ID.
    pub id: SnippetId,
    /// Short title shown in listings.
    pub title: String,
    /// Snippet body text.
    pub content: String,
    /// When the snippet was created.
    pub created: DateTime<Utc>,
    /// When the snippet stops being visible.
    pub expires: DateTime<Utc>,
}

impl Snippet {
    /// Returns `true` if the snippet is past its expiry at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires <= now
    }
}
