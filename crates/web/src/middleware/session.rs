//! Session middleware configuration.
//!
//! Sessions use tower-sessions. Production runs on the `PostgreSQL` store,
//! tests on `MemoryStore`; the cookie settings are identical for both.

use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "snippetbox_session";

/// Session expiry time in seconds (12 hours of inactivity).
const SESSION_EXPIRY_SECONDS: i64 = 12 * 60 * 60;

/// Create the session layer for `store`.
///
/// # Arguments
///
/// * `store` - Session store backend
/// * `secure` - Whether to mark the cookie `Secure` (HTTPS deployments)
#[must_use]
pub fn create_session_layer<S: SessionStore>(store: S, secure: bool) -> SessionManagerLayer<S> {
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
