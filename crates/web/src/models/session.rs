//! Session-related keys.
//!
//! Values stored in the session for authentication and page state.

/// Session keys for authentication data.
pub mod keys {
    /// Key for the authenticated user's ID.
    pub const AUTHENTICATED_USER_ID: &str = "authenticated_user_id";

    /// Key for the per-session CSRF token.
    pub const CSRF_TOKEN: &str = "csrf_token";

    /// Key for a one-shot flash message shown on the next rendered page.
    pub const FLASH: &str = "flash";

    /// Key for the path to return to after a successful login.
    pub const REDIRECT_AFTER_LOGIN: &str = "redirect_after_login";
}
