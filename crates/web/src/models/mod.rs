//! Domain models for Snippetbox.

pub mod session;
pub mod snippet;
pub mod user;

pub use session::keys as session_keys;
pub use snippet::Snippet;
pub use user::User;
