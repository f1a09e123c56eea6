//! User domain types.
//!
//! These types represent validated domain objects separate from database row types.

use chrono::{DateTime, Utc};

use snippetbox_core::{Email, UserId};

/// A registered user.
///
/// The password hash is deliberately not part of this type; it is only read
/// through `UserRepository::get_credentials` during login.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// User's email address.
    pub email: Email,
    /// When the user signed up.
    pub created: DateTime<Utc>,
}
