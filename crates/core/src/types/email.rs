//! Email address type.

use core::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// The address pattern browsers apply to `<input type="email">` (WHATWG HTML).
static EMAIL_RX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("Invalid regex")
});

/// Errors that can occur when parsing an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    #[error("email cannot be empty")]
    Empty,
    #[error("email must be at most {max} characters")]
    TooLong { max: usize },
    #[error("email is not a valid address")]
    InvalidFormat,
}

/// A validated email address, stored as the `users.email` column.
///
/// Accepts exactly what a browser accepts in an `<input type="email">`
/// field, up to the RFC 5321 length limit.
///
/// ```
/// use snippetbox_core::Email;
///
/// assert!(Email::parse("user.name+tag@domain.co.uk").is_ok());
/// assert!(Email::parse("@domain.com").is_err());
/// assert!(Email::parse("bob@example.").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    /// Maximum length of an email address (RFC 5321).
    pub const MAX_LENGTH: usize = 254;

    /// Parse an `Email` from untrusted input.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, longer than 254 bytes, or
    /// does not match the HTML address pattern.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        if s.is_empty() {
            return Err(EmailError::Empty);
        }
        if s.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        if !EMAIL_RX.is_match(s) {
            return Err(EmailError::InvalidFormat);
        }

        Ok(Self(s.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Email {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Email {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Only validated addresses are ever written
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Email {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_emails() {
        for input in [
            "alice@example.com",
            "user+tag@example.com",
            "user@subdomain.example.co.uk",
            "o'brien@example.com",
            "a@b",
        ] {
            assert!(Email::parse(input).is_ok(), "input {input:?}");
        }
    }

    #[test]
    fn test_parse_length_limits() {
        assert_eq!(Email::parse(""), Err(EmailError::Empty));

        let long = format!("{}@example.com", "a".repeat(250));
        assert_eq!(
            Email::parse(&long),
            Err(EmailError::TooLong {
                max: Email::MAX_LENGTH
            })
        );
    }

    #[test]
    fn test_parse_invalid_format() {
        for input in [
            "no-at-symbol",
            "@domain.com",
            "user@",
            "bob@example.",
            "bob@.example.com",
            "bob@exa mple.com",
            "bob@-example.com",
            "two@@example.com",
        ] {
            assert_eq!(
                Email::parse(input),
                Err(EmailError::InvalidFormat),
                "input {input:?}"
            );
        }
    }

    #[test]
    fn test_display_matches_input() {
        let email = Email::parse("alice@example.com").unwrap();
        assert_eq!(email.to_string(), "alice@example.com");
        assert_eq!(email.as_str(), "alice@example.com");
    }
}
