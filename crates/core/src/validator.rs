//! Form validation helpers.
//!
//! A [`Validator`] collects errors while a handler checks a submitted form.
//! Field errors are keyed by the form field name so templates can show them
//! next to the offending input; non-field errors apply to the form as a whole
//! (for example "Email or password is incorrect").
//!
//! ```
//! use snippetbox_core::validator::{self, Validator};
//!
//! let title = "";
//! let mut v = Validator::default();
//! v.check_field(validator::not_blank(title), "title", "This field cannot be blank");
//! v.check_field(validator::max_chars(title, 100), "title", "Too long");
//!
//! assert!(!v.is_valid());
//! assert_eq!(v.field_error("title"), Some("This field cannot be blank"));
//! ```

use std::collections::BTreeMap;

use crate::Email;

/// Accumulates validation errors for a single form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validator {
    field_errors: BTreeMap<String, String>,
    non_field_errors: Vec<String>,
}

impl Validator {
    /// Returns `true` if no errors have been recorded.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.field_errors.is_empty() && self.non_field_errors.is_empty()
    }

    /// Record an error for `key` unless the field already has one.
    ///
    /// The first failing check for a field wins, so order checks from the
    /// most to the least fundamental.
    pub fn add_field_error(&mut self, key: &str, message: &str) {
        self.field_errors
            .entry(key.to_owned())
            .or_insert_with(|| message.to_owned());
    }

    /// Record an error that is not tied to a specific field.
    pub fn add_non_field_error(&mut self, message: &str) {
        self.non_field_errors.push(message.to_owned());
    }

    /// Record `message` for `key` if `ok` is false.
    pub fn check_field(&mut self, ok: bool, key: &str, message: &str) {
        if !ok {
            self.add_field_error(key, message);
        }
    }

    /// The error recorded for `key`, if any.
    #[must_use]
    pub fn field_error(&self, key: &str) -> Option<&str> {
        self.field_errors.get(key).map(String::as_str)
    }

    /// All field errors, ordered by field name.
    #[must_use]
    pub const fn field_errors(&self) -> &BTreeMap<String, String> {
        &self.field_errors
    }

    /// All non-field errors in the order they were added.
    #[must_use]
    pub fn non_field_errors(&self) -> &[String] {
        &self.non_field_errors
    }
}

/// Returns `true` if the value contains something other than whitespace.
#[must_use]
pub fn not_blank(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Returns `true` if the value has at most `n` characters.
#[must_use]
pub fn max_chars(value: &str, n: usize) -> bool {
    value.chars().count() <= n
}

/// Returns `true` if the value has at least `n` characters.
#[must_use]
pub fn min_chars(value: &str, n: usize) -> bool {
    value.chars().count() >= n
}

/// Returns `true` if the value is one of `permitted`.
#[must_use]
pub fn permitted_value<T: PartialEq>(value: &T, permitted: &[T]) -> bool {
    permitted.contains(value)
}

/// Returns `true` if the value is a well-formed email address.
#[must_use]
pub fn is_email(value: &str) -> bool {
    Email::parse(value).is_ok()
}
