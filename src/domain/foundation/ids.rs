//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// Key of a user record in the `users` collection.
///
/// Derived from an email address so that every producer writing entitlements
/// (this relay, client apps, back-office scripts) lands on the same record for
/// the same human. The derivation must stay byte-for-byte identical to theirs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a UserId from an already-derived key, returning error if empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ValidationError::empty_field("user_id"));
        }
        Ok(Self(id))
    }

    /// Derives the user key from an email address.
    ///
    /// Lowercases the email, then replaces every character outside
    /// `[A-Za-z0-9._-]` with `_`. Non-ASCII characters are replaced per
    /// character, never per byte. Surrounding whitespace is not trimmed: it is
    /// part of the input every producer sees.
    pub fn from_email(email: &str) -> Result<Self, ValidationError> {
        if email.is_empty() {
            return Err(ValidationError::empty_field("email"));
        }

        let key: String = email
            .to_lowercase()
            .chars()
            .map(|c| if is_key_char(c) { c } else { '_' })
            .collect();

        Ok(Self(key))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn user_id_new_accepts_non_empty() {
        let id = UserId::new("a_b.com").unwrap();
        assert_eq!(id.as_str(), "a_b.com");
    }

    #[test]
    fn user_id_rejects_empty_string() {
        let result = UserId::new("");
        match result {
            Err(ValidationError::EmptyField { field }) => assert_eq!(field, "user_id"),
            _ => panic!("Expected EmptyField error"),
        }
    }

    #[test]
    fn from_email_replaces_at_sign() {
        let id = UserId::from_email("a@b.com").unwrap();
        assert_eq!(id.as_str(), "a_b.com");
    }

    #[test]
    fn from_email_lowercases_and_replaces_plus() {
        let id = UserId::from_email("A.User+x@Example.com").unwrap();
        assert_eq!(id.as_str(), "a.user_x_example.com");
    }

    #[test]
    fn from_email_keeps_safe_punctuation() {
        let id = UserId::from_email("first-last_2.0@mail.co").unwrap();
        assert_eq!(id.as_str(), "first-last_2.0_mail.co");
    }

    #[test]
    fn from_email_replaces_non_ascii_per_character() {
        let id = UserId::from_email("joão@exemplo.com.br").unwrap();
        assert_eq!(id.as_str(), "jo_o_exemplo.com.br");
    }

    #[test]
    fn from_email_rejects_empty() {
        assert!(UserId::from_email("").is_err());
    }

    #[test]
    fn from_email_does_not_trim_whitespace() {
        let id = UserId::from_email(" a@b.com").unwrap();
        assert_eq!(id.as_str(), "_a_b.com");
    }

    #[test]
    fn from_email_is_case_insensitive() {
        let lower = UserId::from_email("someone@example.com").unwrap();
        let upper = UserId::from_email("SomeOne@EXAMPLE.com").unwrap();
        assert_eq!(lower, upper);
    }

    #[test]
    fn user_id_displays_correctly() {
        let id = UserId::from_email("x@y.z").unwrap();
        assert_eq!(format!("{}", id), "x_y.z");
    }

    proptest! {
        #[test]
        fn from_email_is_deterministic(email in "[ -~]{1,40}") {
            let first = UserId::from_email(&email).unwrap();
            let second = UserId::from_email(&email).unwrap();
            prop_assert_eq!(first, second);
        }

        #[test]
        fn from_email_output_stays_in_safe_set(email in "\\PC{1,40}") {
            let id = UserId::from_email(&email).unwrap();
            prop_assert!(id.as_str().chars().all(is_key_char));
            prop_assert!(!id.as_str().chars().any(|c| c.is_ascii_uppercase()));
        }
    }
}
