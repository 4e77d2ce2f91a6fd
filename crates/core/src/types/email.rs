//! Email address type.

use core::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Whole-string `local@domain.tld` shape.
pub(crate) static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@]+@[^@]+\.[^@]+$").expect("Invalid regex"));

/// Returns `true` if `email` matches the `local@domain.tld` shape exactly.
///
/// ```
/// use r4c_core::email_is_valid;
///
/// assert!(email_is_valid("a@b.c"));
/// assert!(!email_is_valid("a@b"));
/// ```
#[must_use]
pub fn email_is_valid(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Errors that can occur when parsing an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    /// The input does not have the `local@domain.tld` shape.
    #[error("email must look like local@domain.tld")]
    InvalidFormat,
    /// The input string is too long for the customer table.
    #[error("email must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// A customer email address.
///
/// ## Constraints
///
/// - Matches `[^@]+@[^@]+\.[^@]+` as a whole
/// - At most 255 characters (width of the `customer.email` column)
///
/// The address is stored exactly as entered; no case folding is applied.
///
/// ## Examples
///
/// ```
/// use r4c_core::Email;
///
/// assert!(Email::parse("buyer@robots.example").is_ok());
/// assert!(Email::parse("a.b.com").is_err());
/// assert!(Email::parse("@b.c").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Maximum length of a stored email address.
    pub const MAX_LENGTH: usize = 255;

    /// Parse an `Email` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is longer than 255 characters or does
    /// not match the `local@domain.tld` shape.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        if s.chars().count() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if !email_is_valid(s) {
            return Err(EmailError::InvalidFormat);
        }

        Ok(Self(s.to_owned()))
    }

    /// Keep a value that already passed the field rules.
    pub(crate) fn from_checked(s: &str) -> Self {
        Self(s.to_owned())
    }

    /// Returns the email address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Email` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(feature = "sqlite")]
impl sqlx::Type<sqlx::Sqlite> for Email {
    fn type_info() -> <sqlx::Sqlite as sqlx::Database>::TypeInfo {
        <String as sqlx::Type<sqlx::Sqlite>>::type_info()
    }

    fn compatible(ty: &<sqlx::Sqlite as sqlx::Database>::TypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Sqlite>>::compatible(ty)
    }
}

#[cfg(feature = "sqlite")]
impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for Email {
    fn decode(
        value: <sqlx::Sqlite as sqlx::Database>::ValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Sqlite>>::decode(value)?;
        // Database values are assumed valid
        Ok(Self(s))
    }
}

#[cfg(feature = "sqlite")]
impl<'q> sqlx::Encode<'q, sqlx::Sqlite> for Email {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::Sqlite as sqlx::Database>::ArgumentBuffer<'q>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Sqlite>>::encode(self.0.clone(), buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_email_is_valid_accepts_minimal_shape() {
        assert!(email_is_valid("a@b.c"));
        assert!(email_is_valid("user.name+tag@domain.co.uk"));
    }

    #[test]
    fn test_email_is_valid_rejects_bad_shapes() {
        assert!(!email_is_valid("a@b"));
        assert!(!email_is_valid("a.b.com"));
        assert!(!email_is_valid("@b.c"));
        assert!(!email_is_valid(""));
        assert!(!email_is_valid("a@@b.c"));
        assert!(!email_is_valid("a@b."));
    }

    #[test]
    fn test_parse_too_long() {
        let long = format!("{}@example.com", "a".repeat(250));
        assert!(matches!(
            Email::parse(&long),
            Err(EmailError::TooLong { .. })
        ));
    }

    #[test]
    fn test_parse_keeps_case() {
        let email = Email::parse("Buyer@Robots.Example").unwrap();
        assert_eq!(email.as_str(), "Buyer@Robots.Example");
    }

    #[test]
    fn test_serde_roundtrip() {
        let email = Email::parse("user@example.com").unwrap();
        let json = serde_json::to_string(&email).unwrap();
        assert_eq!(json, "\"user@example.com\"");

        let parsed: Email = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, email);
    }
}
