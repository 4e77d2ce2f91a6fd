//! Two-character robot model and version codes.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A robot model or version code, e.g. `R2` or `D2`.
///
/// Exactly [`RobotCode::LENGTH`] characters, none of them whitespace at either
/// end. Stored uppercase.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct RobotCode(String);

impl RobotCode {
    /// Required number of characters.
    pub const LENGTH: usize = 2;

    /// Returns `true` if `value` has exactly two characters and none of them
    /// is trimmed away as surrounding whitespace.
    #[must_use]
    pub fn is_valid(value: &str) -> bool {
        value.chars().count() == Self::LENGTH && value.trim().chars().count() == Self::LENGTH
    }

    /// Build a code from raw input, uppercasing it.
    ///
    /// Returns `None` when [`RobotCode::is_valid`] rejects the input.
    #[must_use]
    pub fn new(value: &str) -> Option<Self> {
        Self::is_valid(value).then(|| Self(value.to_uppercase()))
    }

    /// Uppercase a value that already passed the field rules.
    pub(crate) fn from_checked(value: &str) -> Self {
        Self(value.to_uppercase())
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RobotCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RobotCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(feature = "sqlite")]
impl sqlx::Type<sqlx::Sqlite> for RobotCode {
    fn type_info() -> <sqlx::Sqlite as sqlx::Database>::TypeInfo {
        <String as sqlx::Type<sqlx::Sqlite>>::type_info()
    }

    fn compatible(ty: &<sqlx::Sqlite as sqlx::Database>::TypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Sqlite>>::compatible(ty)
    }
}

#[cfg(feature = "sqlite")]
impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for RobotCode {
    fn decode(
        value: <sqlx::Sqlite as sqlx::Database>::ValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Sqlite>>::decode(value)?;
        Ok(Self(s))
    }
}

#[cfg(feature = "sqlite")]
impl<'q> sqlx::Encode<'q, sqlx::Sqlite> for RobotCode {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::Sqlite as sqlx::Database>::ArgumentBuffer<'q>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Sqlite>>::encode(self.0.clone(), buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uppercases() {
        assert_eq!(RobotCode::new("r2").map(|c| c.to_string()), Some("R2".into()));
        assert_eq!(RobotCode::new("13").map(|c| c.to_string()), Some("13".into()));
    }

    #[test]
    fn test_rejects_wrong_length() {
        assert!(RobotCode::new("").is_none());
        assert!(RobotCode::new("R").is_none());
        assert!(RobotCode::new("R2D").is_none());
    }

    #[test]
    fn test_rejects_surrounding_whitespace() {
        assert!(RobotCode::new(" R").is_none());
        assert!(RobotCode::new("R ").is_none());
        assert!(RobotCode::new("  ").is_none());
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        assert!(RobotCode::is_valid("ЖЖ"));
        assert_eq!(RobotCode::new("жж").map(|c| c.to_string()), Some("ЖЖ".into()));
    }
}
