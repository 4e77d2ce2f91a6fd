//! Robot serial numbers.

use core::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::code::RobotCode;

/// Whole-string `XX-XX` shape, alphanumeric on both sides of the dash.
pub(crate) static SERIAL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]{2}-[A-Za-z0-9]{2}$").expect("Invalid regex"));

/// Returns `true` if `serial` looks like `R2-D2` or `13-xs`.
///
/// ```
/// use r4c_core::serial_is_valid;
///
/// assert!(serial_is_valid("R2-D2"));
/// assert!(!serial_is_valid("R2D2"));
/// ```
#[must_use]
pub fn serial_is_valid(serial: &str) -> bool {
    SERIAL_PATTERN.is_match(serial)
}

/// Errors that can occur when parsing a [`Serial`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("serial must look like XX-XX (letters and digits)")]
pub struct SerialError;

/// A robot serial: `MODEL-VERSION`, uppercase.
///
/// Orders reference robots by serial only; there is no foreign key, the
/// fulfillment matcher compares serials by equality.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Serial(String);

impl Serial {
    /// Parse a customer-supplied serial, normalizing it to uppercase.
    ///
    /// # Errors
    ///
    /// Returns [`SerialError`] if the input does not match `XX-XX`.
    pub fn parse(s: &str) -> Result<Self, SerialError> {
        if !serial_is_valid(s) {
            return Err(SerialError);
        }
        Ok(Self(s.to_uppercase()))
    }

    /// Uppercase a value that already passed the field rules.
    pub(crate) fn from_checked(s: &str) -> Self {
        Self(s.to_uppercase())
    }

    /// Derive the serial of a robot from its model and version codes.
    #[must_use]
    pub fn from_parts(model: &RobotCode, version: &RobotCode) -> Self {
        Self(format!("{model}-{version}"))
    }

    /// Returns the serial as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Serial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Serial {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(feature = "sqlite")]
impl sqlx::Type<sqlx::Sqlite> for Serial {
    fn type_info() -> <sqlx::Sqlite as sqlx::Database>::TypeInfo {
        <String as sqlx::Type<sqlx::Sqlite>>::type_info()
    }

    fn compatible(ty: &<sqlx::Sqlite as sqlx::Database>::TypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Sqlite>>::compatible(ty)
    }
}

#[cfg(feature = "sqlite")]
impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for Serial {
    fn decode(
        value: <sqlx::Sqlite as sqlx::Database>::ValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Sqlite>>::decode(value)?;
        Ok(Self(s))
    }
}

#[cfg(feature = "sqlite")]
impl<'q> sqlx::Encode<'q, sqlx::Sqlite> for Serial {
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
    fn test_serial_is_valid() {
        assert!(serial_is_valid("R2-D2"));
        assert!(serial_is_valid("13-XS"));
        assert!(serial_is_valid("13-xs"));

        assert!(!serial_is_valid("R2D2"));
        assert!(!serial_is_valid("R2-D22"));
        assert!(!serial_is_valid(""));
        assert!(!serial_is_valid(" R2-D2"));
        assert!(!serial_is_valid("R2-D2\n"));
        assert!(!serial_is_valid("R!-D2"));
    }

    #[test]
    fn test_parse_uppercases() {
        let serial = Serial::parse("r2-d2").unwrap();
        assert_eq!(serial.as_str(), "R2-D2");
    }

    #[test]
    fn test_parse_rejects_invalid() {
        assert_eq!(Serial::parse("bad"), Err(SerialError));
    }

    #[test]
    fn test_from_parts() {
        let model = RobotCode::new("R2").unwrap();
        let version = RobotCode::new("D2").unwrap();
        assert_eq!(Serial::from_parts(&model, &version).as_str(), "R2-D2");
    }
}
