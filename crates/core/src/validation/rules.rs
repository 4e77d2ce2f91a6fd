//! Declarative field rules.
//!
//! Each request type is described by a table of [`FieldRule`]s. Tables are
//! checked in two passes: every field must be present before any field is
//! checked against its rules, so a request missing `email` reports the missing
//! field even when `serial` is also malformed.
//!
//! A passing table yields one [`Checked`] value per field, so callers convert
//! without re-validating.

use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;

use super::ValidationError;
use crate::types::code::RobotCode;
use crate::types::email::{EMAIL_PATTERN, Email};
use crate::types::serial::SERIAL_PATTERN;

/// Timestamp layout accepted for `created`, second resolution.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single check applied to a field value.
#[derive(Debug)]
pub enum Rule {
    /// Value must match the pattern as a whole.
    Pattern(&'static LazyLock<Regex>),
    /// Value must have at most this many characters.
    MaxChars(usize),
    /// Value must have exactly this many characters, none trimmed as whitespace.
    ExactChars(usize),
    /// Value must parse with the given `strftime` layout.
    Timestamp(&'static str),
}

/// A field value that passed its rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Checked<'a> {
    /// The raw value, unchanged.
    Text(&'a str),
    /// The value parsed by a [`Rule::Timestamp`].
    Timestamp(NaiveDateTime),
}

impl Rule {
    /// Check `value` of `field` against this rule.
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] matching the rule kind.
    pub fn check<'a>(
        &self,
        field: &'static str,
        value: &'a str,
    ) -> Result<Checked<'a>, ValidationError> {
        match self {
            Self::Pattern(pattern) => pattern
                .is_match(value)
                .then_some(Checked::Text(value))
                .ok_or(ValidationError::InvalidFormat(field)),
            Self::MaxChars(max) => (value.chars().count() <= *max)
                .then_some(Checked::Text(value))
                .ok_or(ValidationError::InvalidFormat(field)),
            Self::ExactChars(length) => {
                let fits = value.chars().count() == *length
                    && value.trim().chars().count() == *length;
                fits.then_some(Checked::Text(value)).ok_or(ValidationError::InvalidField {
                    field,
                    length: *length,
                })
            }
            Self::Timestamp(format) => NaiveDateTime::parse_from_str(value, format)
                .map(Checked::Timestamp)
                .map_err(|_| ValidationError::InvalidTimestamp {
                    field,
                    format: *format,
                }),
        }
    }
}

/// A named field and the rules its value must satisfy.
#[derive(Debug)]
pub struct FieldRule {
    /// Field name as it appears in the request.
    pub field: &'static str,
    /// Rules applied in order; the first failure wins.
    pub rules: &'static [Rule],
}

impl FieldRule {
    /// Check a present value against every rule of this field, yielding the
    /// result of the last rule.
    ///
    /// # Errors
    ///
    /// Returns the first failing rule's error.
    pub fn check<'a>(&self, value: &'a str) -> Result<Checked<'a>, ValidationError> {
        self.rules
            .iter()
            .try_fold(Checked::Text(value), |_, rule| rule.check(self.field, value))
    }
}

/// Fields of the customer order form.
pub static ORDER_FIELDS: [FieldRule; 2] = [
    FieldRule {
        field: "serial",
        rules: &[Rule::Pattern(&SERIAL_PATTERN)],
    },
    FieldRule {
        field: "email",
        rules: &[Rule::MaxChars(Email::MAX_LENGTH), Rule::Pattern(&EMAIL_PATTERN)],
    },
];

/// Fields of the robot registration payload.
pub static ROBOT_FIELDS: [FieldRule; 3] = [
    FieldRule {
        field: "model",
        rules: &[Rule::ExactChars(RobotCode::LENGTH)],
    },
    FieldRule {
        field: "version",
        rules: &[Rule::ExactChars(RobotCode::LENGTH)],
    },
    FieldRule {
        field: "created",
        rules: &[Rule::Timestamp(TIMESTAMP_FORMAT)],
    },
];

/// Check every field of `table`, looking values up through `lookup`.
///
/// # Errors
///
/// Returns [`ValidationError::MissingField`] for the first absent field, or
/// the first rule failure once all fields are present.
pub fn check_fields<'a>(
    table: &[FieldRule],
    lookup: impl Fn(&'static str) -> Option<&'a str>,
) -> Result<Vec<Checked<'a>>, ValidationError> {
    let values = table
        .iter()
        .map(|rule| {
            lookup(rule.field)
                .map(|value| (rule, value))
                .ok_or(ValidationError::MissingField(rule.field))
        })
        .collect::<Result<Vec<_>, _>>()?;

    values
        .into_iter()
        .map(|(rule, value)| rule.check(value))
        .collect()
}
