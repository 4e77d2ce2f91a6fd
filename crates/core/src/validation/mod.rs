//! Request validation.
//!
//! Field checks are declared once in [`rules`] as tables of [`FieldRule`]s and
//! shared by the order form and the robot registration feed. The parsers in
//! [`order`] and [`robot`] handle transport shape (form fields, JSON objects)
//! and then run the tables.
//!
//! Every failure is a [`ValidationError`] whose `Display` output is the message
//! returned to the client.

pub mod order;
pub mod robot;
pub mod rules;

use thiserror::Error;

pub use order::{NewOrderRequest, OrderForm, validate_new_order_request};
pub use robot::{NewRobotRequest, parse_new_robot_request};
pub use rules::{Checked, FieldRule, ORDER_FIELDS, ROBOT_FIELDS, Rule, TIMESTAMP_FORMAT};

/// Why an incoming request was rejected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is absent (or JSON `null`).
    #[error("'{0}' is missing")]
    MissingField(&'static str),

    /// A field does not match its pattern (serial, email).
    #[error("'{0}' is invalid")]
    InvalidFormat(&'static str),

    /// The request body is not UTF-8.
    #[error("Encoding must be 'utf-8'")]
    Encoding,

    /// The request body is not a JSON object.
    #[error("Invalid JSON")]
    MalformedJson,

    /// The JSON object carries keys other than the expected ones.
    #[error("Request must contain exactly {expected} params")]
    WrongShape {
        /// Number of keys the object must have.
        expected: usize,
    },

    /// A JSON field is present but not a string.
    #[error("'{0}' must be a string")]
    WrongFieldType(&'static str),

    /// A code field has the wrong number of non-whitespace characters.
    #[error("'{field}' must contain exactly {length} non-whitespace characters")]
    InvalidField {
        /// Offending field.
        field: &'static str,
        /// Required character count.
        length: usize,
    },

    /// A timestamp field does not follow the expected pattern.
    #[error("'{field}' must match the following pattern: '{format}'")]
    InvalidTimestamp {
        /// Offending field.
        field: &'static str,
        /// Expected `strftime` pattern.
        format: &'static str,
    },

    /// Another robot was already assembled at the same second.
    #[error("A robot assembled at this second already exists")]
    DuplicateTimestamp,
}
