//! Robot registration payload validation.
//!
//! The production feed posts a JSON object with exactly three string fields:
//!
//! ```json
//! {"model": "R2", "version": "D2", "created": "2024-01-01 10:00:00"}
//! ```
//!
//! Parsing here is pure. The "one robot per second" check needs storage and is
//! applied by the server after [`parse_new_robot_request`] succeeds.

use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::{Map, Value};

use super::ValidationError;
use super::rules::{Checked, ROBOT_FIELDS, check_fields};
use crate::types::{RobotCode, Serial};

/// A validated robot registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewRobotRequest {
    pub model: RobotCode,
    pub version: RobotCode,
    pub created: NaiveDateTime,
}

impl NewRobotRequest {
    /// Serial the new robot will carry: `MODEL-VERSION`.
    #[must_use]
    pub fn serial(&self) -> Serial {
        Serial::from_parts(&self.model, &self.version)
    }
}

/// Parse and validate a raw registration body.
///
/// # Errors
///
/// In the order they are checked:
/// - [`ValidationError::Encoding`] if the body is not UTF-8
/// - [`ValidationError::MalformedJson`] if it is not a JSON object
/// - [`ValidationError::MissingField`] / [`ValidationError::WrongFieldType`]
///   for each of `model`, `version`, `created`
/// - [`ValidationError::WrongShape`] if the object has extra keys
/// - [`ValidationError::InvalidField`] / [`ValidationError::InvalidTimestamp`]
///   from the field rules
pub fn parse_new_robot_request(body: &[u8]) -> Result<NewRobotRequest, ValidationError> {
    let text = std::str::from_utf8(body).map_err(|_| ValidationError::Encoding)?;
    let value: Value = serde_json::from_str(text).map_err(|_| ValidationError::MalformedJson)?;
    let Value::Object(params) = value else {
        return Err(ValidationError::MalformedJson);
    };

    for rule in &ROBOT_FIELDS {
        string_field(&params, rule.field)?;
    }
    if params.len() != ROBOT_FIELDS.len() {
        return Err(ValidationError::WrongShape {
            expected: ROBOT_FIELDS.len(),
        });
    }

    let checked = check_fields(&ROBOT_FIELDS, |name| params.get(name).and_then(Value::as_str))?;
    let [
        Checked::Text(model),
        Checked::Text(version),
        Checked::Timestamp(created),
    ] = checked.as_slice()
    else {
        return Err(ValidationError::WrongShape {
            expected: ROBOT_FIELDS.len(),
        });
    };

    Ok(NewRobotRequest {
        model: RobotCode::from_checked(model),
        version: RobotCode::from_checked(version),
        created: *created,
    })
}

fn string_field<'a>(
    params: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a str, ValidationError> {
    match params.get(field) {
        None | Some(Value::Null) => Err(ValidationError::MissingField(field)),
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(ValidationError::WrongFieldType(field)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::validation::TIMESTAMP_FORMAT;

    fn parse(value: &Value) -> Result<NewRobotRequest, ValidationError> {
        parse_new_robot_request(value.to_string().as_bytes())
    }

    #[test]
    fn test_valid_request_is_normalized() {
        let robot = parse(&serde_json::json!({
            "model": "r2",
            "version": "d2",
            "created": "2024-01-01 10:00:00"
        }))
        .unwrap();

        assert_eq!(robot.model.as_str(), "R2");
        assert_eq!(robot.version.as_str(), "D2");
        assert_eq!(
            robot.created,
            NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap()
        );
        assert_eq!(robot.serial().as_str(), "R2-D2");
    }

    #[test]
    fn test_any_two_characters_are_accepted() {
        let robot = parse(&serde_json::json!({
            "model": "R!",
            "version": "d2",
            "created": "2024-01-01 10:00:00"
        }))
        .unwrap();
        assert_eq!(robot.serial().as_str(), "R!-D2");

        // uppercasing may widen a code
        let robot = parse(&serde_json::json!({
            "model": "ßa",
            "version": "D2",
            "created": "2024-01-01 10:00:00"
        }))
        .unwrap();
        assert_eq!(robot.model.as_str(), "SSA");
    }

    #[test]
    fn test_parsing_is_idempotent() {
        let body = br#"{"model":"r2","version":"d2","created":"2024-01-01 10:00:00"}"#;
        let first = parse_new_robot_request(body).unwrap();
        let second = parse_new_robot_request(body).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_rejects_non_utf8() {
        let body = [0x7b, 0xff, 0xfe, 0x7d];
        assert_eq!(
            parse_new_robot_request(&body),
            Err(ValidationError::Encoding)
        );
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert_eq!(
            parse_new_robot_request(b"{\"model\": "),
            Err(ValidationError::MalformedJson)
        );
        assert_eq!(
            parse_new_robot_request(b"[1, 2, 3]"),
            Err(ValidationError::MalformedJson)
        );
    }

    #[test]
    fn test_missing_version() {
        let result = parse(&serde_json::json!({
            "model": "R2",
            "created": "2024-01-01 10:00:00"
        }));
        assert_eq!(result, Err(ValidationError::MissingField("version")));
    }

    #[test]
    fn test_null_is_missing() {
        let result = parse(&serde_json::json!({
            "model": null,
            "version": "D2",
            "created": "2024-01-01 10:00:00"
        }));
        assert_eq!(result, Err(ValidationError::MissingField("model")));
    }

    #[test]
    fn test_non_string_model() {
        let result = parse(&serde_json::json!({
            "model": 22,
            "version": "D2",
            "created": "2024-01-01 10:00:00"
        }));
        assert_eq!(result, Err(ValidationError::WrongFieldType("model")));
    }

    #[test]
    fn test_extra_keys() {
        let result = parse(&serde_json::json!({
            "model": "R2",
            "version": "D2",
            "created": "2024-01-01 10:00:00",
            "color": "blue"
        }));
        assert_eq!(result, Err(ValidationError::WrongShape { expected: 3 }));
    }

    #[test]
    fn test_bad_code_length() {
        let result = parse(&serde_json::json!({
            "model": "R2D",
            "version": "D2",
            "created": "2024-01-01 10:00:00"
        }));
        assert_eq!(
            result,
            Err(ValidationError::InvalidField {
                field: "model",
                length: 2
            })
        );
    }

    #[test]
    fn test_whitespace_version() {
        let result = parse(&serde_json::json!({
            "model": "R2",
            "version": "D ",
            "created": "2024-01-01 10:00:00"
        }));
        assert_eq!(
            result,
            Err(ValidationError::InvalidField {
                field: "version",
                length: 2
            })
        );
    }

    #[test]
    fn test_bad_timestamp() {
        let result = parse(&serde_json::json!({
            "model": "R2",
            "version": "D2",
            "created": "01.01.2024 10:00"
        }));
        assert_eq!(
            result,
            Err(ValidationError::InvalidTimestamp {
                field: "created",
                format: TIMESTAMP_FORMAT
            })
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ValidationError::MissingField("version").to_string(),
            "'version' is missing"
        );
        assert_eq!(
            ValidationError::InvalidTimestamp {
                field: "created",
                format: TIMESTAMP_FORMAT
            }
            .to_string(),
            "'created' must match the following pattern: '%Y-%m-%d %H:%M:%S'"
        );
    }
}
