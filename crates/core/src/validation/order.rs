//! Customer order form validation.

use serde::Deserialize;

use super::ValidationError;
use super::rules::{Checked, ORDER_FIELDS, check_fields};
use crate::types::{Email, Serial};

/// Raw order form as submitted by the browser.
///
/// Both fields are optional at this stage so that a missing field is reported
/// as [`ValidationError::MissingField`] rather than a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderForm {
    pub serial: Option<String>,
    pub email: Option<String>,
}

impl OrderForm {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "serial" => self.serial.as_deref(),
            "email" => self.email.as_deref(),
            _ => None,
        }
    }
}

/// A validated order: uppercase serial, email exactly as entered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderRequest {
    pub serial: Serial,
    pub email: Email,
}

/// Validate an order form.
///
/// # Errors
///
/// - [`ValidationError::MissingField`] if `serial` or `email` is absent
/// - [`ValidationError::InvalidFormat`] if either fails its pattern, or the
///   email is too long to store
pub fn validate_new_order_request(form: &OrderForm) -> Result<NewOrderRequest, ValidationError> {
    let checked = check_fields(&ORDER_FIELDS, |name| form.field(name))?;
    let [Checked::Text(serial), Checked::Text(email)] = checked.as_slice() else {
        return Err(ValidationError::WrongShape {
            expected: ORDER_FIELDS.len(),
        });
    };

    Ok(NewOrderRequest {
        serial: Serial::from_checked(serial),
        email: Email::from_checked(email),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form(serial: Option<&str>, email: Option<&str>) -> OrderForm {
        OrderForm {
            serial: serial.map(String::from),
            email: email.map(String::from),
        }
    }

    #[test]
    fn test_missing_serial() {
        let result = validate_new_order_request(&form(None, Some("a@b.c")));
        assert_eq!(result, Err(ValidationError::MissingField("serial")));
    }

    #[test]
    fn test_missing_email() {
        let result = validate_new_order_request(&form(Some("R2-D2"), None));
        assert_eq!(result, Err(ValidationError::MissingField("email")));
    }

    #[test]
    fn test_invalid_serial() {
        let result = validate_new_order_request(&form(Some("bad"), Some("a@b.c")));
        assert_eq!(result, Err(ValidationError::InvalidFormat("serial")));
    }

    #[test]
    fn test_invalid_email() {
        let result = validate_new_order_request(&form(Some("R2-D2"), Some("a.b.com")));
        assert_eq!(result, Err(ValidationError::InvalidFormat("email")));
    }

    #[test]
    fn test_overlong_email() {
        let email = format!("{}@robots.io", "a".repeat(Email::MAX_LENGTH));
        let result = validate_new_order_request(&form(Some("R2-D2"), Some(&email)));
        assert_eq!(result, Err(ValidationError::InvalidFormat("email")));
    }

    #[test]
    fn test_valid_request_normalizes_serial_only() {
        let order = validate_new_order_request(&form(Some("r2-d2"), Some("Buyer@Shop.io"))).unwrap();
        assert_eq!(order.serial.as_str(), "R2-D2");
        assert_eq!(order.email.as_str(), "Buyer@Shop.io");
    }

    #[test]
    fn test_form_deserializes_from_urlencoded_shape() {
        let form: OrderForm =
            serde_json::from_value(serde_json::json!({"serial": "13-xs"})).unwrap();
        assert_eq!(form.serial.as_deref(), Some("13-xs"));
        assert!(form.email.is_none());
    }
}
