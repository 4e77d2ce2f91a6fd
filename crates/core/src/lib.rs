//! R4C Core - Shared domain types and validators.
//!
//! This crate provides the types used across all R4C components:
//! - `server` - HTTP service for customer orders and the production feed
//! - `cli` - Command-line tools for migrations, reports and manual registration
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP. Validation of incoming requests lives here so it can be
//! exercised without a running service.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, serials, robot codes and emails
//! - [`validation`] - Declarative field rules and request parsers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;
pub mod validation;

pub use types::*;
pub use validation::{
    FieldRule, NewOrderRequest, NewRobotRequest, OrderForm, Rule, TIMESTAMP_FORMAT,
    ValidationError, parse_new_robot_request, validate_new_order_request,
};
