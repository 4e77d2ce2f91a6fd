//! Core types for R4C.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod code;
pub mod email;
pub mod id;
pub mod serial;

pub use code::RobotCode;
pub use email::{Email, EmailError, email_is_valid};
pub use id::*;
pub use serial::{Serial, SerialError, serial_is_valid};
