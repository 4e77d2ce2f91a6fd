//! R4C robot order service library.
//!
//! Customers order robots by serial; the production feed registers assembled
//! robots; customers waiting for a serial are emailed when it is registered;
//! a weekly production report is exported as an `.xlsx` workbook.
//!
//! The binary in `main.rs` wires this library into an axum server. The CLI
//! and integration tests reuse it directly.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
