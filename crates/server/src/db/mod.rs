//! Database operations for the R4C `SQLite` store.
//!
//! # Tables
//!
//! - `customer` - Customers, deduplicated by email
//! - `robot` - Assembled robots reported by the production feed
//! - `robot_order` - Pending orders; `robot_serial` is matched by equality,
//!   not a foreign key
//!
//! # Migrations
//!
//! Migrations live in `crates/server/migrations/` and are embedded into the
//! binary. The server applies them on startup; they can also be run with:
//! ```bash
//! cargo run -p r4c-cli -- migrate
//! ```

pub mod customers;
pub mod gateway;
pub mod orders;
pub mod robots;

use std::str::FromStr;
use std::time::Duration;

use chrono::NaiveDateTime;
use r4c_core::TIMESTAMP_FORMAT;
use secrecy::{ExposeSecret, SecretString};
use sqlx::SqlitePool;
use sqlx::migrate::{MigrateError, Migrator};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;

pub use customers::CustomerRepository;
pub use gateway::{RobotCreatedHook, RobotGateway};
pub use orders::OrderRepository;
pub use robots::RobotRepository;

/// Embedded schema migrations.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Create a `SQLite` connection pool.
///
/// The database file is created if missing and foreign keys are enforced so
/// that deleting a customer cascades to its orders.
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is invalid or the database cannot be opened.
pub async fn create_pool(database_url: &SecretString) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url.expose_secret())?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}

/// Apply all pending migrations.
///
/// # Errors
///
/// Returns `MigrateError` if a migration fails or the applied history diverges.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await
}

/// Format a timestamp the way it is stored in `robot.created`.
pub(crate) fn to_db_timestamp(value: NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a stored `robot.created` value.
pub(crate) fn from_db_timestamp(value: &str) -> Result<NaiveDateTime, RepositoryError> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).map_err(|e| {
        RepositoryError::DataCorruption(format!("invalid timestamp in database '{value}': {e}"))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn test_timestamp_storage_format() {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(9, 5, 0)
            .unwrap();
        assert_eq!(to_db_timestamp(ts), "2024-01-01 09:05:00");
        assert_eq!(from_db_timestamp("2024-01-01 09:05:00").unwrap(), ts);
    }

    #[test]
    fn test_corrupt_timestamp() {
        assert!(matches!(
            from_db_timestamp("yesterday"),
            Err(RepositoryError::DataCorruption(_))
        ));
    }

    #[tokio::test]
    async fn test_migrations_apply_to_memory_db() {
        let pool = crate::testing::test_pool().await;
        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE '\\_%' ESCAPE '\\' AND name NOT LIKE 'sqlite%' ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();
        let names: Vec<_> = tables.into_iter().map(|(n,)| n).collect();
        assert_eq!(names, ["customer", "robot", "robot_order"]);
    }
}
