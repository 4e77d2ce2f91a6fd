//! Test doubles shared by unit and integration tests.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

use crate::db::run_migrations;
use crate::services::email::{EmailError, Notification, Notifier};

/// Notifier that records every notification instead of sending it.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    /// Notifications received so far, in order.
    #[must_use]
    pub fn sent(&self) -> Vec<Notification> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), EmailError> {
        notification.render()?;
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification.clone());
        Ok(())
    }
}

/// Notifier whose every delivery fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), EmailError> {
        Err(EmailError::InvalidAddress(notification.to.to_string()))
    }
}

/// In-memory database with migrations applied.
///
/// Uses a single connection: every `sqlite::memory:` connection is its own
/// database.
///
/// # Panics
///
/// Panics if the database cannot be opened or migrated.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await
        .expect("Failed to enable foreign keys");
    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}
