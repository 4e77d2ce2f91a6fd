//! Robot creation gateway with post-insert hooks.
//!
//! Registering a robot is the one write in the system with a side effect:
//! customers waiting for that serial must be told it exists. Rather than
//! relying on an implicit model signal, the gateway runs every registered
//! [`RobotCreatedHook`] explicitly once the insert has committed, handing each
//! one the stored [`Robot`] snapshot.

use std::sync::Arc;

use async_trait::async_trait;
use r4c_core::NewRobotRequest;
use sqlx::SqlitePool;

use super::{RepositoryError, RobotRepository};
use crate::models::Robot;

/// Reacts to a robot having been stored.
#[async_trait]
pub trait RobotCreatedHook: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Called after `robot` has been durably inserted.
    ///
    /// # Errors
    ///
    /// Errors are logged by the gateway; they never undo the insert.
    async fn on_robot_created(&self, robot: &Robot) -> Result<(), RepositoryError>;
}

/// Inserts robots and runs post-insert hooks in registration order.
#[derive(Clone)]
pub struct RobotGateway {
    pool: SqlitePool,
    hooks: Vec<Arc<dyn RobotCreatedHook>>,
}

impl RobotGateway {
    /// Create a gateway with no hooks.
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            hooks: Vec::new(),
        }
    }

    /// Register a hook to run after each insert.
    #[must_use]
    pub fn with_hook(mut self, hook: Arc<dyn RobotCreatedHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    /// Pool the gateway writes to.
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Insert a robot, then run every hook against the stored record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` only if the insert itself fails. Hook
    /// failures are logged and reported to Sentry.
    pub async fn create(&self, request: &NewRobotRequest) -> Result<Robot, RepositoryError> {
        let robot = RobotRepository::new(&self.pool).insert(request).await?;
        tracing::info!(
            robot_id = %robot.id,
            serial = %robot.serial,
            created = %robot.created,
            "Robot registered"
        );

        for hook in &self.hooks {
            if let Err(e) = hook.on_robot_created(&robot).await {
                let event_id = sentry::capture_error(&e);
                tracing::error!(
                    hook = hook.name(),
                    serial = %robot.serial,
                    error = %e,
                    sentry_event_id = %event_id,
                    "Robot created hook failed"
                );
            }
        }

        Ok(robot)
    }
}

impl std::fmt::Debug for RobotGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let hooks: Vec<_> = self.hooks.iter().map(|h| h.name()).collect();
        f.debug_struct("RobotGateway")
            .field("hooks", &hooks)
            .finish_non_exhaustive()
    }
}
