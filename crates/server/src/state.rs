//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::ServerConfig;
use crate::db::RobotGateway;
use crate::services::{Notifier, OrderFulfillment};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    pool: SqlitePool,
    robots: RobotGateway,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Robots registered through [`AppState::robots`] fulfill pending orders
    /// and notify customers through `notifier`.
    #[must_use]
    pub fn new(config: ServerConfig, pool: SqlitePool, notifier: Arc<dyn Notifier>) -> Self {
        let fulfillment = OrderFulfillment::new(pool.clone(), notifier, config.fulfillment);
        let robots = RobotGateway::new(pool.clone()).with_hook(Arc::new(fulfillment));

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                robots,
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.inner.pool
    }

    /// Get a reference to the robot creation gateway.
    #[must_use]
    pub fn robots(&self) -> &RobotGateway {
        &self.inner.robots
    }
}
