//! Order fulfillment.
//!
//! Runs as a [`RobotCreatedHook`]: when a robot is stored, the pending orders
//! for its serial are looked up, each customer is notified, and the orders
//! that were notified successfully are closed according to the configured
//! [`FulfillmentPolicy`].
//!
//! Notification and deletion are not atomic. If the hook runs twice for the
//! same robot before the orders are deleted, customers are notified twice.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use r4c_core::{CustomerId, OrderId};
use sqlx::SqlitePool;

use super::email::{EmailError, Notification, Notifier};
use crate::config::{FulfilledOrders, FulfillmentPolicy, OrderMatch};
use crate::db::{CustomerRepository, OrderRepository, RepositoryError, RobotCreatedHook};
use crate::models::{PendingOrder, Robot};

/// What a fulfillment pass did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FulfillmentOutcome {
    /// Orders whose customer was notified.
    pub notified: Vec<OrderId>,
    /// Orders whose notification failed; they stay pending.
    pub failed: Vec<OrderId>,
    /// Number of orders removed after notification.
    pub deleted: u64,
    /// Customers removed because they had no orders left.
    pub purged_customers: Vec<CustomerId>,
}

/// Matches new robots to pending orders and notifies the customers.
#[derive(Clone)]
pub struct OrderFulfillment {
    pool: SqlitePool,
    notifier: Arc<dyn Notifier>,
    policy: FulfillmentPolicy,
}

impl OrderFulfillment {
    #[must_use]
    pub fn new(pool: SqlitePool, notifier: Arc<dyn Notifier>, policy: FulfillmentPolicy) -> Self {
        Self {
            pool,
            notifier,
            policy,
        }
    }

    /// Fulfill the pending orders matching `robot`.
    ///
    /// Delivery failures are logged and leave the order pending; they do not
    /// fail the pass.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if orders cannot be read or removed.
    pub async fn fulfill(&self, robot: &Robot) -> Result<FulfillmentOutcome, RepositoryError> {
        let orders = OrderRepository::new(&self.pool);
        let mut matches = orders.list_by_serial(&robot.serial).await?;
        if self.policy.match_mode == OrderMatch::First {
            matches.truncate(1);
        }

        let mut outcome = FulfillmentOutcome::default();
        let mut notified_customers = BTreeSet::new();

        for order in &matches {
            match self.notify(robot, order).await {
                Ok(()) => {
                    tracing::info!(
                        order_id = %order.id,
                        serial = %robot.serial,
                        email = %order.email,
                        "Customer notified"
                    );
                    outcome.notified.push(order.id);
                    notified_customers.insert(order.customer_id);
                }
                Err(e) => {
                    tracing::warn!(
                        order_id = %order.id,
                        serial = %robot.serial,
                        email = %order.email,
                        error = %e,
                        "Customer notification failed, order stays pending"
                    );
                    outcome.failed.push(order.id);
                }
            }
        }

        if self.policy.fulfilled == FulfilledOrders::Delete {
            outcome.deleted = orders.delete_many(&outcome.notified).await?;

            if self.policy.purge_customers {
                let customers = CustomerRepository::new(&self.pool);
                for customer_id in notified_customers {
                    if customers.delete_if_orphaned(customer_id).await? {
                        outcome.purged_customers.push(customer_id);
                    }
                }
            }
        }

        Ok(outcome)
    }

    async fn notify(&self, robot: &Robot, order: &PendingOrder) -> Result<(), EmailError> {
        let notification = Notification {
            to: order.email.clone(),
            model: robot.model.clone(),
            version: robot.version.clone(),
        };
        self.notifier.send(&notification).await
    }
}

#[async_trait]
impl RobotCreatedHook for OrderFulfillment {
    fn name(&self) -> &'static str {
        "order_fulfillment"
    }

    async fn on_robot_created(&self, robot: &Robot) -> Result<(), RepositoryError> {
        let outcome = self.fulfill(robot).await?;
        if !outcome.notified.is_empty() || !outcome.failed.is_empty() {
            tracing::info!(
                serial = %robot.serial,
                notified = outcome.notified.len(),
                failed = outcome.failed.len(),
                deleted = outcome.deleted,
                purged_customers = outcome.purged_customers.len(),
                "Orders fulfilled"
            );
        }
        Ok(())
    }
}
