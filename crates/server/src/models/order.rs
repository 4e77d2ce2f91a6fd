//! Pending order records.

use r4c_core::{CustomerId, Email, OrderId, Serial};
use serde::Serialize;

/// A pending order as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub robot_serial: Serial,
}

/// A pending order joined with the email of the customer who placed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingOrder {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub email: Email,
    pub robot_serial: Serial,
}
