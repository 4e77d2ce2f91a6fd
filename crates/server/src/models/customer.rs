//! Customer records.

use r4c_core::{CustomerId, Email};
use serde::Serialize;

/// A customer who has placed at least one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Customer {
    pub id: CustomerId,
    pub email: Email,
}
