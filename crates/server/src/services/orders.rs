//! Customer order placement.

use r4c_core::{OrderForm, ValidationError, validate_new_order_request};
use sqlx::SqlitePool;
use thiserror::Error;

use crate::db::{CustomerRepository, OrderRepository, RepositoryError};
use crate::models::Order;

/// Errors that can occur when placing an order.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Validate an order form and record a pending order for it.
///
/// The customer is looked up by email and created on first order.
///
/// # Errors
///
/// Returns `OrderError::Validation` for a rejected form and
/// `OrderError::Repository` if storage fails.
#[tracing::instrument(skip_all)]
pub async fn place_order(pool: &SqlitePool, form: &OrderForm) -> Result<Order, OrderError> {
    let request = validate_new_order_request(form)?;
    let customer = CustomerRepository::new(pool)
        .get_or_create(&request.email)
        .await?;
    let order = OrderRepository::new(pool)
        .create(customer.id, &request.serial)
        .await?;

    tracing::info!(
        order_id = %order.id,
        customer_id = %customer.id,
        serial = %order.robot_serial,
        "Order placed"
    );
    Ok(order)
}
