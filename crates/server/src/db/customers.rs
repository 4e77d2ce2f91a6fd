//! Customer repository.

use r4c_core::{CustomerId, Email};
use sqlx::SqlitePool;

use super::RepositoryError;
use crate::models::Customer;

#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: i64,
    email: String,
}

impl TryFrom<CustomerRow> for Customer {
    type Error = RepositoryError;

    fn try_from(row: CustomerRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        Ok(Self {
            id: CustomerId::new(row.id),
            email,
        })
    }
}

/// Repository for customer database operations.
pub struct CustomerRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Return the customer with this email, creating it on first use.
    ///
    /// Emails are compared exactly as entered.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_or_create(&self, email: &Email) -> Result<Customer, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r"
            INSERT INTO customer (email) VALUES (?)
            ON CONFLICT (email) DO UPDATE SET email = excluded.email
            RETURNING id, email
            ",
        )
        .bind(email.as_str())
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }

    /// Delete a customer that no longer has any orders.
    ///
    /// Returns `true` if the customer was removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_if_orphaned(&self, id: CustomerId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM customer
            WHERE id = ?
              AND NOT EXISTS (SELECT 1 FROM robot_order WHERE customer_id = customer.id)
            ",
        )
        .bind(id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
