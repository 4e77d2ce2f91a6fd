//! Pending order repository.

use r4c_core::{CustomerId, Email, OrderId, Serial};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::RepositoryError;
use crate::models::{Order, PendingOrder};

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i64,
    customer_id: i64,
    robot_serial: String,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: OrderId::new(row.id),
            customer_id: CustomerId::new(row.customer_id),
            robot_serial: parse_serial(&row.robot_serial)?,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PendingOrderRow {
    id: i64,
    customer_id: i64,
    email: String,
    robot_serial: String,
}

impl TryFrom<PendingOrderRow> for PendingOrder {
    type Error = RepositoryError;

    fn try_from(row: PendingOrderRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        Ok(Self {
            id: OrderId::new(row.id),
            customer_id: CustomerId::new(row.customer_id),
            email,
            robot_serial: parse_serial(&row.robot_serial)?,
        })
    }
}

fn parse_serial(value: &str) -> Result<Serial, RepositoryError> {
    Serial::parse(value).map_err(|e| {
        RepositoryError::DataCorruption(format!("invalid serial in database '{value}': {e}"))
    })
}

/// Repository for pending orders.
pub struct OrderRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Record a pending order for `serial`.
    ///
    /// Orders are accepted whether or not a robot with this serial already
    /// exists; only robots registered afterwards fulfill them.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails (e.g. the
    /// customer does not exist).
    pub async fn create(
        &self,
        customer_id: CustomerId,
        serial: &Serial,
    ) -> Result<Order, RepositoryError> {
        sqlx::query_as::<_, OrderRow>(
            r"
            INSERT INTO robot_order (customer_id, robot_serial) VALUES (?, ?)
            RETURNING id, customer_id, robot_serial
            ",
        )
        .bind(customer_id)
        .bind(serial)
        .fetch_one(self.pool)
        .await?
        .try_into()
    }

    /// Pending orders for `serial`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_serial(
        &self,
        serial: &Serial,
    ) -> Result<Vec<PendingOrder>, RepositoryError> {
        sqlx::query_as::<_, PendingOrderRow>(
            r"
            SELECT o.id, o.customer_id, c.email, o.robot_serial
            FROM robot_order o
            JOIN customer c ON c.id = o.customer_id
            WHERE o.robot_serial = ?
            ORDER BY o.id
            ",
        )
        .bind(serial)
        .fetch_all(self.pool)
        .await?
        .into_iter()
        .map(PendingOrder::try_from)
        .collect()
    }

    /// Every pending order, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_pending(&self) -> Result<Vec<PendingOrder>, RepositoryError> {
        sqlx::query_as::<_, PendingOrderRow>(
            r"
            SELECT o.id, o.customer_id, c.email, o.robot_serial
            FROM robot_order o
            JOIN customer c ON c.id = o.customer_id
            ORDER BY o.id
            ",
        )
        .fetch_all(self.pool)
        .await?
        .into_iter()
        .map(PendingOrder::try_from)
        .collect()
    }

    /// Delete several orders at once, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete_many(&self, ids: &[OrderId]) -> Result<u64, RepositoryError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let mut query = QueryBuilder::<Sqlite>::new("DELETE FROM robot_order WHERE id IN (");
        let mut separated = query.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let result = query.build().execute(self.pool).await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::CustomerRepository;
    use crate::testing::test_pool;

    async fn customer(pool: &SqlitePool, email: &str) -> CustomerId {
        CustomerRepository::new(pool)
            .get_or_create(&Email::parse(email).unwrap())
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_create_and_list_by_serial() {
        let pool = test_pool().await;
        let repo = OrderRepository::new(&pool);
        let alice = customer(&pool, "alice@robots.io").await;
        let bob = customer(&pool, "bob@robots.io").await;
        let r2d2 = Serial::parse("R2-D2").unwrap();

        repo.create(alice, &r2d2).await.unwrap();
        repo.create(bob, &Serial::parse("C3-PO").unwrap()).await.unwrap();
        repo.create(bob, &r2d2).await.unwrap();

        let matches = repo.list_by_serial(&r2d2).await.unwrap();
        let emails: Vec<_> = matches.iter().map(|o| o.email.as_str()).collect();
        assert_eq!(emails, ["alice@robots.io", "bob@robots.io"]);
        assert_eq!(repo.list_pending().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_delete_many() {
        let pool = test_pool().await;
        let repo = OrderRepository::new(&pool);
        let alice = customer(&pool, "alice@robots.io").await;
        let serial = Serial::parse("R2-D2").unwrap();

        let first = repo.create(alice, &serial).await.unwrap();
        let second = repo.create(alice, &serial).await.unwrap();
        let third = repo.create(alice, &serial).await.unwrap();

        assert_eq!(repo.delete_many(&[first.id, third.id]).await.unwrap(), 2);
        assert_eq!(repo.delete_many(&[first.id]).await.unwrap(), 0);
        assert_eq!(repo.delete_many(&[]).await.unwrap(), 0);

        let left: Vec<_> = repo.list_pending().await.unwrap();
        let left: Vec<_> = left.iter().map(|o| o.id).collect();
        assert_eq!(left, [second.id]);
    }

    #[tokio::test]
    async fn test_deleting_customer_cascades_to_orders() {
        let pool = test_pool().await;
        let repo = OrderRepository::new(&pool);
        let alice = customer(&pool, "alice@robots.io").await;
        repo.create(alice, &Serial::parse("R2-D2").unwrap())
            .await
            .unwrap();

        sqlx::query("DELETE FROM customer WHERE id = ?")
            .bind(alice)
            .execute(&pool)
            .await
            .unwrap();

        assert!(repo.list_pending().await.unwrap().is_empty());
    }
}
