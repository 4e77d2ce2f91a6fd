//! Robot repository.
//!
//! `created` is compared as text; see [`super::to_db_timestamp`] for the
//! stored layout.

use chrono::NaiveDateTime;
use r4c_core::{NewRobotRequest, RobotCode, RobotId, Serial};
use sqlx::SqlitePool;

use super::{RepositoryError, from_db_timestamp, to_db_timestamp};
use crate::models::Robot;

/// Stored codes and serial are taken as written: registration accepts any
/// two-character code, and uppercasing may change its length.
#[derive(Debug, sqlx::FromRow)]
struct RobotRow {
    id: i64,
    serial: Serial,
    model: RobotCode,
    version: RobotCode,
    created: String,
}

impl TryFrom<RobotRow> for Robot {
    type Error = RepositoryError;

    fn try_from(row: RobotRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: RobotId::new(row.id),
            serial: row.serial,
            model: row.model,
            version: row.version,
            created: from_db_timestamp(&row.created)?,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct VersionCountRow {
    version: RobotCode,
    count: i64,
}

/// Repository for robot database operations.
///
/// Inserting through this repository does not run post-insert hooks; use
/// [`super::RobotGateway`] for that.
pub struct RobotRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> RobotRepository<'a> {
    /// Create a new robot repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Returns `true` if a robot was assembled at exactly `created`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn exists_at(&self, created: NaiveDateTime) -> Result<bool, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM robot WHERE created = ?")
            .bind(to_db_timestamp(created))
            .fetch_one(self.pool)
            .await?;
        Ok(count > 0)
    }

    /// Insert a validated robot and return the stored record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert(&self, robot: &NewRobotRequest) -> Result<Robot, RepositoryError> {
        sqlx::query_as::<_, RobotRow>(
            r"
            INSERT INTO robot (serial, model, version, created) VALUES (?, ?, ?, ?)
            RETURNING id, serial, model, version, created
            ",
        )
        .bind(robot.serial())
        .bind(&robot.model)
        .bind(&robot.version)
        .bind(to_db_timestamp(robot.created))
        .fetch_one(self.pool)
        .await?
        .try_into()
    }

    /// Distinct models ever produced, in ascending order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn models(&self) -> Result<Vec<RobotCode>, RepositoryError> {
        Ok(
            sqlx::query_scalar("SELECT DISTINCT model FROM robot ORDER BY model")
                .fetch_all(self.pool)
                .await?,
        )
    }

    /// Units of `model` produced in `[from, to]` (both inclusive), counted per
    /// version in ascending version order. Versions with no units are absent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn production_summary(
        &self,
        model: &RobotCode,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Result<Vec<(RobotCode, i64)>, RepositoryError> {
        let rows = sqlx::query_as::<_, VersionCountRow>(
            r"
            SELECT version, COUNT(*) AS count
            FROM robot
            WHERE model = ? AND created BETWEEN ? AND ?
            GROUP BY version
            ORDER BY version
            ",
        )
        .bind(model)
        .bind(to_db_timestamp(from))
        .bind(to_db_timestamp(to))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(|row| (row.version, row.count)).collect())
    }
}
