//! Robot registration from the production feed.

use r4c_core::{NewRobotRequest, ValidationError, parse_new_robot_request};
use sqlx::SqlitePool;
use thiserror::Error;

use crate::db::{RepositoryError, RobotGateway, RobotRepository};
use crate::models::Robot;

/// Errors that can occur when registering a robot.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// The payload was rejected.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Storage failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Parse a registration body and check that no robot already carries its
/// assembly timestamp.
///
/// The check is read-then-write: two concurrent registrations for the same
/// second can both pass it.
///
/// # Errors
///
/// Returns `RegistrationError::Validation` for a rejected payload,
/// including [`ValidationError::DuplicateTimestamp`].
pub async fn validate_new_robot_request(
    pool: &SqlitePool,
    body: &[u8],
) -> Result<NewRobotRequest, RegistrationError> {
    let request = parse_new_robot_request(body)?;
    if RobotRepository::new(pool).exists_at(request.created).await? {
        return Err(ValidationError::DuplicateTimestamp.into());
    }
    Ok(request)
}

/// Validate and store a robot, running post-insert hooks.
///
/// # Errors
///
/// Returns `RegistrationError` if validation or the insert fails.
#[tracing::instrument(skip_all)]
pub async fn register_robot(
    gateway: &RobotGateway,
    body: &[u8],
) -> Result<Robot, RegistrationError> {
    let request = validate_new_robot_request(gateway.pool(), body).await?;
    Ok(gateway.create(&request).await?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::db::RobotCreatedHook;
    use crate::testing::test_pool;

    #[derive(Default)]
    struct Counter(AtomicUsize);

    #[async_trait]
    impl RobotCreatedHook for Counter {
        fn name(&self) -> &'static str {
            "counter"
        }

        async fn on_robot_created(&self, _robot: &Robot) -> Result<(), RepositoryError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    const BODY: &[u8] = br#"{"model":"r2","version":"d2","created":"2024-01-01 10:00:00"}"#;

    #[tokio::test]
    async fn test_register_then_duplicate_timestamp() {
        let pool = test_pool().await;
        let gateway = RobotGateway::new(pool.clone());

        let robot = register_robot(&gateway, BODY).await.unwrap();
        assert_eq!(robot.model.as_str(), "R2");
        assert_eq!(robot.version.as_str(), "D2");
        assert_eq!(robot.serial.as_str(), "R2-D2");

        let other_model = br#"{"model":"C3","version":"PO","created":"2024-01-01 10:00:00"}"#;
        let err = register_robot(&gateway, other_model).await.unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::Validation(ValidationError::DuplicateTimestamp)
        ));
        assert_eq!(
            err.to_string(),
            "A robot assembled at this second already exists"
        );
    }

    #[tokio::test]
    async fn test_validation_is_repeatable_without_insert() {
        let pool = test_pool().await;
        let first = validate_new_robot_request(&pool, BODY).await.unwrap();
        let second = validate_new_robot_request(&pool, BODY).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_invalid_payload_stores_nothing() {
        let pool = test_pool().await;
        let gateway = RobotGateway::new(pool.clone());

        let err = register_robot(&gateway, br#"{"model":"R2"}"#).await.unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::Validation(ValidationError::MissingField("version"))
        ));
        assert!(RobotRepository::new(&pool).models().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_any_two_character_codes_register_and_run_hooks() {
        let pool = test_pool().await;
        let counter = Arc::new(Counter::default());
        let gateway = RobotGateway::new(pool.clone()).with_hook(counter.clone());

        let punctuated = br#"{"model":"R!","version":"D2","created":"2024-01-01 10:00:00"}"#;
        let robot = register_robot(&gateway, punctuated).await.unwrap();
        assert_eq!(robot.serial.as_str(), "R!-D2");

        let widened = br#"{"model":"\u00dfa","version":"d2","created":"2024-01-01 10:00:01"}"#;
        let robot = register_robot(&gateway, widened).await.unwrap();
        assert_eq!(robot.serial.as_str(), "SSA-D2");

        assert_eq!(counter.0.load(Ordering::SeqCst), 2);
    }
}
