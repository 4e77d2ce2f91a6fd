//! Database migration command.

use r4c_server::db;

use super::{CliError, connect};

/// Apply pending migrations to the configured database.
///
/// # Errors
///
/// Returns error if configuration, connection, or a migration fails.
pub async fn run() -> Result<(), CliError> {
    let (_, pool) = connect().await?;

    tracing::info!("Running migrations...");
    db::run_migrations(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
