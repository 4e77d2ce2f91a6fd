//! CLI subcommands.

pub mod migrate;
pub mod orders;
pub mod report;
pub mod robots;

use r4c_server::config::{ConfigError, ServerConfig};
use r4c_server::db::{self, RepositoryError};
use r4c_server::services::{RegistrationError, ReportError};
use sqlx::SqlitePool;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    #[error("Robot rejected: {0}")]
    Registration(#[from] RegistrationError),

    #[error("Email setup error: {0}")]
    Email(#[from] lettre::transport::smtp::Error),
}

/// Load configuration and open the database.
async fn connect() -> Result<(ServerConfig, SqlitePool), CliError> {
    let config = ServerConfig::from_env()?;
    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&config.database_url).await?;
    Ok((config, pool))
}
