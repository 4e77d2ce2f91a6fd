//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional for a local run.
//!
//! ## Service
//! - `R4C_DATABASE_URL` - `SQLite` URL (fallback `DATABASE_URL`,
//!   default `sqlite://db.sqlite3?mode=rwc`)
//! - `R4C_HOST` - Bind address (default: 127.0.0.1)
//! - `R4C_PORT` - Listen port (default: 8000)
//! - `LOG_FORMAT` - `text` or `json` (default: text)
//!
//! ## Fulfillment
//! - `R4C_ORDER_MATCH` - `all` or `first` pending orders per new robot (default: all)
//! - `R4C_FULFILLED_ORDERS` - `delete` or `keep` fulfilled orders (default: delete)
//! - `R4C_PURGE_CUSTOMERS` - delete customers left without orders (default: false)
//!
//! ## Weekly report
//! - `R4C_REPORTS_DIR` - Output directory (default: reports)
//! - `R4C_REPORT_WINDOW_DAYS` - Production window length (default: 7)
//! - `R4C_REPORT_INCLUDE_EMPTY` - Keep models with no units in the window (default: false)
//!
//! ## Email
//! - `SMTP_FROM` - Sender address (default: info@robocomplex.com)
//! - `SMTP_HOST` - Enables SMTP delivery; when unset emails go to the log
//! - `SMTP_PORT` - default 587
//! - `SMTP_USERNAME`, `SMTP_PASSWORD` - required when `SMTP_HOST` is set
//!
//! ## Error tracking
//! - `SENTRY_DSN`, `SENTRY_ENVIRONMENT`, `SENTRY_SAMPLE_RATE`, `SENTRY_TRACES_SAMPLE_RATE`

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_DATABASE_URL: &str = "sqlite://db.sqlite3?mode=rwc";
const DEFAULT_FROM_ADDRESS: &str = "info@robocomplex.com";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// How many pending orders a newly registered robot fulfills.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderMatch {
    /// Every pending order for the serial.
    #[default]
    All,
    /// Only the oldest pending order for the serial.
    First,
}

impl FromStr for OrderMatch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "first" => Ok(Self::First),
            other => Err(format!("expected 'all' or 'first', got '{other}'")),
        }
    }
}

/// What happens to an order once its customer has been notified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FulfilledOrders {
    #[default]
    Delete,
    Keep,
}

impl FromStr for FulfilledOrders {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "delete" => Ok(Self::Delete),
            "keep" => Ok(Self::Keep),
            other => Err(format!("expected 'delete' or 'keep', got '{other}'")),
        }
    }
}

/// Order fulfillment behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FulfillmentPolicy {
    pub match_mode: OrderMatch,
    pub fulfilled: FulfilledOrders,
    /// Delete a customer once its last order has been fulfilled and removed.
    pub purge_customers: bool,
}

/// Weekly report settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    /// Directory report files are written to; created on demand.
    pub dir: PathBuf,
    /// Length of the trailing production window in days.
    pub window_days: u32,
    /// Render a header-only sheet for models with no units in the window.
    pub include_empty_models: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("reports"),
            window_days: 7,
            include_empty_models: false,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("expected 'text' or 'json', got '{other}'")),
        }
    }
}

/// Email settings.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// Sender address for customer notifications.
    pub from_address: String,
    /// SMTP relay; `None` logs emails instead of sending them.
    pub smtp: Option<SmtpConfig>,
}

/// SMTP relay configuration.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: SecretString,
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            from_address: DEFAULT_FROM_ADDRESS.to_string(),
            smtp: None,
        }
    }
}

impl EmailConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let from_address = get_env_or_default("SMTP_FROM", DEFAULT_FROM_ADDRESS);
        let smtp = match get_optional_env("SMTP_HOST") {
            Some(host) => Some(SmtpConfig {
                host,
                port: parse_env("SMTP_PORT", "587")?,
                username: get_required_env("SMTP_USERNAME")?,
                password: SecretString::from(get_required_env("SMTP_PASSWORD")?),
            }),
            None => None,
        };

        Ok(Self { from_address, smtp })
    }
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `SQLite` database URL
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Order fulfillment behavior
    pub fulfillment: FulfillmentPolicy,
    /// Weekly report settings
    pub report: ReportOptions,
    /// Email delivery
    pub email: EmailConfig,
    /// Log output format
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: SecretString::from(DEFAULT_DATABASE_URL),
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 8000,
            fulfillment: FulfillmentPolicy::default(),
            report: ReportOptions::default(),
            email: EmailConfig::default(),
            log_format: LogFormat::default(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid, or if SMTP
    /// is enabled without credentials.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("R4C_DATABASE_URL");
        let host = parse_env("R4C_HOST", "127.0.0.1")?;
        let port = parse_env("R4C_PORT", "8000")?;

        let fulfillment = FulfillmentPolicy {
            match_mode: parse_env("R4C_ORDER_MATCH", "all")?,
            fulfilled: parse_env("R4C_FULFILLED_ORDERS", "delete")?,
            purge_customers: parse_bool_env("R4C_PURGE_CUSTOMERS", false)?,
        };

        let report = ReportOptions {
            dir: PathBuf::from(get_env_or_default("R4C_REPORTS_DIR", "reports")),
            window_days: parse_env("R4C_REPORT_WINDOW_DAYS", "7")?,
            include_empty_models: parse_bool_env("R4C_REPORT_INCLUDE_EMPTY", false)?,
        };
        if report.window_days == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "R4C_REPORT_WINDOW_DAYS".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let email = EmailConfig::from_env()?;
        let log_format = parse_env("LOG_FORMAT", "text")?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            database_url,
            host,
            port,
            fulfillment,
            report,
            email,
            log_format,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> SecretString {
    std::env::var(primary_key)
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_or_else(
            |_| SecretString::from(DEFAULT_DATABASE_URL),
            SecretString::from,
        )
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    parse_value(key, &get_env_or_default(key, default))
}

fn parse_value<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

fn parse_bool_env(key: &str, default: bool) -> Result<bool, ConfigError> {
    get_optional_env(key).map_or(Ok(default), |value| parse_bool(key, &value))
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}
