//! R4C CLI - database migrations and operator tools.
//!
//! # Usage
//!
//! ```bash
//! # Apply database migrations
//! r4c-cli migrate
//!
//! # Write the weekly production report
//! r4c-cli report --out /tmp/reports
//!
//! # Register a robot (pending orders are fulfilled as over HTTP)
//! r4c-cli robots add --model R2 --version D2 --created "2024-01-01 10:00:00"
//!
//! # List pending orders
//! r4c-cli orders pending
//! ```
//!
//! All commands read the same environment as the server (`R4C_DATABASE_URL`,
//! `R4C_REPORTS_DIR`, `SMTP_*`, ...).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "r4c-cli")]
#[command(author, version, about = "R4C robot order service tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Generate the weekly production report
    Report {
        /// Output directory (defaults to `R4C_REPORTS_DIR`)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Manage robots
    Robots {
        #[command(subcommand)]
        action: RobotAction,
    },
    /// Inspect orders
    Orders {
        #[command(subcommand)]
        action: OrderAction,
    },
}

#[derive(Subcommand)]
enum RobotAction {
    /// Register an assembled robot
    Add {
        /// Two-character model code
        #[arg(short, long)]
        model: String,

        /// Two-character version code
        #[arg(short, long)]
        version: String,

        /// Assembly time, `YYYY-MM-DD HH:MM:SS`
        #[arg(short, long)]
        created: String,
    },
}

#[derive(Subcommand)]
enum OrderAction {
    /// List orders waiting for a robot
    Pending,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Report { out } => commands::report::run(out).await?,
        Commands::Robots { action } => match action {
            RobotAction::Add {
                model,
                version,
                created,
            } => commands::robots::add(&model, &version, &created).await?,
        },
        Commands::Orders { action } => match action {
            OrderAction::Pending => commands::orders::pending().await?,
        },
    }
    Ok(())
}
