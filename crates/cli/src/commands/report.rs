//! Weekly report command.

use std::path::PathBuf;

use chrono::{SubsecRound, Utc};
use r4c_server::services::generate_report;

use super::{CliError, connect};

/// Write the weekly production workbook and print where it landed.
///
/// # Errors
///
/// Returns error if the database cannot be read or the file cannot be written.
#[allow(clippy::print_stdout)]
pub async fn run(out: Option<PathBuf>) -> Result<(), CliError> {
    let (config, pool) = connect().await?;

    let mut options = config.report;
    if let Some(dir) = out {
        options.dir = dir;
    }

    let now = Utc::now().naive_utc().trunc_subsecs(0);
    let report = generate_report(&pool, &options, now).await?;

    println!("{}", report.path.display());
    tracing::info!(sheets = report.sheets, "Report written");
    Ok(())
}
