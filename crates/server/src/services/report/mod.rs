//! Weekly production report.
//!
//! For every model ever produced, robots assembled in the trailing window
//! `[now - window_days, now]` are counted per version. The summary is then
//! rendered into an `.xlsx` workbook (see [`xlsx`]) saved as
//! `report_YYYYMMDD_HHMMSS.xlsx` in the reports directory. Two reports
//! generated within the same second share a file name; the later one wins.

pub mod xlsx;

use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDateTime};
use r4c_core::RobotCode;
use serde::Serialize;
use sqlx::SqlitePool;
use thiserror::Error;

use crate::config::ReportOptions;
use crate::db::{RepositoryError, RobotRepository};

/// `strftime` layout of the timestamp embedded in report file names.
pub const FILE_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Errors that can occur while producing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to read production data: {0}")]
    Repository(#[from] RepositoryError),

    #[error("failed to render workbook: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("failed to prepare report directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("report task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Units of one version produced in the window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionCount {
    pub version: RobotCode,
    pub count: i64,
}

/// Production of one model in the window, versions in ascending order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelSummary {
    pub model: RobotCode,
    pub versions: Vec<VersionCount>,
}

/// Per-model production counts for one window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeeklySummary {
    pub from: NaiveDateTime,
    pub to: NaiveDateTime,
    /// Models in ascending order.
    pub models: Vec<ModelSummary>,
}

impl WeeklySummary {
    /// Counts for `model` as `(version, count)` pairs, if the model is present.
    #[must_use]
    pub fn counts(&self, model: &str) -> Option<Vec<(&str, i64)>> {
        self.models
            .iter()
            .find(|m| m.model.as_str() == model)
            .map(|m| {
                m.versions
                    .iter()
                    .map(|v| (v.version.as_str(), v.count))
                    .collect()
            })
    }
}

/// A report written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedReport {
    pub path: PathBuf,
    pub file_name: String,
    pub sheets: usize,
}

/// Aggregate production for the window ending at `now`.
///
/// Models without units in the window are left out unless
/// `options.include_empty_models` is set.
///
/// # Errors
///
/// Returns `ReportError::Repository` if the queries fail.
pub async fn weekly_summary(
    pool: &SqlitePool,
    now: NaiveDateTime,
    options: &ReportOptions,
) -> Result<WeeklySummary, ReportError> {
    let robots = RobotRepository::new(pool);
    let from = now - Duration::days(i64::from(options.window_days));

    let mut models = Vec::new();
    for model in robots.models().await? {
        let versions: Vec<_> = robots
            .production_summary(&model, from, now)
            .await?
            .into_iter()
            .map(|(version, count)| VersionCount { version, count })
            .collect();

        if versions.is_empty() && !options.include_empty_models {
            continue;
        }
        models.push(ModelSummary { model, versions });
    }

    Ok(WeeklySummary {
        from,
        to: now,
        models,
    })
}

/// File name of a report generated at `at`.
#[must_use]
pub fn report_file_name(at: NaiveDateTime) -> String {
    format!("report_{}.xlsx", at.format(FILE_TIMESTAMP_FORMAT))
}

/// Build the summary for the window ending at `now` and save it as a workbook
/// under `options.dir`, creating the directory if needed.
///
/// # Errors
///
/// Returns `ReportError` if the data cannot be read or the file cannot be written.
#[tracing::instrument(skip(pool, options), fields(dir = %options.dir.display()))]
pub async fn generate_report(
    pool: &SqlitePool,
    options: &ReportOptions,
    now: NaiveDateTime,
) -> Result<GeneratedReport, ReportError> {
    let summary = weekly_summary(pool, now, options).await?;

    tokio::fs::create_dir_all(&options.dir).await?;
    let file_name = report_file_name(now);
    let path = options.dir.join(&file_name);

    let sheets = {
        let path = path.clone();
        tokio::task::spawn_blocking(move || xlsx::write_workbook(&summary, &path)).await??
    };

    tracing::info!(path = %path.display(), sheets, "Report generated");
    Ok(GeneratedReport {
        path,
        file_name,
        sheets,
    })
}

/// Read a generated report back for download.
///
/// # Errors
///
/// Returns `ReportError::Io` if the file cannot be read.
pub async fn read_report(path: &Path) -> Result<Vec<u8>, ReportError> {
    Ok(tokio::fs::read(path).await?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;
    use r4c_core::NewRobotRequest;

    use super::*;
    use crate::testing::test_pool;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    async fn add(pool: &SqlitePool, model: &str, version: &str, created: NaiveDateTime) {
        RobotRepository::new(pool)
            .insert(&NewRobotRequest {
                model: RobotCode::new(model).unwrap(),
                version: RobotCode::new(version).unwrap(),
                created,
            })
            .await
            .unwrap();
    }

    async fn seed(pool: &SqlitePool) {
        add(pool, "R2", "D2", now() - Duration::days(1)).await;
        add(pool, "R2", "D2", now() - Duration::days(2)).await;
        add(pool, "R2", "D2", now() - Duration::hours(3)).await;
        add(pool, "R2", "D3", now() - Duration::days(6)).await;
        add(pool, "R2", "D3", now() - Duration::days(8)).await;
        add(pool, "X5", "A1", now() - Duration::days(30)).await;
    }

    #[tokio::test]
    async fn test_summary_counts_window_only() {
        let pool = test_pool().await;
        seed(&pool).await;

        let summary = weekly_summary(&pool, now(), &ReportOptions::default())
            .await
            .unwrap();

        assert_eq!(summary.counts("R2").unwrap(), [("D2", 3), ("D3", 1)]);
        assert!(summary.counts("X5").is_none());
        assert_eq!(summary.from, now() - Duration::days(7));
    }

    #[tokio::test]
    async fn test_window_bounds_are_inclusive() {
        let pool = test_pool().await;
        add(&pool, "R2", "D2", now() - Duration::days(7)).await;
        add(&pool, "R2", "D2", now()).await;
        add(&pool, "R2", "D2", now() - Duration::days(7) - Duration::seconds(1)).await;

        let summary = weekly_summary(&pool, now(), &ReportOptions::default())
            .await
            .unwrap();

        assert_eq!(summary.counts("R2").unwrap(), [("D2", 2)]);
    }

    #[tokio::test]
    async fn test_empty_models_included_on_request() {
        let pool = test_pool().await;
        seed(&pool).await;
        let options = ReportOptions {
            include_empty_models: true,
            ..ReportOptions::default()
        };

        let summary = weekly_summary(&pool, now(), &options).await.unwrap();

        assert!(summary.counts("X5").unwrap().is_empty());
        assert_eq!(summary.models.len(), 2);
    }

    #[test]
    fn test_report_file_name() {
        assert_eq!(report_file_name(now()), "report_20240315_120000.xlsx");
    }

    #[tokio::test]
    async fn test_generate_report_writes_file() {
        let pool = test_pool().await;
        seed(&pool).await;
        let dir = tempfile::tempdir().unwrap();
        let options = ReportOptions {
            dir: dir.path().join("nested/reports"),
            ..ReportOptions::default()
        };

        let report = generate_report(&pool, &options, now()).await.unwrap();

        assert_eq!(report.file_name, "report_20240315_120000.xlsx");
        assert_eq!(report.sheets, 1);
        assert!(report.path.starts_with(&options.dir));
        let bytes = read_report(&report.path).await.unwrap();
        assert!(bytes.starts_with(b"PK"));
    }
}
