//! Production feed endpoints.

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use chrono::{SubsecRound, Utc};
use serde_json::json;
use tracing::instrument;

use crate::error::AppError;
use crate::services::{generate_report, register_robot, report::read_report};
use crate::state::AppState;

/// MIME type of `.xlsx` workbooks.
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Register a robot from a JSON body.
///
/// Responds with `{"status": "success", "data": <robot>}`.
#[instrument(skip(state, body), fields(body_len = body.len()))]
pub async fn create_robot(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<serde_json::Value>, AppError> {
    let robot = register_robot(state.robots(), &body).await?;
    Ok(Json(json!({"status": "success", "data": robot})))
}

/// Generate the weekly production report and return it as a download.
#[instrument(skip(state))]
pub async fn last_week_stats(State(state): State<AppState>) -> Result<Response, AppError> {
    let now = Utc::now().naive_utc().trunc_subsecs(0);
    let report = generate_report(state.pool(), &state.config().report, now).await?;
    let bytes = read_report(&report.path).await?;

    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", report.file_name),
            ),
        ],
        bytes,
    )
        .into_response())
}

/// Reply for methods a route does not support.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
