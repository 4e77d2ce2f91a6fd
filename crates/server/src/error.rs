//! Unified error handling for the HTTP layer.
//!
//! Every error is rendered as `{"status": "error", "message": ...}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use r4c_core::ValidationError;
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::{OrderError, RegistrationError, ReportError};

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request payload was rejected.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Weekly report could not be produced.
    #[error("Report generation failed: {0}")]
    Report(#[from] ReportError),

    /// Route exists but not for this method.
    #[error("Method Not Allowed")]
    MethodNotAllowed,
}

impl From<RegistrationError> for AppError {
    fn from(err: RegistrationError) -> Self {
        match err {
            RegistrationError::Validation(e) => Self::Validation(e),
            RegistrationError::Repository(e) => Self::Database(e),
        }
    }
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::Validation(e) => Self::Validation(e),
            OrderError::Repository(e) => Self::Database(e),
        }
    }
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Database(_) | Self::Report(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log server errors with Sentry
        if matches!(self, Self::Database(_) | Self::Report(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Report failures carry their cause; storage details stay internal
        let message = match &self {
            Self::Database(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        };

        (
            self.status(),
            Json(json!({"status": "error", "message": message})),
        )
            .into_response()
    }
}
