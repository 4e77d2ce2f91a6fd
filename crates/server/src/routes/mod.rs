//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                          - Landing page
//! GET  /health                    - Liveness
//! GET  /health/ready              - Readiness (database ping)
//!
//! # Orders
//! GET  /orders/new/               - Order form
//! POST /orders/new/               - Submit order (redirects to success or fail)
//! GET  /orders/success/           - Order accepted
//! GET  /orders/fail/?reason=...   - Order rejected
//!
//! # Robots
//! POST /robots/new/               - Register robot (JSON)
//! GET  /robots/last-week-stats/   - Weekly production report (.xlsx)
//! ```
//!
//! Any other method on `/orders/new/` or `/robots/new/` gets a JSON 405.

pub mod health;
pub mod home;
pub mod orders;
pub mod robots;

use std::time::Duration;

use axum::{
    Router,
    http::{Request, Response},
    middleware,
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/new/",
            get(orders::new_order_form)
                .post(orders::create_order)
                .fallback(robots::method_not_allowed),
        )
        .route("/success/", get(orders::order_success))
        .route("/fail/", get(orders::order_fail))
}

/// Create the robot routes router.
pub fn robot_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/new/",
            post(robots::create_robot).fallback(robots::method_not_allowed),
        )
        .route("/last-week-stats/", get(robots::last_week_stats))
}

/// Create all page and API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .nest("/orders", order_routes())
        .nest("/robots", robot_routes())
}

/// Build the complete application: routes, probes, static files and the
/// middleware stack.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(routes())
        .nest_service("/static", ServeDir::new("crates/server/static"))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(|response: &Response<_>, latency: Duration, span: &Span| {
                    span.record("status", response.status().as_u16());
                    span.record(
                        "latency_ms",
                        u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                    );
                    DefaultOnResponse::default().on_response(response, latency, span);
                }),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}
