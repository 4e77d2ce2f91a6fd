//! Integration tests for the R4C robot order service.
//!
//! Tests drive the full router in-process: an in-memory database, a
//! [`RecordingNotifier`] in place of SMTP, and a temporary report directory.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p r4c-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `orders` - Order form submission and redirects
//! - `robots` - Robot registration and order fulfillment
//! - `reports` - Weekly xlsx download

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
    response::Response,
};
use r4c_server::config::{ReportOptions, ServerConfig};
use r4c_server::state::AppState;
use r4c_server::testing::{RecordingNotifier, test_pool};
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::ServiceExt;

/// A fully wired application over throwaway storage.
pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
    pub notifier: Arc<RecordingNotifier>,
    pub reports: TempDir,
}

/// Response status, headers and collected body.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Body parsed as JSON.
    ///
    /// # Panics
    ///
    /// Panics if the body is not JSON.
    #[must_use]
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("response body is not JSON")
    }

    /// Body as UTF-8 text.
    ///
    /// # Panics
    ///
    /// Panics if the body is not UTF-8.
    #[must_use]
    pub fn text(&self) -> &str {
        std::str::from_utf8(&self.body).expect("response body is not UTF-8")
    }

    /// Value of a header, if present.
    #[must_use]
    pub fn header(&self, name: header::HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

impl TestApp {
    /// Build the app with default fulfillment policy.
    ///
    /// # Panics
    ///
    /// Panics if the temporary report directory cannot be created.
    pub async fn spawn() -> Self {
        Self::spawn_with(ServerConfig::default()).await
    }

    /// Build the app from `config`, redirecting reports to a temp dir.
    ///
    /// # Panics
    ///
    /// Panics if the temporary report directory cannot be created.
    pub async fn spawn_with(mut config: ServerConfig) -> Self {
        let reports = TempDir::new().expect("Failed to create report dir");
        config.report = ReportOptions {
            dir: reports.path().to_path_buf(),
            ..config.report
        };

        let pool = test_pool().await;
        let notifier = Arc::new(RecordingNotifier::default());
        let state = AppState::new(config, pool.clone(), notifier.clone());

        Self {
            router: r4c_server::routes::app(state),
            pool,
            notifier,
            reports,
        }
    }

    /// Send a request through the router and collect the response.
    ///
    /// # Panics
    ///
    /// Panics if the router fails or the body cannot be read.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response: Response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body")
            .to_vec();
        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// `GET uri`.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built.
    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(empty(Method::GET, uri)).await
    }

    /// Send `method uri` with no body.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built.
    pub async fn call(&self, method: Method, uri: &str) -> TestResponse {
        self.send(empty(method, uri)).await
    }

    /// `POST uri` with a raw JSON body.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built.
    pub async fn post_json(&self, uri: &str, body: impl Into<Body>) -> TestResponse {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .expect("valid request");
        self.send(request).await
    }

    /// `POST uri` with an url-encoded form.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built.
    pub async fn post_form(&self, uri: &str, form: &str) -> TestResponse {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .expect("valid request");
        self.send(request).await
    }

    /// Register a robot and assert it was accepted.
    ///
    /// # Panics
    ///
    /// Panics if the robot is rejected.
    pub async fn add_robot(&self, model: &str, version: &str, created: &str) -> serde_json::Value {
        let body = serde_json::json!({
            "model": model,
            "version": version,
            "created": created,
        })
        .to_string();
        let response = self.post_json("/robots/new/", body).await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.text());
        response.json()
    }

    /// Number of orders still pending.
    ///
    /// # Panics
    ///
    /// Panics if the query fails.
    pub async fn pending_orders(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM robot_order")
            .fetch_one(&self.pool)
            .await
            .expect("Failed to count orders")
    }
}

fn empty(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("valid request")
}
