//! Probes and pages that need no data.

use axum::http::{StatusCode, header};
use r4c_integration_tests::TestApp;

#[tokio::test]
async fn test_health() {
    let app = TestApp::spawn().await;

    let response = app.get("/health").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.text(), "ok");
}

#[tokio::test]
async fn test_readiness() {
    let app = TestApp::spawn().await;

    assert_eq!(app.get("/health/ready").await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_home_page_and_request_id() {
    let app = TestApp::spawn().await;

    let response = app.get("/").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.text().contains("/orders/new/"));
    assert!(response.header(header::HeaderName::from_static("x-request-id")).is_some());
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = TestApp::spawn().await;

    assert_eq!(app.get("/nope").await.status, StatusCode::NOT_FOUND);
}
