//! Integration tests for health check and general API functionality.
//!
//! Tests cover:
//! - Health check endpoint
//! - Unknown routes

use axum::http::StatusCode;

use super::common::{get, test_app, test_app_with, StubSummarizer};

#[tokio::test]
async fn test_health_check() {
    let (app, _summarizer) = test_app();

    let (status, response) = get(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["status"], "healthy");
    assert_eq!(response["service"], "logsieve-api");
    assert_eq!(response["summarizer_available"], true);
}

#[tokio::test]
async fn test_health_does_not_call_summarizer() {
    let (app, summarizer) = test_app_with(StubSummarizer::failing());

    let (status, _) = get(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summarizer.calls(), 0);
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let (app, _summarizer) = test_app();

    let (status, _) = get(app, "/api/v1/logs").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
