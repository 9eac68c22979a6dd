//! Common test utilities and helpers for integration tests.
//!
//! This module provides shared functionality used across all integration tests,
//! including test app setup and HTTP request helpers.

use api::{create_router, AppState, DEFAULT_MAX_UPLOAD_BYTES};
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use shared::config::AnalysisConfig;
use shared::summary::ServiceError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Sample log mixing timestamp precisions, bracketed levels and bare lines.
pub const SAMPLE_LOG: &str = "\
2024-06-25 10:00:01,123 INFO Application started successfully. Version 1.0.
2024-06-25 10:00:05,456 DEBUG User 'admin' logged in from IP 192.168.1.10.

2024-06-25 10:00:15,789 WARN High CPU usage detected on 'web-server-01'. Current: 85%.
2024-06-25 10:00:22,333 ERROR Database connection failed for 'user_db': Connection refused.
2024-06-25 10:00:28 [CRITICAL] Memory leak detected in process PID 1234.
2024-06-25 10:00:45,789 INFO Server health check passed.
Retrying request after error from upstream
";

/// Summarizer stub that records what it was asked.
#[derive(Default)]
pub struct StubSummarizer {
    calls: AtomicUsize,
    last_input: Mutex<Option<String>>,
    fail: bool,
}

impl StubSummarizer {
    /// A stub whose every call fails like a summarizer without credentials.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Number of times the summarizer was called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Input of the most recent call.
    pub fn last_input(&self) -> Option<String> {
        self.last_input.lock().unwrap().clone()
    }
}

impl shared::summary::Summarizer for StubSummarizer {
    fn summarize(&self, log_snippets: &str) -> Result<String, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_input.lock().unwrap() = Some(log_snippets.to_string());

        if self.fail {
            return Err(ServiceError::MissingCredentials("GOOGLE_API_KEY"));
        }
        Ok(format!(
            "### Critical Alarms & Issues\n{} elevated lines",
            log_snippets.lines().count()
        ))
    }
}

/// Creates a test router around the given summarizer and default config.
///
/// # Returns
///
/// A tuple containing the configured router and the summarizer handle.
pub fn test_app_with(summarizer: StubSummarizer) -> (Router, Arc<StubSummarizer>) {
    let summarizer = Arc::new(summarizer);
    let state = AppState::new(summarizer.clone(), AnalysisConfig::default());
    let router = create_router(state, DEFAULT_MAX_UPLOAD_BYTES);
    (router, summarizer)
}

/// Creates a test router with a succeeding stub summarizer.
pub fn test_app() -> (Router, Arc<StubSummarizer>) {
    test_app_with(StubSummarizer::default())
}

/// Helper to make a POST request with JSON body.
///
/// # Arguments
///
/// * `app` - The Axum router to send the request to
/// * `uri` - The URI path to POST to
/// * `body` - The JSON body to send
///
/// # Returns
///
/// A tuple containing the response status code and parsed JSON response body.
pub async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    post_raw(app, uri, serde_json::to_string(&body).unwrap()).await
}

/// Helper to POST an arbitrary body as JSON content.
pub async fn post_raw(app: Router, uri: &str, body: String) -> (StatusCode, Value) {
    let response = tower::ServiceExt::oneshot(
        app,
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap(),
    )
    .await
    .unwrap();

    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

    (status, json)
}

/// Helper to make a GET request.
///
/// # Arguments
///
/// * `app` - The Axum router to send the request to
/// * `uri` - The URI path to GET from
///
/// # Returns
///
/// A tuple containing the response status code and parsed JSON response body.
pub async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = tower::ServiceExt::oneshot(
        app,
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap();

    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

    (status, json)
}
