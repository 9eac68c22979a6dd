//! Integration tests for report export.

use axum::http::StatusCode;
use serde_json::json;

use super::common::{post_json, test_app, test_app_with, StubSummarizer, SAMPLE_LOG};

#[tokio::test]
async fn test_report_for_uploaded_file() {
    let (app, summarizer) = test_app();

    let (status, response) = post_json(
        app,
        "/api/v1/report",
        json!({ "content": SAMPLE_LOG, "source_name": "server.log" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["file_name"], "server_log_summary.md");
    assert_eq!(response["mime_type"], "text/markdown");

    let content = response["content"].as_str().unwrap();
    assert!(content.starts_with("# Log Analysis Report: server.log"));
    assert!(content.contains("| CRITICAL | 1 |"));
    assert!(!content.contains("| FATAL |"));
    assert!(content.contains("4 elevated lines"));
    assert_eq!(summarizer.calls(), 1);
}

#[tokio::test]
async fn test_report_defaults_source_name() {
    let (app, _summarizer) = test_app();

    let (status, response) =
        post_json(app, "/api/v1/report", json!({ "content": "INFO quiet" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["file_name"], "log_log_summary.md");
    assert!(response["content"]
        .as_str()
        .unwrap()
        .contains("No significant errors or warnings found"));
}

#[tokio::test]
async fn test_report_with_unavailable_summary() {
    let (app, _summarizer) = test_app_with(StubSummarizer::failing());

    let (status, response) =
        post_json(app, "/api/v1/report", json!({ "content": SAMPLE_LOG })).await;

    assert_eq!(status, StatusCode::OK);
    assert!(response["content"]
        .as_str()
        .unwrap()
        .contains("> Summary unavailable:"));
}

#[tokio::test]
async fn test_report_as_html_page() {
    let (app, summarizer) = test_app();

    let (status, response) = post_json(
        app,
        "/api/v1/report",
        json!({ "content": SAMPLE_LOG, "source_name": "server.log", "format": "html" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["file_name"], "server_log_summary.html");
    assert_eq!(response["mime_type"], "text/html");

    let content = response["content"].as_str().unwrap();
    assert!(content.contains("<title>Log Explanation - server</title>"));
    assert!(content.contains("<h1>Log Analysis Report: server.log</h1>"));
    assert!(content.contains("<td>CRITICAL</td>"));
    assert!(content.trim_end().ends_with("</html>"));
    assert_eq!(summarizer.calls(), 1);
}

#[tokio::test]
async fn test_report_rejects_unknown_format() {
    let (app, summarizer) = test_app();

    let (status, response) = post_json(
        app,
        "/api/v1/report",
        json!({ "content": SAMPLE_LOG, "format": "pdf" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "unsupported_format");
    assert!(response["message"].as_str().unwrap().contains("pdf"));
    assert_eq!(summarizer.calls(), 0);
}
