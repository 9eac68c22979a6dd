//! Integration tests for the analysis and timeline endpoints.
//!
//! Tests cover:
//! - Classification and level counts over a mixed log
//! - Elevated-line cap handling and validation
//! - Summary outcomes (requested, no findings, service failure)
//! - Malformed requests and body limits
//! - Timeline grouping

use axum::http::StatusCode;
use serde_json::json;

use super::common::{post_json, post_raw, test_app, test_app_with, StubSummarizer, SAMPLE_LOG};

#[tokio::test]
async fn test_analyze_sample_log() {
    let (app, summarizer) = test_app();

    let (status, response) =
        post_json(app, "/api/v1/analyze", json!({ "content": SAMPLE_LOG })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["total_events"], 7);

    let events = response["events"].as_array().unwrap();
    assert_eq!(events.len(), 7);
    assert_eq!(events[0]["level"], "INFO");
    assert_eq!(events[0]["timestamp_raw"], "2024-06-25 10:00:01,123");
    assert_eq!(events[0]["timestamp"], "2024-06-25T10:00:01.123");
    assert_eq!(
        events[0]["message"],
        "Application started successfully. Version 1.0."
    );
    assert_eq!(events[4]["level"], "CRITICAL");
    assert_eq!(events[4]["timestamp"], "2024-06-25T10:00:28");
    assert_eq!(events[4]["message"], "Memory leak detected in process PID 1234.");

    // Bare line promoted by its keyword, message is the whole line.
    assert_eq!(events[6]["level"], "ERROR");
    assert_eq!(events[6]["message"], "Retrying request after error from upstream");
    assert!(events[6].get("timestamp_raw").is_none());

    let elevated = response["elevated_raw_lines"].as_array().unwrap();
    assert_eq!(elevated.len(), 4);
    assert!(elevated[0].as_str().unwrap().contains("High CPU usage"));

    assert!(response["summary"].is_null());
    assert_eq!(summarizer.calls(), 0);
}

#[tokio::test]
async fn test_level_counts_in_display_order() {
    let (app, _summarizer) = test_app();

    let (_, response) = post_json(app, "/api/v1/analyze", json!({ "content": SAMPLE_LOG })).await;

    let counts: Vec<(String, u64)> = response["level_counts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| {
            (
                c["level"].as_str().unwrap().to_string(),
                c["count"].as_u64().unwrap(),
            )
        })
        .collect();

    assert_eq!(
        counts,
        vec![
            ("CRITICAL".to_string(), 1),
            ("FATAL".to_string(), 0),
            ("ERROR".to_string(), 2),
            ("WARN".to_string(), 1),
            ("WARNING".to_string(), 0),
            ("INFO".to_string(), 2),
            ("DEBUG".to_string(), 1),
        ]
    );
}

#[tokio::test]
async fn test_cap_limits_elevated_lines() {
    let (app, _summarizer) = test_app();
    let content: String = (0..250)
        .map(|i| format!("2024-06-25 10:00:00 ERROR failure {i}\n"))
        .collect();

    let (status, response) = post_json(
        app,
        "/api/v1/analyze",
        json!({ "content": content, "max_elevated_lines": 200 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["total_events"], 250);
    let elevated = response["elevated_raw_lines"].as_array().unwrap();
    assert_eq!(elevated.len(), 200);
    assert_eq!(elevated[199], "2024-06-25 10:00:00 ERROR failure 199");
}

#[tokio::test]
async fn test_invalid_cap_returns_400() {
    for cap in [0, 100_001] {
        let (app, _summarizer) = test_app();
        let (status, response) = post_json(
            app,
            "/api/v1/analyze",
            json!({ "content": SAMPLE_LOG, "max_elevated_lines": cap }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["error"], "invalid_config");
    }
}

#[tokio::test]
async fn test_summary_receives_joined_elevated_lines() {
    let (app, summarizer) = test_app();

    let (status, response) = post_json(
        app,
        "/api/v1/analyze",
        json!({ "content": SAMPLE_LOG, "summarize": true, "max_elevated_lines": 2 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["summary"]["status"], "summary");
    assert_eq!(
        response["summary"]["text"],
        "### Critical Alarms & Issues\n2 elevated lines"
    );
    assert_eq!(summarizer.calls(), 1);
    assert_eq!(
        summarizer.last_input().unwrap(),
        "2024-06-25 10:00:15,789 WARN High CPU usage detected on 'web-server-01'. Current: 85%.\n\
         2024-06-25 10:00:22,333 ERROR Database connection failed for 'user_db': Connection refused."
    );
}

#[tokio::test]
async fn test_no_findings_skips_summarizer() {
    let (app, summarizer) = test_app();

    let (status, response) = post_json(
        app,
        "/api/v1/analyze",
        json!({
            "content": "2024-06-25 10:00:01,123 INFO User 'testuser' logged in.\n\
                        2024-06-25 10:00:12,000 DEBUG Auth service response: 200 OK.",
            "summarize": true
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["summary"]["status"], "no_findings");
    assert_eq!(summarizer.calls(), 0);
}

#[tokio::test]
async fn test_summarizer_failure_keeps_analysis() {
    let (app, summarizer) = test_app_with(StubSummarizer::failing());

    let (status, response) = post_json(
        app,
        "/api/v1/analyze",
        json!({ "content": SAMPLE_LOG, "summarize": true }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["total_events"], 7);
    assert_eq!(response["summary"]["status"], "unavailable");
    assert!(response["summary"]["reason"]
        .as_str()
        .unwrap()
        .contains("GOOGLE_API_KEY"));
    assert_eq!(summarizer.calls(), 1);
}

#[tokio::test]
async fn test_empty_content() {
    let (app, _summarizer) = test_app();

    let (status, response) =
        post_json(app, "/api/v1/analyze", json!({ "content": "\n\n   \n" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["total_events"], 0);
    assert!(response["events"].as_array().unwrap().is_empty());
    assert!(response["elevated_raw_lines"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_json_is_rejected() {
    let (app, _summarizer) = test_app();
    let (status, _) = post_raw(app, "/api/v1/analyze", "{\"content\": ".to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (app, _summarizer) = test_app();
    let (status, _) = post_json(app, "/api/v1/analyze", json!({ "text": "ERROR" })).await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_timeline_endpoint() {
    let (app, summarizer) = test_app();

    let (status, response) = post_json(
        app,
        "/api/v1/timeline",
        json!({ "content": SAMPLE_LOG, "summarize": true }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["start"], "2024-06-25T10:00:01.123");
    assert_eq!(response["end"], "2024-06-25T10:00:45.789");
    assert_eq!(response["unplotted"], 1);

    let levels: Vec<&str> = response["series"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["level"].as_str().unwrap())
        .collect();
    assert_eq!(levels, vec!["CRITICAL", "ERROR", "WARN", "INFO", "DEBUG"]);
    assert_eq!(summarizer.calls(), 0);
}
