//! Log analysis endpoints.
//!
//! Accepts raw log content as JSON, runs it through the shared analysis
//! engine, and returns the structured events, a plottable timeline, or a
//! downloadable report.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use shared::aggregator::analyze;
use shared::chrono::Utc;
use shared::config::{AnalysisConfig, ConfigError};
use shared::models::{EventBatch, LevelCount, LogEvent};
use shared::report::{data_uri, render_report, report_file_name, ReportError, ReportFormat};
use shared::summary::{summarize_batch, SummaryOutcome};
use shared::timeline::Timeline;

/// Source name used in reports when the request does not name the file.
const DEFAULT_SOURCE_NAME: &str = "log.txt";

/// Request body for analysis and timeline requests.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    /// Full text of the log file.
    pub content: String,
    /// Overrides the server's elevated-line cap for this request.
    #[serde(default)]
    pub max_elevated_lines: Option<usize>,
    /// Whether to ask the summarizer for a report.
    #[serde(default)]
    pub summarize: bool,
}

/// Response for a successful analysis.
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    /// One event per non-blank line, in file order.
    pub events: Vec<LogEvent>,
    /// Raw lines of elevated events, capped.
    pub elevated_raw_lines: Vec<String>,
    /// Event count per severity, in display order.
    pub level_counts: Vec<LevelCount>,
    /// Number of events.
    pub total_events: usize,
    /// Summary outcome; `None` when no summary was requested.
    pub summary: Option<SummaryOutcome>,
}

/// Request body for report export.
#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    /// Full text of the log file.
    pub content: String,
    /// Overrides the server's elevated-line cap for this request.
    #[serde(default)]
    pub max_elevated_lines: Option<usize>,
    /// Name of the uploaded file, used for the title and download name.
    #[serde(default)]
    pub source_name: Option<String>,
    /// Export format, `markdown` (default) or `html`.
    #[serde(default)]
    pub format: Option<String>,
}

/// Response for report export.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReportResponse {
    /// Suggested download file name.
    pub file_name: String,
    /// MIME type of `content`.
    pub mime_type: String,
    /// The rendered report.
    pub content: String,
    /// The report as a base64 `data:` URI.
    pub data_uri: String,
}

/// Error response for analysis operations.
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeError {
    /// Error type.
    pub error: String,
    /// Detailed error message.
    pub message: String,
}

impl From<ConfigError> for AnalyzeError {
    fn from(e: ConfigError) -> Self {
        Self {
            error: "invalid_config".to_string(),
            message: e.to_string(),
        }
    }
}

impl From<ReportError> for AnalyzeError {
    fn from(e: ReportError) -> Self {
        let error = match e {
            ReportError::UnsupportedFormat(_) => "unsupported_format",
            ReportError::Render(_) => "internal_error",
        };
        Self {
            error: error.to_string(),
            message: e.to_string(),
        }
    }
}

type ErrorResponse = (StatusCode, Json<AnalyzeError>);

/// Creates the analysis routes with application state.
pub fn analyze_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/analyze", post(analyze_log))
        .route("/api/v1/timeline", post(log_timeline))
        .route("/api/v1/report", post(export_report))
        .with_state(state)
}

/// Handler for log analysis.
///
/// Analysis itself never fails on malformed lines. Only an invalid cap is
/// rejected. A summarizer failure is reported inside the response.
async fn analyze_log(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ErrorResponse> {
    let config = resolve_config(&state, request.max_elevated_lines)?;
    let batch = analyze(&request.content, &config);

    let (batch, summary) = if request.summarize {
        let (batch, outcome) = summarize_off_runtime(&state, batch).await?;
        (batch, Some(outcome))
    } else {
        (batch, None)
    };

    tracing::debug!(
        events = batch.len(),
        elevated = batch.elevated_raw_lines.len(),
        summarized = summary.is_some(),
        "Analysis request completed"
    );

    Ok(Json(AnalyzeResponse {
        level_counts: batch.level_counts(),
        total_events: batch.len(),
        events: batch.events,
        elevated_raw_lines: batch.elevated_raw_lines,
        summary,
    }))
}

/// Handler for the severity timeline.
async fn log_timeline(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<Timeline>, ErrorResponse> {
    let config = resolve_config(&state, request.max_elevated_lines)?;
    let batch = analyze(&request.content, &config);
    let timeline = Timeline::from_batch(&batch);

    tracing::debug!(
        points = timeline.point_count(),
        unplotted = timeline.unplotted,
        "Timeline built"
    );

    Ok(Json(timeline))
}

/// Handler for report export.
async fn export_report(
    State(state): State<AppState>,
    Json(request): Json<ReportRequest>,
) -> Result<Json<ReportResponse>, ErrorResponse> {
    let format = request
        .format
        .as_deref()
        .map_or(Ok(ReportFormat::default()), str::parse::<ReportFormat>)
        .map_err(|e| {
            tracing::debug!(error = %e, "Rejected report format");
            (StatusCode::BAD_REQUEST, Json(AnalyzeError::from(e)))
        })?;
    let config = resolve_config(&state, request.max_elevated_lines)?;
    let source_name = request
        .source_name
        .as_deref()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or(DEFAULT_SOURCE_NAME);

    let batch = analyze(&request.content, &config);
    let (batch, outcome) = summarize_off_runtime(&state, batch).await?;
    let content = render_report(source_name, &batch, &outcome, Utc::now(), format).map_err(|e| {
        tracing::error!(error = %e, "Report rendering failed");
        (StatusCode::INTERNAL_SERVER_ERROR, Json(AnalyzeError::from(e)))
    })?;

    Ok(Json(ReportResponse {
        file_name: report_file_name(source_name, format),
        mime_type: format.mime_type().to_string(),
        data_uri: data_uri(&content, format),
        content,
    }))
}

/// Applies a per-request cap to the server's analysis config and validates it.
fn resolve_config(
    state: &AppState,
    max_elevated_lines: Option<usize>,
) -> Result<AnalysisConfig, ErrorResponse> {
    let mut config = state.analysis_config().clone();
    if let Some(cap) = max_elevated_lines {
        config = config.with_max_elevated_lines(cap);
    }

    config.validate_config().map_err(|e| {
        tracing::debug!(error = %e, "Rejected analysis config");
        (StatusCode::BAD_REQUEST, Json(AnalyzeError::from(e)))
    })?;

    Ok(config)
}

/// Runs the blocking summarizer on the blocking thread pool.
async fn summarize_off_runtime(
    state: &AppState,
    batch: EventBatch,
) -> Result<(EventBatch, SummaryOutcome), ErrorResponse> {
    let summarizer = state.summarizer();

    tokio::task::spawn_blocking(move || {
        let outcome = summarize_batch(&batch, summarizer.as_ref());
        (batch, outcome)
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Summarizer task failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(AnalyzeError {
                error: "internal_error".to_string(),
                message: "Summarization task failed".to_string(),
            }),
        )
    })
}
