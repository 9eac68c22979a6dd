//! Summarization of elevated log lines.
//!
//! The summarizer itself is an external service reached through the
//! [`Summarizer`] trait. This module decides when to call it and how its
//! failures surface: a failed call never fails the analysis, it only makes the
//! summary unavailable.

mod gemini;

pub use gemini::{build_prompt, choose_model, GeminiSummarizer, ModelInfo};

use crate::models::EventBatch;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors reported by a summarization service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// No API credentials are configured.
    #[error("Summarizer credentials are missing: set {0}")]
    MissingCredentials(&'static str),

    /// The service offers no model able to generate text.
    #[error("No suitable text generation model available: {0}")]
    NoModelAvailable(String),

    /// The request to the service failed.
    #[error("Summarizer request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with something that holds no summary text.
    #[error("Unexpected summarizer response: {0}")]
    UnexpectedResponse(String),
}

/// A text summarization service.
///
/// Implementations receive newline-joined raw log lines and return a
/// formatted report.
pub trait Summarizer: Send + Sync {
    /// Summarizes the given log snippets.
    ///
    /// # Errors
    ///
    /// Returns a `ServiceError` if the service cannot produce a summary.
    fn summarize(&self, log_snippets: &str) -> Result<String, ServiceError>;

    /// Returns false if every call is known to fail, e.g. without credentials.
    fn is_available(&self) -> bool {
        true
    }
}

impl<F> Summarizer for F
where
    F: Fn(&str) -> Result<String, ServiceError> + Send + Sync,
{
    fn summarize(&self, log_snippets: &str) -> Result<String, ServiceError> {
        self(log_snippets)
    }
}

/// Result of asking for a summary of an analyzed log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SummaryOutcome {
    /// Nothing elevated was found; the summarizer was not called.
    NoFindings,
    /// The summarizer produced a report.
    Summary {
        /// The report text (Markdown).
        text: String,
    },
    /// The summarizer failed; the analysis itself is still valid.
    Unavailable {
        /// Why no summary could be produced.
        reason: String,
    },
}

impl SummaryOutcome {
    /// Message shown when the log contains nothing notable.
    pub const NO_FINDINGS_MESSAGE: &'static str =
        "No significant errors or warnings found in the provided log file.";

    /// Returns the text to display for this outcome.
    #[must_use]
    pub fn display_text(&self) -> &str {
        match self {
            Self::NoFindings => Self::NO_FINDINGS_MESSAGE,
            Self::Summary { text } => text,
            Self::Unavailable { reason } => reason,
        }
    }

    /// Returns true unless the summarizer failed.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        !matches!(self, Self::Unavailable { .. })
    }
}

/// Summarizes the elevated lines of a batch.
///
/// The summarizer is called at most once and never when the batch has no
/// findings. Failures are logged and reported as [`SummaryOutcome::Unavailable`].
///
/// # Examples
///
/// ```
/// use shared::aggregator::analyze;
/// use shared::config::AnalysisConfig;
/// use shared::summary::{summarize_batch, ServiceError, SummaryOutcome};
///
/// let batch = analyze("INFO all good", &AnalysisConfig::default());
/// let summarizer = |_: &str| -> Result<String, ServiceError> { unreachable!() };
///
/// assert_eq!(summarize_batch(&batch, &summarizer), SummaryOutcome::NoFindings);
/// ```
pub fn summarize_batch(batch: &EventBatch, summarizer: &dyn Summarizer) -> SummaryOutcome {
    if !batch.has_findings() {
        tracing::debug!("No elevated lines found, skipping summarizer");
        return SummaryOutcome::NoFindings;
    }

    match summarizer.summarize(&batch.summary_input()) {
        Ok(text) if !text.trim().is_empty() => SummaryOutcome::Summary { text },
        Ok(_) => {
            tracing::warn!("Summarizer returned an empty report");
            SummaryOutcome::Unavailable {
                reason: "Summarizer returned an empty report".to_string(),
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "Summary unavailable");
            SummaryOutcome::Unavailable {
                reason: e.to_string(),
            }
        }
    }
}
