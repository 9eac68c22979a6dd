//! Application state module.
//!
//! Defines the shared application state that is passed to route handlers.

use shared::config::AnalysisConfig;
use shared::summary::{GeminiSummarizer, Summarizer};
use std::sync::Arc;

/// Application state shared across all request handlers.
///
/// Holds the summarization backend and the default analysis policy. Requests
/// never mutate it; every analysis works on its own copy of the config.
#[derive(Clone)]
pub struct AppState {
    /// The summarization backend.
    summarizer: Arc<dyn Summarizer>,
    /// Analysis policy used when a request does not override it.
    analysis: AnalysisConfig,
}

impl AppState {
    /// Creates a new application state with the given summarizer and policy.
    pub fn new(summarizer: Arc<dyn Summarizer>, analysis: AnalysisConfig) -> Self {
        Self {
            summarizer,
            analysis,
        }
    }

    /// Creates a state backed by the Gemini summarizer configured from the
    /// environment.
    ///
    /// A missing API key is not an error here: summary requests then resolve to
    /// an "unavailable" outcome while analysis keeps working.
    #[must_use]
    pub fn from_env(analysis: AnalysisConfig) -> Self {
        let summarizer = GeminiSummarizer::from_env();
        if !summarizer.has_credentials() {
            tracing::warn!("No summarization API key configured; summaries will be unavailable");
        }
        Self::new(Arc::new(summarizer), analysis)
    }

    /// Returns a shared handle to the summarizer.
    #[must_use]
    pub fn summarizer(&self) -> Arc<dyn Summarizer> {
        Arc::clone(&self.summarizer)
    }

    /// Returns the default analysis configuration.
    #[must_use]
    pub fn analysis_config(&self) -> &AnalysisConfig {
        &self.analysis
    }
}
