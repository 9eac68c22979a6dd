//! Google Generative Language API summarizer.
//!
//! Uses the blocking `reqwest` client; callers on an async runtime should run
//! [`GeminiSummarizer::summarize`] on a blocking thread.

use super::{ServiceError, Summarizer};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable holding the API key.
pub const API_KEY_VAR: &str = "GOOGLE_API_KEY";

/// Environment variable selecting a model and skipping discovery.
pub const MODEL_VAR: &str = "LOGSIEVE_SUMMARY_MODEL";

/// Environment variable overriding the API base URL.
pub const ENDPOINT_VAR: &str = "LOGSIEVE_SUMMARY_ENDPOINT";

const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
const TEMPERATURE: f32 = 0.2;

/// Models tried first, in order.
const PREFERRED_MODELS: [&str; 3] = ["gemini-1.5-flash-latest", "gemini-1.0-pro", "gemini-pro"];

const GENERATE_CONTENT: &str = "generateContent";

/// A model entry returned by the model listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    /// Full resource name, e.g. `models/gemini-pro`.
    pub name: String,
    /// Generation methods the model supports.
    #[serde(default)]
    pub supported_generation_methods: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
    #[serde(default)]
    next_page_token: Option<String>,
}

/// Gathers every page of the model listing.
///
/// `fetch_page` receives the page token for the next request, `None` for the first.
fn collect_model_pages<F>(mut fetch_page: F) -> Result<Vec<ModelInfo>, ServiceError>
where
    F: FnMut(Option<&str>) -> Result<ListModelsResponse, ServiceError>,
{
    let mut models = Vec::new();
    let mut page_token: Option<String> = None;
    loop {
        let page = fetch_page(page_token.as_deref())?;
        models.extend(page.models);
        match page.next_page_token.filter(|token| !token.is_empty()) {
            Some(token) if page_token.as_deref() != Some(token.as_str()) => {
                page_token = Some(token);
            }
            _ => return Ok(models),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

/// Picks a text generation model from a model listing.
///
/// Only models supporting `generateContent` are considered. Preferred models
/// win in order; otherwise the first model that is neither an embedding nor an
/// attributed-QA model is used.
///
/// # Errors
///
/// Returns [`ServiceError::NoModelAvailable`] if no model qualifies.
pub fn choose_model(models: &[ModelInfo]) -> Result<String, ServiceError> {
    let supported: Vec<&str> = models
        .iter()
        .filter(|model| {
            model
                .supported_generation_methods
                .iter()
                .any(|method| method == GENERATE_CONTENT)
        })
        .map(|model| model.name.as_str())
        .collect();

    if supported.is_empty() {
        return Err(ServiceError::NoModelAvailable(
            "no models support generateContent".to_string(),
        ));
    }

    if let Some(preferred) = PREFERRED_MODELS.into_iter().find(|preferred| {
        supported
            .iter()
            .any(|name| short_model_name(name) == *preferred)
    }) {
        return Ok(preferred.to_string());
    }

    supported
        .into_iter()
        .find(|name| !name.contains("embedding") && !name.contains("aqa"))
        .map(|name| short_model_name(name).to_string())
        .ok_or_else(|| {
            ServiceError::NoModelAvailable(
                "only embedding or question-answering models are available".to_string(),
            )
        })
}

fn short_model_name(name: &str) -> &str {
    name.strip_prefix("models/").unwrap_or(name)
}

/// Wraps log snippets in the analysis prompt sent to the model.
#[must_use]
pub fn build_prompt(log_snippets: &str) -> String {
    format!(
        "You are a system health monitor and log forensics expert. Analyze the log data below \
and deliver a clear, actionable summary.

Structure your answer with these Markdown sections and keep it concise:

### Timeline Snapshot
- The primary time range of significant events.

### Critical Alarms & Issues
- The most severe errors (CRITICAL, FATAL, ERROR) and what each one means.

### Warnings & Potential Bottlenecks
- Warnings or early signs of trouble such as high resource usage, throttling, or low disk space.

### Underlying Causes & Insights
- The most probable root causes, synthesized across the log lines.

### Recommended Immediate Actions
- A prioritized list of steps for investigation and resolution.

---
Log snippets to analyze:
{log_snippets}
---
"
    )
}

/// Summarizer backed by the Google Generative Language API.
#[derive(Debug, Clone)]
pub struct GeminiSummarizer {
    api_key: Option<String>,
    endpoint: String,
    model: Option<String>,
    timeout: Duration,
}

impl GeminiSummarizer {
    /// Creates a summarizer with the given API key and default settings.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Creates a summarizer from `GOOGLE_API_KEY`, `LOGSIEVE_SUMMARY_MODEL` and
    /// `LOGSIEVE_SUMMARY_ENDPOINT`.
    ///
    /// A missing key is not an error here; every `summarize` call then fails
    /// with [`ServiceError::MissingCredentials`].
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(|var| std::env::var(var).ok())
    }

    /// Like [`GeminiSummarizer::from_env`], reading variables through `lookup`.
    #[must_use]
    pub fn from_env_with<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        Self {
            api_key: non_empty(API_KEY_VAR),
            endpoint: non_empty(ENDPOINT_VAR).unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            model: non_empty(MODEL_VAR),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Uses a fixed model instead of discovering one.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Overrides the API base URL.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns true if an API key is configured.
    #[must_use]
    pub const fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }

    fn base_url(&self) -> &str {
        self.endpoint.trim_end_matches('/')
    }

    fn discover_model(
        &self,
        client: &reqwest::blocking::Client,
        api_key: &str,
    ) -> Result<String, ServiceError> {
        let url = format!("{}/models", self.base_url());
        let models = collect_model_pages(|page_token| {
            let mut request = client.get(&url).header("x-goog-api-key", api_key);
            if let Some(token) = page_token {
                request = request.query(&[("pageToken", token)]);
            }
            Ok(request.send()?.error_for_status()?.json()?)
        })?;
        tracing::debug!(models = models.len(), "Listed available models");

        choose_model(&models)
    }
}

impl Summarizer for GeminiSummarizer {
    fn summarize(&self, log_snippets: &str) -> Result<String, ServiceError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ServiceError::MissingCredentials(API_KEY_VAR))?;

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()?;

        let model = match &self.model {
            Some(model) => model.clone(),
            None => self.discover_model(&client, api_key)?,
        };
        tracing::debug!(%model, "Requesting log summary");

        let prompt = build_prompt(log_snippets);
        let request = GenerateRequest {
            contents: [Content {
                parts: [RequestPart { text: &prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
            },
        };

        let response: GenerateResponse = client
            .post(format!("{}/models/{model}:generateContent", self.base_url()))
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()?
            .error_for_status()?
            .json()?;

        extract_text(response)
    }

    fn is_available(&self) -> bool {
        self.has_credentials()
    }
}

fn extract_text(response: GenerateResponse) -> Result<String, ServiceError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts.into_iter().map(|part| part.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(ServiceError::UnexpectedResponse(
            "response contained no candidate text".to_string(),
        ));
    }
    Ok(text)
}
