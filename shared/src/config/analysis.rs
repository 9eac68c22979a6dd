//! Analysis configuration.
//!
//! Policy values used by the event aggregator. They are passed explicitly to
//! every analysis call so that differently configured analyses can run side by
//! side.

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::{Validate, ValidationError};

/// Default cap on the number of elevated lines forwarded for summarization.
pub const DEFAULT_MAX_ELEVATED_LINES: usize = 200;

/// Upper bound accepted for the elevated-line cap.
pub const MAX_ELEVATED_LINES_LIMIT: usize = 100_000;

/// Millisecond-precision timestamp format, e.g. `2024-06-25 10:00:22,333`.
pub const MILLIS_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Second-precision timestamp format, e.g. `2024-06-25 10:00:22`.
pub const SECONDS_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Errors raised for an invalid analysis configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Validation failed with details.
    #[error("Invalid analysis configuration: {0}")]
    ValidationError(#[from] validator::ValidationErrors),
}

/// Configuration for one log analysis.
///
/// # Examples
///
/// ```
/// use shared::config::AnalysisConfig;
///
/// let config = AnalysisConfig::default().with_max_elevated_lines(50);
/// assert_eq!(config.max_elevated_lines, 50);
/// assert!(config.validate_config().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct AnalysisConfig {
    /// Maximum number of elevated raw lines collected for summarization.
    #[serde(default = "default_max_elevated_lines")]
    #[validate(range(
        min = 1,
        max = 100000,
        message = "max_elevated_lines must be between 1 and 100000"
    ))]
    pub max_elevated_lines: usize,

    /// chrono format strings tried in order when parsing timestamps.
    #[serde(default = "default_timestamp_formats")]
    #[validate(custom(function = "validate_timestamp_formats"))]
    pub timestamp_formats: Vec<String>,
}

const fn default_max_elevated_lines() -> usize {
    DEFAULT_MAX_ELEVATED_LINES
}

fn default_timestamp_formats() -> Vec<String> {
    vec![
        MILLIS_TIMESTAMP_FORMAT.to_string(),
        SECONDS_TIMESTAMP_FORMAT.to_string(),
    ]
}

#[allow(clippy::ptr_arg)]
fn validate_timestamp_formats(formats: &Vec<String>) -> Result<(), ValidationError> {
    for format in formats {
        if format.is_empty() || StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
            let mut error = ValidationError::new("invalid_timestamp_format");
            error.message = Some(format!("'{format}' is not a valid timestamp format").into());
            return Err(error);
        }
    }
    Ok(())
}

impl AnalysisConfig {
    /// Sets the elevated-line cap.
    #[must_use]
    pub fn with_max_elevated_lines(mut self, max_elevated_lines: usize) -> Self {
        self.max_elevated_lines = max_elevated_lines;
        self
    }

    /// Appends a timestamp format tried after the existing ones.
    #[must_use]
    pub fn with_timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_formats.push(format.into());
        self
    }

    /// Replaces the list of timestamp formats.
    #[must_use]
    pub fn with_timestamp_formats<I, S>(mut self, formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.timestamp_formats = formats.into_iter().map(Into::into).collect();
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `max_elevated_lines` is zero or above the accepted limit
    /// - A timestamp format is empty or not a valid chrono format string
    pub fn validate_config(&self) -> Result<(), ConfigError> {
        self.validate()?;
        Ok(())
    }
}

impl Default for AnalysisConfig {
    /// Returns the default configuration:
    /// - Elevated-line cap: 200
    /// - Formats: millisecond precision, then second precision
    fn default() -> Self {
        Self {
            max_elevated_lines: DEFAULT_MAX_ELEVATED_LINES,
            timestamp_formats: default_timestamp_formats(),
        }
    }
}
