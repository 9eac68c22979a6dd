//! Log severity model.
//!
//! Defines the seven severity buckets a classified log line can land in.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Log severity level.
///
/// Variants are declared in display order, most urgent first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Critical conditions.
    Critical,
    /// Fatal conditions.
    Fatal,
    /// Error conditions.
    Error,
    /// Warning conditions (short token).
    Warn,
    /// Warning conditions (long token).
    Warning,
    /// Informational messages.
    Info,
    /// Debug information.
    Debug,
}

/// Error returned when a string is not one of the seven severity tokens.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown severity token: '{0}'")]
pub struct UnknownSeverity(pub String);

impl Severity {
    /// All severities in display order (most urgent first).
    pub const DISPLAY_ORDER: [Self; 7] = [
        Self::Critical,
        Self::Fatal,
        Self::Error,
        Self::Warn,
        Self::Warning,
        Self::Info,
        Self::Debug,
    ];

    /// Returns the upper-case token used in log lines.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::Fatal => "FATAL",
            Self::Error => "ERROR",
            Self::Warn => "WARN",
            Self::Warning => "WARNING",
            Self::Info => "INFO",
            Self::Debug => "DEBUG",
        }
    }

    /// Urgency rank used when comparing severities.
    ///
    /// `Warn`/`Warning` share a rank, as do `Fatal`/`Critical`.
    #[must_use]
    pub const fn urgency(&self) -> u8 {
        match self {
            Self::Debug => 0,
            Self::Info => 1,
            Self::Warn | Self::Warning => 2,
            Self::Error => 3,
            Self::Fatal | Self::Critical => 4,
        }
    }

    /// Returns true for the severities whose lines are forwarded to the summarizer.
    ///
    /// # Examples
    ///
    /// ```
    /// use shared::models::Severity;
    ///
    /// assert!(Severity::Warning.is_elevated());
    /// assert!(!Severity::Info.is_elevated());
    /// ```
    #[must_use]
    pub const fn is_elevated(&self) -> bool {
        self.urgency() >= Self::Warn.urgency()
    }

    /// Position of this severity in [`Severity::DISPLAY_ORDER`].
    #[must_use]
    pub const fn display_rank(&self) -> usize {
        match self {
            Self::Critical => 0,
            Self::Fatal => 1,
            Self::Error => 2,
            Self::Warn => 3,
            Self::Warning => 4,
            Self::Info => 5,
            Self::Debug => 6,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl Default for Severity {
    fn default() -> Self {
        Self::Info
    }
}

impl FromStr for Severity {
    type Err = UnknownSeverity;

    /// Parses an exact upper-case severity token.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::DISPLAY_ORDER
            .into_iter()
            .find(|severity| severity.as_str() == s)
            .ok_or_else(|| UnknownSeverity(s.to_string()))
    }
}
