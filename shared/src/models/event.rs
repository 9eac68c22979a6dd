//! Structured log event model.
//!
//! Defines `LogEvent`, the structured form of one raw log line, and
//! `EventBatch`, the complete result of analyzing one log file.

use super::severity::Severity;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A single structured event derived from one non-blank log line.
///
/// # Example
///
/// ```
/// use shared::models::{LogEvent, Severity};
///
/// let event = LogEvent::new("WARN High CPU usage", None, Severity::Warn, "High CPU usage");
/// assert!(event.timestamp.is_none());
/// assert!(event.is_elevated());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEvent {
    /// The original line, trimmed. Never empty.
    pub raw_line: String,

    /// The matched timestamp text, unparsed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp_raw: Option<String>,

    /// Parsed time of the event, absent when no configured format matched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<NaiveDateTime>,

    /// Severity bucket of the event.
    #[serde(default)]
    pub level: Severity,

    /// The line with timestamp and level tokens stripped.
    pub message: String,
}

impl LogEvent {
    /// Creates an event whose timestamp has not been coerced yet.
    #[must_use]
    pub fn new(
        raw_line: impl Into<String>,
        timestamp_raw: Option<String>,
        level: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            raw_line: raw_line.into(),
            timestamp_raw,
            timestamp: None,
            level,
            message: message.into(),
        }
    }

    /// Returns true if this event belongs to the elevated severity set.
    #[must_use]
    pub const fn is_elevated(&self) -> bool {
        self.level.is_elevated()
    }
}

/// Number of events observed for one severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelCount {
    /// The severity being counted.
    pub level: Severity,
    /// Number of events with that severity.
    pub count: usize,
}

/// The complete structured result of parsing one log file.
///
/// Built once per analysis and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventBatch {
    /// All events in input line order.
    pub events: Vec<LogEvent>,

    /// Raw lines of elevated events, in order, truncated at the configured cap.
    pub elevated_raw_lines: Vec<String>,
}

impl EventBatch {
    /// Returns the number of events in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if the batch holds no events.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Returns false when nothing elevated was found, i.e. there is nothing to summarize.
    #[must_use]
    pub fn has_findings(&self) -> bool {
        !self.elevated_raw_lines.is_empty()
    }

    /// The text handed to the summarizer: elevated lines joined by newlines.
    #[must_use]
    pub fn summary_input(&self) -> String {
        self.elevated_raw_lines.join("\n")
    }

    /// Counts events per severity, in display order, including zero counts.
    #[must_use]
    pub fn level_counts(&self) -> Vec<LevelCount> {
        let mut counts = [0usize; 7];
        for event in &self.events {
            counts[event.level.display_rank()] += 1;
        }

        Severity::DISPLAY_ORDER
            .into_iter()
            .zip(counts)
            .map(|(level, count)| LevelCount { level, count })
            .collect()
    }

    /// Returns the earliest and latest parsed timestamps, if any event has one.
    #[must_use]
    pub fn time_range(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let mut timestamps = self.events.iter().filter_map(|event| event.timestamp);
        let first = timestamps.next()?;
        Some(timestamps.fold((first, first), |(min, max), ts| {
            (min.min(ts), max.max(ts))
        }))
    }
}
