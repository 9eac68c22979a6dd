//! Event aggregation.
//!
//! Turns the text of a whole log file into an [`EventBatch`]: every non-blank
//! line is classified, timestamps are coerced in a single pass afterwards, and
//! the raw lines of elevated events are collected up to the configured cap.
//!
//! # Example
//!
//! ```
//! use shared::aggregator::analyze;
//! use shared::config::AnalysisConfig;
//!
//! let content = "2024-06-25 10:00:01,123 INFO Application started\n\
//!                2024-06-25 10:00:22,333 ERROR Database connection failed\n";
//! let batch = analyze(content, &AnalysisConfig::default());
//!
//! assert_eq!(batch.events.len(), 2);
//! assert_eq!(batch.elevated_raw_lines.len(), 1);
//! ```

mod timestamps;

pub use timestamps::{coerce_timestamp, coerce_timestamps};

use crate::config::AnalysisConfig;
use crate::models::{EventBatch, LogEvent};
use crate::parser::classify_line;
use thiserror::Error;

/// Errors raised for input the aggregator cannot accept.
#[derive(Debug, Error)]
pub enum InputError {
    /// The content is not valid UTF-8 text.
    #[error("Log content is not valid UTF-8 (invalid byte sequence at offset {offset}); convert the file to UTF-8 plain text")]
    InvalidEncoding {
        /// Byte offset of the first invalid sequence.
        offset: usize,
    },
}

/// Analyzes decoded log text.
///
/// Never fails on malformed content: every non-blank line becomes exactly one
/// event. Blank lines are dropped and do not count toward any limit.
#[must_use]
pub fn analyze(content: &str, config: &AnalysisConfig) -> EventBatch {
    let mut events: Vec<LogEvent> = non_blank_lines(content)
        .map(|line| {
            let classified = classify_line(line);
            LogEvent::new(
                line,
                classified.timestamp_raw,
                classified.level,
                classified.message,
            )
        })
        .collect();

    let unparsed = coerce_timestamps(&mut events, &config.timestamp_formats);
    let elevated_raw_lines = collect_elevated(&events, config.max_elevated_lines);

    tracing::debug!(
        events = events.len(),
        elevated = elevated_raw_lines.len(),
        unparsed_timestamps = unparsed,
        "Log content analyzed"
    );

    EventBatch {
        events,
        elevated_raw_lines,
    }
}

/// Decodes raw bytes as UTF-8 and analyzes them.
///
/// # Errors
///
/// Returns [`InputError::InvalidEncoding`] if the bytes are not valid UTF-8.
/// No partial analysis is attempted.
pub fn analyze_bytes(bytes: &[u8], config: &AnalysisConfig) -> Result<EventBatch, InputError> {
    let content = std::str::from_utf8(bytes).map_err(|e| InputError::InvalidEncoding {
        offset: e.valid_up_to(),
    })?;
    Ok(analyze(content, config))
}

/// Splits on every line terminator and yields trimmed, non-empty lines.
fn non_blank_lines(content: &str) -> impl Iterator<Item = &str> {
    content
        .split(is_line_break)
        .map(str::trim)
        .filter(|line| !line.is_empty())
}

/// Line terminators: `\n`, `\r` (so `\r\n` too), and the other Unicode line breaks.
const fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r'
            | '\u{0B}'
            | '\u{0C}'
            | '\u{1C}'
            | '\u{1D}'
            | '\u{1E}'
            | '\u{85}'
            | '\u{2028}'
            | '\u{2029}'
    )
}

/// Raw lines of elevated events, in order, truncated at `cap`.
fn collect_elevated(events: &[LogEvent], cap: usize) -> Vec<String> {
    events
        .iter()
        .filter(|event| event.is_elevated())
        .take(cap)
        .map(|event| event.raw_line.clone())
        .collect()
}
