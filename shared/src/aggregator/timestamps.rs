//! Timestamp coercion.
//!
//! Parses matched timestamp text against an ordered list of chrono formats.
//! A timestamp matching none of them stays unparsed; that is not an error.
//! Leap seconds (`:60`) are treated as unparseable.

use crate::models::LogEvent;
use chrono::{NaiveDateTime, Timelike};

/// Parses `raw` with the first format in `formats` that accepts it.
///
/// # Examples
///
/// ```
/// use shared::aggregator::coerce_timestamp;
/// use shared::config::AnalysisConfig;
///
/// let config = AnalysisConfig::default();
/// let parsed = coerce_timestamp("2024-06-25 10:00:22,333", &config.timestamp_formats);
/// assert_eq!(parsed.unwrap().to_string(), "2024-06-25 10:00:22.333");
/// ```
#[must_use]
pub fn coerce_timestamp<S: AsRef<str>>(raw: &str, formats: &[S]) -> Option<NaiveDateTime> {
    formats
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format.as_ref()).ok())
        .filter(|parsed| parsed.nanosecond() < 1_000_000_000)
}

/// Fills in `timestamp` for every event that has a `timestamp_raw`.
///
/// Returns the number of events whose timestamp could not be parsed.
pub fn coerce_timestamps<S: AsRef<str>>(events: &mut [LogEvent], formats: &[S]) -> usize {
    let mut unparsed = 0;
    for event in events.iter_mut() {
        let Some(raw) = event.timestamp_raw.as_deref() else {
            continue;
        };
        event.timestamp = coerce_timestamp(raw, formats);
        if event.timestamp.is_none() {
            tracing::trace!(timestamp = raw, "Timestamp matched no configured format");
            unparsed += 1;
        }
    }
    unparsed
}
