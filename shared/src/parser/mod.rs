//! Log line classification.
//!
//! Classification runs in two stages:
//!
//! 1. [`tokenize`] recognizes an optional timestamp and level at the start of the line.
//! 2. [`apply_keyword_overrides`] promotes the level based on keywords anywhere in the line.
//!
//! # Example
//!
//! ```
//! use shared::models::Severity;
//! use shared::parser::classify_line;
//!
//! let classified = classify_line("WARN High CPU usage");
//! assert_eq!(classified.timestamp_raw, None);
//! assert_eq!(classified.level, Severity::Warn);
//! assert_eq!(classified.message, "High CPU usage");
//! ```

mod overrides;
mod tokenizer;

pub use overrides::{apply_keyword_overrides, OverrideRule, KEYWORD_OVERRIDES};
pub use tokenizer::{tokenize, LineTokens};

use crate::models::Severity;

/// The classifier's view of one line, before timestamp parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// The matched timestamp text, if any.
    pub timestamp_raw: Option<String>,
    /// The assigned severity.
    pub level: Severity,
    /// The message body.
    pub message: String,
}

/// Classifies a single trimmed, non-empty log line.
///
/// Never fails: a line with no recognizable structure is classified as
/// `INFO` with the whole line as its message, subject to keyword overrides.
#[must_use]
pub fn classify_line(line: &str) -> Classification {
    let mut classified = structured_classification(line);
    classified.level = apply_keyword_overrides(line, classified.level);
    classified
}

/// Stage one: derive timestamp, level and message from the structured prefix.
fn structured_classification(line: &str) -> Classification {
    let Some(tokens) = tokenize(line).filter(|tokens| !tokens.is_bare()) else {
        return Classification {
            timestamp_raw: None,
            level: Severity::default(),
            message: line.to_string(),
        };
    };

    let message = if tokens.message.is_empty() {
        rederive_message(line, &tokens)
    } else {
        tokens.message
    };

    Classification {
        timestamp_raw: tokens.timestamp.map(str::to_string),
        level: tokens.level.unwrap_or_default(),
        message: message.to_string(),
    }
}

/// Recovers a message when the captured remainder is empty.
///
/// Takes the text after the level token, or after the timestamp when there is
/// no level. If that is empty as well the whole line is the message.
fn rederive_message<'a>(line: &'a str, tokens: &LineTokens<'a>) -> &'a str {
    let start = tokens.level_end.unwrap_or(tokens.timestamp_end);
    let tail = line.get(start..).unwrap_or_default().trim();
    if tail.is_empty() {
        line
    } else {
        tail
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Arbitrary text plus lines shaped like real log lines.
    fn line_strategy() -> impl Strategy<Value = String> {
        let structured = (
            proptest::option::of(
                "[0-9]{4}-[0-9]{2}-[0-9]{2} [0-9]{2}:[0-9]{2}:[0-9]{2}(,[0-9]{1,4})?",
            ),
            proptest::option::of("\\[?(INFO|WARN|WARNING|ERROR|DEBUG|CRITICAL|FATAL)\\]?"),
            "\\PC{0,40}",
        )
            .prop_map(|(timestamp, level, rest)| {
                format!(
                    "{} {} {rest}",
                    timestamp.unwrap_or_default(),
                    level.unwrap_or_default()
                )
            });

        prop_oneof![any::<String>(), structured]
            .prop_map(|line| line.trim().to_string())
            .prop_filter("classifier input is non-empty", |line| !line.is_empty())
    }

    proptest! {
        #[test]
        fn classify_line_never_panics(line in line_strategy()) {
            let classified = classify_line(&line);

            prop_assert!(Severity::DISPLAY_ORDER.contains(&classified.level));
            prop_assert!(!classified.message.is_empty());
            if let Some(timestamp) = &classified.timestamp_raw {
                prop_assert!(line.starts_with(timestamp.as_str()));
            }
        }

        #[test]
        fn keyword_overrides_are_idempotent(line in line_strategy()) {
            let classified = classify_line(&line);

            prop_assert_eq!(apply_keyword_overrides(&line, classified.level), classified.level);
        }
    }
}
