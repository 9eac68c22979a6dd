//! Keyword override rules.
//!
//! Many logs carry severity as a free-text keyword rather than a structured
//! prefix. After tokenizing, the line is scanned case-insensitively and the
//! first matching rule may promote the level. Rules never lower a level.
//!
//! A line that merely mentions "error" (for example a handled failure logged
//! at INFO) is promoted too.

use crate::models::Severity;

/// A single keyword promotion rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverrideRule {
    /// Upper-case keyword searched for anywhere in the line.
    pub keyword: &'static str,
    /// Level assigned when the keyword is present and the level is lower.
    pub target: Severity,
}

impl OverrideRule {
    /// Returns true if the upper-cased line contains this rule's keyword.
    #[must_use]
    pub fn matches(&self, upper_line: &str) -> bool {
        upper_line.contains(self.keyword)
    }

    /// Applies the rule to a level: promotes, or keeps a level that is already as urgent.
    #[must_use]
    pub const fn promote(&self, level: Severity) -> Severity {
        if level.urgency() < self.target.urgency() {
            self.target
        } else {
            level
        }
    }
}

/// Override rules in precedence order. `WARN` also matches `WARNING`.
pub const KEYWORD_OVERRIDES: [OverrideRule; 2] = [
    OverrideRule {
        keyword: "ERROR",
        target: Severity::Error,
    },
    OverrideRule {
        keyword: "WARN",
        target: Severity::Warn,
    },
];

/// Applies the keyword override rules to a level assigned by the tokenizer.
///
/// Only the first rule whose keyword occurs in the line is considered.
///
/// # Examples
///
/// ```
/// use shared::models::Severity;
/// use shared::parser::apply_keyword_overrides;
///
/// assert_eq!(
///     apply_keyword_overrides("Job finished with error code 3", Severity::Info),
///     Severity::Error
/// );
/// assert_eq!(
///     apply_keyword_overrides("disk warning", Severity::Critical),
///     Severity::Critical
/// );
/// ```
#[must_use]
pub fn apply_keyword_overrides(line: &str, level: Severity) -> Severity {
    let upper = line.to_uppercase();
    KEYWORD_OVERRIDES
        .iter()
        .find(|rule| rule.matches(&upper))
        .map_or(level, |rule| rule.promote(level))
}
