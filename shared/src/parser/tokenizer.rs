//! Structured line tokenizer using nom.
//!
//! Recognizes lines shaped like:
//! - `2024-06-25 10:00:22,333 ERROR Database connection failed`
//! - `2024-06-25 10:00:22 [WARN] Disk space low`
//! - `DEBUG cache refreshed`
//!
//! Every part is optional; whatever follows the recognized prefix is the message.

use crate::models::Severity;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while_m_n},
    character::complete::char,
    combinator::{opt, recognize, value},
    sequence::delimited,
    IResult, Parser,
};

/// Tokens recognized at the start of a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineTokens<'a> {
    /// The timestamp prefix, e.g. `2024-06-25 10:00:22,333`.
    pub timestamp: Option<&'a str>,
    /// The structured level token, brackets stripped.
    pub level: Option<Severity>,
    /// Everything after the recognized prefix, trimmed.
    pub message: &'a str,
    /// Byte offset just past the timestamp (0 if none).
    pub timestamp_end: usize,
    /// Byte offset just past the level token, including a closing bracket.
    pub level_end: Option<usize>,
}

impl LineTokens<'_> {
    /// Returns true if neither a timestamp nor a level was recognized.
    #[must_use]
    pub const fn is_bare(&self) -> bool {
        self.timestamp.is_none() && self.level.is_none()
    }
}

/// Tokenizes the start of a trimmed log line.
///
/// Returns `None` if the structured prefix could not be parsed at all.
///
/// # Examples
///
/// ```
/// use shared::models::Severity;
/// use shared::parser::tokenize;
///
/// let tokens = tokenize("2024-06-25 10:00:22,333 ERROR Database connection failed").unwrap();
/// assert_eq!(tokens.timestamp, Some("2024-06-25 10:00:22,333"));
/// assert_eq!(tokens.level, Some(Severity::Error));
/// assert_eq!(tokens.message, "Database connection failed");
/// ```
#[must_use]
pub fn tokenize(line: &str) -> Option<LineTokens<'_>> {
    let (after_timestamp, timestamp) = opt(timestamp).parse(line).ok()?;
    let timestamp_end = line.len() - after_timestamp.len();

    let (after_space, _) = whitespace(after_timestamp).ok()?;
    let (after_level, level) = opt(level_token).parse(after_space).ok()?;
    let level_end = level.map(|_| line.len() - after_level.len());

    let (rest, _) = whitespace(after_level).ok()?;

    Some(LineTokens {
        timestamp,
        level,
        message: rest.trim(),
        timestamp_end,
        level_end,
    })
}

// ============================================================================
// Timestamp
// ============================================================================

/// `YYYY-MM-DD HH:MM:SS` with an optional `,mmm` millisecond suffix.
fn timestamp(input: &str) -> IResult<&str, &str> {
    recognize((
        digits(4),
        char('-'),
        digits(2),
        char('-'),
        digits(2),
        char(' '),
        digits(2),
        char(':'),
        digits(2),
        char(':'),
        digits(2),
        opt((char(','), digits(3))),
    ))
    .parse(input)
}

fn digits<'a>(
    count: usize,
) -> impl Parser<&'a str, Output = &'a str, Error = nom::error::Error<&'a str>> {
    take_while_m_n(count, count, |c: char| c.is_ascii_digit())
}

// ============================================================================
// Level
// ============================================================================

/// A severity name, optionally wrapped in brackets.
///
/// The name is matched as a prefix: `CRITICALLY low` yields `CRITICAL` and
/// leaves `LY low` for the message.
fn level_token(input: &str) -> IResult<&str, Severity> {
    delimited(opt(char('[')), severity_name, opt(char(']'))).parse(input)
}

fn severity_name(input: &str) -> IResult<&str, Severity> {
    // Longer names first so WARNING is not read as WARN.
    alt((
        value(Severity::Critical, tag("CRITICAL")),
        value(Severity::Warning, tag("WARNING")),
        value(Severity::Fatal, tag("FATAL")),
        value(Severity::Error, tag("ERROR")),
        value(Severity::Debug, tag("DEBUG")),
        value(Severity::Warn, tag("WARN")),
        value(Severity::Info, tag("INFO")),
    ))
    .parse(input)
}

/// Any run of whitespace, Unicode included.
fn whitespace(input: &str) -> IResult<&str, &str> {
    take_while(char::is_whitespace).parse(input)
}
