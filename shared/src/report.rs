//! Analysis report export.
//!
//! Renders an analyzed log and its summary as a downloadable Markdown or
//! HTML document, optionally packed into a `data:` URI. The HTML page is
//! the Markdown report rendered with tables and line breaks kept.

use crate::models::EventBatch;
use crate::summary::SummaryOutcome;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use pulldown_cmark::{html, Event, Options, Parser};
use std::fmt::Write as _;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur while exporting a report.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReportError {
    /// The requested export format is not supported.
    #[error("Unsupported report format: '{0}'. Use markdown or html")]
    UnsupportedFormat(String),

    /// Formatting the document failed.
    #[error("Failed to render report")]
    Render(#[from] std::fmt::Error),
}

/// Supported report formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Markdown document.
    #[default]
    Markdown,
    /// Standalone HTML page.
    Html,
}

impl ReportFormat {
    /// File extension without the dot.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Html => "html",
        }
    }

    /// MIME type of the rendered document.
    #[must_use]
    pub const fn mime_type(&self) -> &'static str {
        match self {
            Self::Markdown => "text/markdown",
            Self::Html => "text/html",
        }
    }
}

impl FromStr for ReportFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(Self::Markdown),
            "html" | "htm" => Ok(Self::Html),
            other => Err(ReportError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Page styling for HTML reports.
const HTML_STYLE: &str = "\
body { font-family: 'Inter', sans-serif; line-height: 1.6; margin: 20px; color: #333; }
h1, h2, h3, h4, h5, h6 { font-family: 'Inter', sans-serif; color: #2E86C1; }
h2 { border-bottom: 1px solid #eee; padding-bottom: 5px; margin-top: 30px; }
pre { background-color: #f4f4f4; padding: 10px; border-radius: 5px; overflow-x: auto; }
code { background-color: #f9f9f9; padding: 2px 4px; border-radius: 3px; font-family: monospace; }
ul { list-style-type: disc; padding-left: 20px; }
ol { padding-left: 20px; }
ul li, ol li { margin-bottom: 5px; }
";

/// The uploaded file name without a `.log` or `.txt` suffix.
fn source_stem(source_name: &str) -> &str {
    source_name
        .strip_suffix(".log")
        .or_else(|| source_name.strip_suffix(".txt"))
        .unwrap_or(source_name)
}

/// Derives the download file name for a report from the uploaded file name.
///
/// # Examples
///
/// ```
/// use shared::report::{report_file_name, ReportFormat};
///
/// assert_eq!(report_file_name("app.log", ReportFormat::Markdown), "app_log_summary.md");
/// assert_eq!(report_file_name("build.txt", ReportFormat::Html), "build_log_summary.html");
/// ```
#[must_use]
pub fn report_file_name(source_name: &str, format: ReportFormat) -> String {
    format!(
        "{}_log_summary.{}",
        source_stem(source_name),
        format.extension()
    )
}

/// Renders the report in the requested format.
///
/// # Errors
///
/// Returns [`ReportError::Render`] if formatting the document fails.
pub fn render_report(
    source_name: &str,
    batch: &EventBatch,
    outcome: &SummaryOutcome,
    generated_at: DateTime<Utc>,
    format: ReportFormat,
) -> Result<String, ReportError> {
    let markdown = render_markdown_report(source_name, batch, outcome, generated_at)?;
    match format {
        ReportFormat::Markdown => Ok(markdown),
        ReportFormat::Html => render_html_page(source_name, &markdown),
    }
}

/// Renders the Markdown report.
///
/// # Errors
///
/// Returns [`ReportError::Render`] if formatting the document fails.
pub fn render_markdown_report(
    source_name: &str,
    batch: &EventBatch,
    outcome: &SummaryOutcome,
    generated_at: DateTime<Utc>,
) -> Result<String, ReportError> {
    let mut out = String::new();
    write_markdown(&mut out, source_name, batch, outcome, generated_at)?;
    Ok(out)
}

fn write_markdown(
    out: &mut String,
    source_name: &str,
    batch: &EventBatch,
    outcome: &SummaryOutcome,
    generated_at: DateTime<Utc>,
) -> std::fmt::Result {
    writeln!(out, "# Log Analysis Report: {source_name}")?;
    writeln!(out)?;
    writeln!(
        out,
        "_Generated {}_",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    )?;
    writeln!(out)?;

    writeln!(out, "## Overview")?;
    writeln!(out)?;
    writeln!(out, "- Events: {}", batch.len())?;
    writeln!(
        out,
        "- Lines sent for summary: {}",
        batch.elevated_raw_lines.len()
    )?;
    if let Some((start, end)) = batch.time_range() {
        writeln!(out, "- Time range: {start} to {end}")?;
    }
    writeln!(out)?;

    writeln!(out, "| Level | Count |")?;
    writeln!(out, "|-------|------:|")?;
    for count in batch.level_counts().iter().filter(|c| c.count > 0) {
        writeln!(out, "| {} | {} |", count.level, count.count)?;
    }
    writeln!(out)?;

    writeln!(out, "## Summary")?;
    writeln!(out)?;
    match outcome {
        SummaryOutcome::Unavailable { reason } => {
            writeln!(out, "> Summary unavailable: {reason}")
        }
        SummaryOutcome::NoFindings | SummaryOutcome::Summary { .. } => {
            writeln!(out, "{}", outcome.display_text().trim_end())
        }
    }
}

/// Wraps rendered Markdown in a standalone HTML page.
///
/// Raw HTML in the Markdown (log lines, model output) is escaped as text,
/// and single newlines become `<br />`.
fn render_html_page(source_name: &str, markdown: &str) -> Result<String, ReportError> {
    let events = Parser::new_ext(markdown, Options::ENABLE_TABLES).map(|event| match event {
        Event::SoftBreak => Event::HardBreak,
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });
    let mut body = String::new();
    html::push_html(&mut body, events);

    let mut page = String::new();
    writeln!(page, "<!DOCTYPE html>")?;
    writeln!(page, "<html lang=\"en\">")?;
    writeln!(page, "<head>")?;
    writeln!(page, "<meta charset=\"UTF-8\">")?;
    writeln!(
        page,
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">"
    )?;
    writeln!(
        page,
        "<title>Log Explanation - {}</title>",
        escape_text(source_stem(source_name))
    )?;
    writeln!(page, "<style>\n{HTML_STYLE}</style>")?;
    writeln!(page, "</head>")?;
    writeln!(page, "<body>\n{body}</body>")?;
    writeln!(page, "</html>")?;
    Ok(page)
}

fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Encodes a rendered report as a base64 `data:` URI.
///
/// # Examples
///
/// ```
/// use shared::report::{data_uri, ReportFormat};
///
/// assert_eq!(data_uri("# Hi", ReportFormat::Markdown), "data:text/markdown;base64,IyBIaQ==");
/// ```
#[must_use]
pub fn data_uri(content: &str, format: ReportFormat) -> String {
    format!(
        "data:{};base64,{}",
        format.mime_type(),
        STANDARD.encode(content.as_bytes())
    )
}
