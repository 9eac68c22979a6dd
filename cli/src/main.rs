//! Logsieve CLI
//!
//! Command-line interface for analyzing log files locally with the Logsieve engine.
//!
//! # Usage
//!
//! ```bash
//! logsieve --help
//! logsieve analyze app.log --max-elevated-lines 50
//! logsieve timeline app.log --json
//! logsieve summarize app.log
//! logsieve report app.log --output summary.md
//! logsieve report app.log --format html
//! ```

#![deny(unsafe_code)]

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use shared::aggregator::analyze_bytes;
use shared::chrono::Utc;
use shared::config::{AnalysisConfig, DEFAULT_MAX_ELEVATED_LINES};
use shared::models::{EventBatch, LevelCount, LogEvent};
use shared::report::{render_report, report_file_name, ReportError, ReportFormat};
use shared::summary::{summarize_batch, GeminiSummarizer, Summarizer, SummaryOutcome};
use shared::timeline::Timeline;
use std::fmt::{self, Write};
use std::path::{Path, PathBuf};

/// Logsieve CLI - log analysis and summaries from the command line
#[derive(Parser)]
#[command(name = "logsieve")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Maximum number of elevated lines sent for summary
    #[arg(
        short,
        long,
        global = true,
        env = "LOGSIEVE_MAX_ELEVATED_LINES",
        default_value_t = DEFAULT_MAX_ELEVATED_LINES
    )]
    max_elevated_lines: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify every line and show level counts and elevated lines
    Analyze {
        /// Log file to analyze
        file: PathBuf,
        /// Print the full analysis as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show timestamped events grouped by severity
    Timeline {
        /// Log file to analyze
        file: PathBuf,
        /// Print the timeline as JSON
        #[arg(long)]
        json: bool,
    },
    /// Summarize the elevated lines with the configured AI service
    Summarize {
        /// Log file to analyze
        file: PathBuf,
    },
    /// Write a Markdown or HTML report with level counts and the summary
    Report {
        /// Log file to analyze
        file: PathBuf,
        /// Report format ("markdown" or "html")
        #[arg(long, default_value = "markdown", value_parser = parse_format)]
        format: ReportFormat,
        /// Output path (defaults to "<name>_log_summary.<ext>" in the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Analysis as printed by `analyze --json`.
#[derive(Serialize)]
struct AnalysisOutput<'a> {
    events: &'a [LogEvent],
    elevated_raw_lines: &'a [String],
    level_counts: Vec<LevelCount>,
    total_events: usize,
}

fn parse_format(s: &str) -> Result<ReportFormat, ReportError> {
    s.parse()
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = AnalysisConfig::default().with_max_elevated_lines(cli.max_elevated_lines);
    config.validate_config()?;

    match cli.command {
        Commands::Analyze { file, json } => {
            let batch = load_batch(&file, &config)?;
            if json {
                println!("{}", analysis_json(&batch)?);
            } else {
                let mut text = String::new();
                write_analysis(&mut text, &batch)?;
                print!("{text}");
            }
        }
        Commands::Timeline { file, json } => {
            let timeline = Timeline::from_batch(&load_batch(&file, &config)?);
            if json {
                println!("{}", serde_json::to_string_pretty(&timeline)?);
            } else {
                let mut text = String::new();
                write_timeline(&mut text, &timeline)?;
                print!("{text}");
            }
        }
        Commands::Summarize { file } => {
            let batch = load_batch(&file, &config)?;
            let text = summarize(&batch, &GeminiSummarizer::from_env())?;
            println!("{text}");
        }
        Commands::Report {
            file,
            format,
            output,
        } => {
            let batch = load_batch(&file, &config)?;
            let written = write_report(
                &file,
                &batch,
                format,
                output,
                &GeminiSummarizer::from_env(),
            )?;
            println!("Report written to {}", written.display());
        }
    }

    Ok(())
}

/// Reads and analyzes a log file. Content must be UTF-8.
fn load_batch(path: &Path, config: &AnalysisConfig) -> Result<EventBatch> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let batch = analyze_bytes(&bytes, config)
        .with_context(|| format!("Cannot analyze {}", path.display()))?;

    tracing::debug!(
        file = %path.display(),
        events = batch.len(),
        elevated = batch.elevated_raw_lines.len(),
        "Analyzed log file"
    );
    Ok(batch)
}

fn analysis_json(batch: &EventBatch) -> Result<String> {
    let output = AnalysisOutput {
        events: &batch.events,
        elevated_raw_lines: &batch.elevated_raw_lines,
        level_counts: batch.level_counts(),
        total_events: batch.len(),
    };
    Ok(serde_json::to_string_pretty(&output)?)
}

fn write_analysis(out: &mut impl Write, batch: &EventBatch) -> fmt::Result {
    writeln!(
        out,
        "Events: {} ({} elevated lines selected)",
        batch.len(),
        batch.elevated_raw_lines.len()
    )?;
    if let Some((start, end)) = batch.time_range() {
        writeln!(out, "Time range: {start} to {end}")?;
    }

    writeln!(out, "\n{:<10}{:>8}", "LEVEL", "COUNT")?;
    for count in batch.level_counts() {
        writeln!(out, "{:<10}{:>8}", count.level, count.count)?;
    }

    if batch.has_findings() {
        writeln!(out, "\nElevated lines:")?;
        for line in &batch.elevated_raw_lines {
            writeln!(out, "  {line}")?;
        }
        Ok(())
    } else {
        writeln!(out, "\n{}", SummaryOutcome::NO_FINDINGS_MESSAGE)
    }
}

fn write_timeline(out: &mut impl Write, timeline: &Timeline) -> fmt::Result {
    let (Some(start), Some(end)) = (timeline.start, timeline.end) else {
        return writeln!(out, "Not enough timestamped events to plot a timeline.");
    };

    writeln!(
        out,
        "Timeline {start} to {end} ({} events, {} without timestamp)",
        timeline.point_count(),
        timeline.unplotted
    )?;
    for series in &timeline.series {
        writeln!(out, "\n{} ({})", series.level, series.points.len())?;
        for point in &series.points {
            writeln!(out, "  {}  {}", point.timestamp, point.message)?;
        }
    }
    Ok(())
}

/// Returns the summary text, failing when the summarizer could not produce one.
fn summarize(batch: &EventBatch, summarizer: &dyn Summarizer) -> Result<String> {
    match summarize_batch(batch, summarizer) {
        SummaryOutcome::Unavailable { reason } => bail!("Summary unavailable: {reason}"),
        outcome => Ok(outcome.display_text().to_string()),
    }
}

/// Renders and writes the report; returns the path written.
fn write_report(
    source: &Path,
    batch: &EventBatch,
    format: ReportFormat,
    output: Option<PathBuf>,
    summarizer: &dyn Summarizer,
) -> Result<PathBuf> {
    let source_name = source
        .file_name()
        .map_or_else(|| source.display().to_string(), |name| name.to_string_lossy().into_owned());

    let outcome = summarize_batch(batch, summarizer);
    if let SummaryOutcome::Unavailable { reason } = &outcome {
        tracing::warn!(%reason, "Writing report without summary");
    }

    let content = render_report(&source_name, batch, &outcome, Utc::now(), format)?;
    let path = output.unwrap_or_else(|| PathBuf::from(report_file_name(&source_name, format)));
    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;

    Ok(path)
}
