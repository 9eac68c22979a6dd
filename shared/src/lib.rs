//! Logsieve Shared Library
//!
//! This crate contains the log analysis engine used by the Logsieve API
//! server and CLI: it turns raw, heterogeneous log text into a typed,
//! time-ordered event stream and picks out the lines worth summarizing.
//!
//! # Modules
//!
//! - [`models`] - Severity levels, log events, and event batches
//! - [`parser`] - Single-line classification (tokenizer + keyword overrides)
//! - [`aggregator`] - Whole-file analysis and timestamp coercion
//! - [`config`] - Analysis policy (elevated-line cap, timestamp formats)
//! - [`summary`] - Summarizer seam and the Gemini-backed implementation
//! - [`timeline`] - Severity-grouped, time-ordered projection for plotting
//! - [`report`] - Markdown report export
//!
//! # Example
//!
//! ```
//! use shared::aggregator::analyze;
//! use shared::config::AnalysisConfig;
//! use shared::models::Severity;
//!
//! let batch = analyze(
//!     "2024-06-25 10:00:22,333 ERROR Database connection failed\nServer health check passed.",
//!     &AnalysisConfig::default(),
//! );
//!
//! assert_eq!(batch.events[0].level, Severity::Error);
//! assert_eq!(batch.events[1].level, Severity::Info);
//! assert_eq!(batch.elevated_raw_lines.len(), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod aggregator;
pub mod config;
pub mod models;
pub mod parser;
pub mod report;
pub mod summary;
pub mod timeline;

/// Re-export common dependencies for convenience.
pub use chrono;
pub use serde;
pub use serde_json;
pub use validator;
