//! Data models for Logsieve.
//!
//! This module contains the severity buckets and the structured event types
//! produced by log analysis.

pub mod event;
pub mod severity;

pub use event::{EventBatch, LevelCount, LogEvent};
pub use severity::{Severity, UnknownSeverity};
