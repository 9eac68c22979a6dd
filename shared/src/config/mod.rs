//! Configuration module for Logsieve.
//!
//! This module contains the policy values that drive log analysis.

pub mod analysis;

pub use analysis::{
    AnalysisConfig, ConfigError, DEFAULT_MAX_ELEVATED_LINES, MAX_ELEVATED_LINES_LIMIT,
    MILLIS_TIMESTAMP_FORMAT, SECONDS_TIMESTAMP_FORMAT,
};
