//! API route definitions.
//!
//! This module organizes all HTTP routes for the Logsieve API server.

mod analyze;
mod health;

pub use analyze::{
    analyze_routes, AnalyzeError, AnalyzeRequest, AnalyzeResponse, ReportRequest, ReportResponse,
};
pub use health::health_routes;
