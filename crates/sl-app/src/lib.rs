//! Shared application service layer for segloss.
//!
//! Provides the per-file analysis surface consumed by frontends: validate
//! and compute one test file, or build the combined segregated-loss report
//! from a no-load/load file pair, plus pure text rendering of the results.

pub mod analysis_service;
pub mod config;
pub mod error;
pub mod format;

// Re-export key types for convenience
pub use analysis_service::{
    LoadAnalysis, LossReport, NoLoadAnalysis, Outcome, ReportRequest, analyze_load,
    analyze_no_load, build_report,
};
pub use config::{load_policy, load_rating, parse_split_method, save_report_json};
pub use error::{AppError, AppResult};
pub use format::{
    format_load_summary, format_no_load_summary, format_summary_rows,
    format_validation_messages,
};
