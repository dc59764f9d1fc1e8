//! Error types for the sl-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates and
/// provides a unified interface for CLI and report-export frontends.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to read config file: {path}")]
    ConfigFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Test file error: {0}")]
    Table(String),

    #[error("Analysis error: {0}")]
    Analysis(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for sl-app operations.
pub type AppResult<T> = Result<T, AppError>;

// Conversions from backend error types
impl From<sl_table::TableError> for AppError {
    fn from(err: sl_table::TableError) -> Self {
        AppError::Table(err.to_string())
    }
}

impl From<sl_analysis::AnalysisError> for AppError {
    fn from(err: sl_analysis::AnalysisError) -> Self {
        AppError::Analysis(err.to_string())
    }
}

impl From<sl_core::SlError> for AppError {
    fn from(err: sl_core::SlError) -> Self {
        AppError::Config(err.to_string())
    }
}
