//! Error types for bw-dashboard

use thiserror::Error;

/// bw-dashboard error type
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, DashboardError>;
