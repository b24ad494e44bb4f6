//! Error types for bw-core

use thiserror::Error;

/// Main error type for bw-core
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid model field: {0}")]
    InvalidField(String),
}

/// Result type alias for bw-core
pub type Result<T> = std::result::Result<T, Error>;
