//! Error types for bw-api

use thiserror::Error;

/// bw-api error type
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error("Session expired, login required")]
    AuthExpired,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Slot no longer available: {0}")]
    SlotUnavailable(String),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ApiError>;
