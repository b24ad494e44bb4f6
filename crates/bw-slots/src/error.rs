//! Error types for bw-slots

use thiserror::Error;

/// One rule the two-phase protocol failed to delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteFailure {
    pub rule_id: String,
    pub reason: String,
}

/// bw-slots error type
#[derive(Error, Debug)]
pub enum SlotError {
    #[error("Malformed slot rule: {0}")]
    MalformedRule(String),

    #[error("Slot rule not found: {0}")]
    RuleNotFound(String),

    #[error("Malformed interval string: {0}")]
    MalformedInterval(String),

    #[error("Failed to delete {} rule(s) from the group", failed.len())]
    DeleteFailed { failed: Vec<DeleteFailure> },

    #[error("Store error: {0}")]
    Store(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, SlotError>;
