//! Error types for bw-wizard

use chrono::NaiveDate;
use thiserror::Error;

/// bw-wizard error type
#[derive(Error, Debug)]
pub enum WizardError {
    #[error("Action `{action}` is not valid in state `{state}`")]
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },

    #[error("Date {0} is in the past")]
    DateInPast(NaiveDate),

    #[error("Slot {0} is fully booked")]
    SlotFull(String),

    #[error("Slot {0} is not in the availability list")]
    SlotNotAvailable(String),

    #[error("Availability has not been loaded for the selected date")]
    AvailabilityNotLoaded,

    #[error("Required fields missing: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Slot is no longer available")]
    SlotUnavailable,

    #[error("Backend error: {0}")]
    Backend(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, WizardError>;
