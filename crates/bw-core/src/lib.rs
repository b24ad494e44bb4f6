//! bw-core: Bookwise Core Library
//!
//! Shared wire models, configuration, and error types for the bookwise
//! booking-client workspace. All business logic lives behind the remote
//! booking API; this crate only describes its contract.

pub mod config;
pub mod error;
pub mod models;

pub use config::{ApiConfig, Config, DashboardConfig};
pub use error::{Error, Result};
pub use models::{
    AppUser, Booking, BookingStatus, CreateBookingRequest, CreateBookingResponse,
    CreateSlotRulesRequest, CustomFieldDef, CustomFieldType, CustomFieldValue, LoginRequest,
    LoginResponse, RecurrenceScope, SlotInterval, SystemSetting, TimeSlotRule,
};
