//! bw-api: HTTP client for the remote booking API
//!
//! One reqwest method per collaborator operation, plus the trait adapters
//! that plug the client into bw-slots (rule persistence) and bw-wizard
//! (availability and booking submission).
//!
//! ## Features
//!
//! - Public surface: availability lookup, custom fields, booking creation
//! - Administrative surface: slot-rule CRUD, bookings, users, settings
//! - Centralized 401 handling: the stored token is invalidated once and the
//!   caller is told to re-authenticate
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bw_api::BookingApiClient;
//!
//! let client = BookingApiClient::new(&config.api)?;
//! let slots = client.availability_for_date(date).await?;
//! ```

pub mod adapters;
pub mod client;
pub mod error;

pub use client::BookingApiClient;
pub use error::{ApiError, Result};
