//! bw-dashboard: JSON surface for the administrative dashboard
//!
//! Serves the administrator's grouped slot view and booking list over HTTP.
//! Data comes through provider traits so the server is testable without the
//! remote API; groups are recomputed from each fetched snapshot rather than
//! cached.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bw_dashboard::DashboardServer;
//! use std::sync::Arc;
//!
//! let server = DashboardServer::new(config.dashboard, slots, bookings);
//! server.run().await?;
//! ```

pub mod api;
pub mod error;
pub mod server;

pub use api::{create_router, BookingProvider, DashboardState, SlotProvider};
pub use error::{DashboardError, Result};
pub use server::DashboardServer;
