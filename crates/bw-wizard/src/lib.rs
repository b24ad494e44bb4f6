//! bw-wizard: Booking wizard state machine
//!
//! An explicit, enum-driven sequencer for the public booking flow:
//! date, time slot, contact details, submit. One wizard instance owns one
//! `BookingDraft`; a new instance is created whenever the visitor re-enters
//! the booking flow.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bw_wizard::{BookingWizard, SubmitOutcome};
//!
//! let mut wizard = BookingWizard::new(backend);
//! wizard.choose_date(date)?;
//! wizard.refresh_availability().await?;
//! wizard.choose_slot("09:00-10:00")?;
//! wizard.set_contact("Ada", "ada@example.com", None)?;
//! match wizard.submit().await? {
//!     SubmitOutcome::Completed { booking_id } => println!("booked: {booking_id}"),
//!     SubmitOutcome::SlotTaken => { /* re-fetch availability, pick again */ }
//!     SubmitOutcome::Failed { .. } => { wizard.retry().await?; }
//! }
//! ```

pub mod controller;
pub mod draft;
pub mod error;

pub use controller::{BookingBackend, BookingWizard, SubmitOutcome, WizardState};
pub use draft::BookingDraft;
pub use error::{Result, WizardError};
