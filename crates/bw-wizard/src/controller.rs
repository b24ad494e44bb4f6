//! Booking wizard state machine
//!
//! One wizard instance walks a visitor through date, time slot, and contact
//! details, then submits a single booking request. The step sequence is an
//! explicit enum so illegal combinations (submitting while still picking a
//! date, say) cannot be represented, and every transition goes through one
//! method with its guard.

use std::sync::Arc;

use async_trait::async_trait;
use bw_core::models::{
    CreateBookingRequest, CreateBookingResponse, CustomFieldDef, TimeSlotRule,
};
use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::draft::BookingDraft;
use crate::error::{Result, WizardError};

/// Collaborator seam for everything the wizard needs from the remote API.
/// Implemented over HTTP by bw-api and by in-memory mocks in tests.
#[async_trait]
pub trait BookingBackend: Send + Sync {
    /// Availability for one calendar date.
    async fn availability_for_date(&self, date: NaiveDate) -> Result<Vec<TimeSlotRule>>;

    /// Active custom-field definitions for the contact step.
    async fn custom_fields(&self) -> Result<Vec<CustomFieldDef>>;

    /// Create the booking. `WizardError::SlotUnavailable` signals that the
    /// slot filled between selection and submission.
    async fn create_booking(&self, request: CreateBookingRequest) -> Result<CreateBookingResponse>;
}

/// Wizard step. `Completed` and `Failed` are terminal for the instance,
/// except that `Failed` allows a retry of the submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardState {
    SelectingDate,
    SelectingTimeSlot,
    EnteringContactInfo,
    Submitting,
    Completed { booking_id: String },
    Failed { message: String },
}

impl WizardState {
    pub fn name(&self) -> &'static str {
        match self {
            WizardState::SelectingDate => "selecting_date",
            WizardState::SelectingTimeSlot => "selecting_time_slot",
            WizardState::EnteringContactInfo => "entering_contact_info",
            WizardState::Submitting => "submitting",
            WizardState::Completed { .. } => "completed",
            WizardState::Failed { .. } => "failed",
        }
    }
}

/// Outcome of a submission attempt. Local validation failures are returned
/// as errors instead and never leave `EnteringContactInfo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Booking created; the draft has been discarded
    Completed { booking_id: String },
    /// The slot filled in the meantime; the wizard is back at the time-slot
    /// step and availability must be re-fetched
    SlotTaken,
    /// Submission failed; the draft is retained for a retry
    Failed { message: String },
}

/// The booking wizard controller.
///
/// Owns its `BookingDraft` exclusively. Transitions are serialized through
/// `&mut self`; availability responses carry a generation token and are
/// discarded when the wizard has since navigated elsewhere.
pub struct BookingWizard {
    backend: Arc<dyn BookingBackend>,
    state: WizardState,
    draft: BookingDraft,
    fields: Vec<CustomFieldDef>,
    availability: Option<Vec<TimeSlotRule>>,
    generation: u64,
}

impl BookingWizard {
    /// Create a fresh wizard at the date step with an empty draft.
    pub fn new(backend: Arc<dyn BookingBackend>) -> Self {
        Self {
            backend,
            state: WizardState::SelectingDate,
            draft: BookingDraft::default(),
            fields: Vec::new(),
            availability: None,
            generation: 0,
        }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    /// Loaded custom-field definitions, active only, in display order.
    pub fn fields(&self) -> &[CustomFieldDef] {
        &self.fields
    }

    /// Token identifying the wizard's current position; availability
    /// fetched under an older token is stale and must be dropped.
    pub fn availability_token(&self) -> u64 {
        self.generation
    }

    fn invalid(&self, action: &'static str) -> WizardError {
        WizardError::InvalidTransition {
            state: self.state.name(),
            action,
        }
    }

    /// Pick a date. Dates strictly before today (time of day ignored) are
    /// rejected and the state does not advance.
    pub fn choose_date(&mut self, date: NaiveDate) -> Result<()> {
        self.choose_date_on(date, chrono::Local::now().date_naive())
    }

    /// `choose_date` against an explicit "today", so the guard is testable
    /// without the wall clock.
    pub fn choose_date_on(&mut self, date: NaiveDate, today: NaiveDate) -> Result<()> {
        if self.state != WizardState::SelectingDate {
            return Err(self.invalid("choose_date"));
        }
        if date < today {
            warn!("Rejected past booking date {}", date);
            return Err(WizardError::DateInPast(date));
        }
        self.draft.selected_date = Some(date);
        self.availability = None;
        self.generation += 1;
        self.state = WizardState::SelectingTimeSlot;
        debug!("Date chosen: {}", date);
        Ok(())
    }

    /// Advance from the date step re-using the retained date after a back
    /// navigation, without a new pick.
    pub fn resume(&mut self) -> Result<()> {
        if self.state != WizardState::SelectingDate {
            return Err(self.invalid("resume"));
        }
        if self.draft.selected_date.is_none() {
            return Err(self.invalid("resume"));
        }
        self.availability = None;
        self.generation += 1;
        self.state = WizardState::SelectingTimeSlot;
        Ok(())
    }

    /// Fetch availability for the selected date and apply it, unless the
    /// wizard navigated away while the request was in flight.
    pub async fn refresh_availability(&mut self) -> Result<()> {
        if self.state != WizardState::SelectingTimeSlot {
            return Err(self.invalid("refresh_availability"));
        }
        let date = self.draft.selected_date.ok_or_else(|| self.invalid("refresh_availability"))?;
        let token = self.generation;
        let backend = Arc::clone(&self.backend);
        let slots = backend.availability_for_date(date).await?;
        self.apply_availability(token, slots);
        Ok(())
    }

    /// Apply a fetched availability response. Returns false (and changes
    /// nothing) when the response is stale: fetched under a generation the
    /// wizard has since moved past.
    pub fn apply_availability(&mut self, token: u64, slots: Vec<TimeSlotRule>) -> bool {
        if token != self.generation || self.state != WizardState::SelectingTimeSlot {
            debug!("Discarding stale availability response (token {})", token);
            return false;
        }
        debug!("Loaded {} slot(s) for the selected date", slots.len());
        self.availability = Some(slots);
        true
    }

    /// Load the custom-field definitions for the contact step, keeping only
    /// active fields, in display order.
    pub async fn load_custom_fields(&mut self) -> Result<()> {
        let backend = Arc::clone(&self.backend);
        let mut fields: Vec<CustomFieldDef> = backend
            .custom_fields()
            .await?
            .into_iter()
            .filter(|f| f.is_active)
            .collect();
        fields.sort_by_key(|f| f.order);
        self.fields = fields;
        Ok(())
    }

    /// Slots the visitor may pick: loaded, active, and not yet full.
    pub fn selectable_slots(&self) -> Vec<&TimeSlotRule> {
        self.availability
            .as_deref()
            .unwrap_or(&[])
            .iter()
            .filter(|s| s.is_active && !s.is_full())
            .collect()
    }

    /// Pick a slot by its `"HH:MM-HH:MM"` interval. A full slot never
    /// advances the wizard, and nothing is selectable before availability
    /// has loaded.
    pub fn choose_slot(&mut self, interval: &str) -> Result<()> {
        if self.state != WizardState::SelectingTimeSlot {
            return Err(self.invalid("choose_slot"));
        }
        let slots = self
            .availability
            .as_deref()
            .ok_or(WizardError::AvailabilityNotLoaded)?;
        let slot = slots
            .iter()
            .find(|s| s.interval() == interval)
            .ok_or_else(|| WizardError::SlotNotAvailable(interval.to_string()))?;
        if slot.is_full() {
            return Err(WizardError::SlotFull(interval.to_string()));
        }
        self.draft.selected_time_slot = Some(slot.interval());
        self.generation += 1;
        self.state = WizardState::EnteringContactInfo;
        debug!("Slot chosen: {}", interval);
        Ok(())
    }

    /// Navigate one step back. The date survives a return to the date step
    /// so it can be re-picked quickly; backing out of the contact step keeps
    /// both date and slot.
    pub fn back(&mut self) -> Result<()> {
        match self.state {
            WizardState::SelectingTimeSlot => {
                self.draft.selected_time_slot = None;
                self.availability = None;
                self.generation += 1;
                self.state = WizardState::SelectingDate;
                Ok(())
            }
            WizardState::EnteringContactInfo => {
                self.availability = None;
                self.generation += 1;
                self.state = WizardState::SelectingTimeSlot;
                Ok(())
            }
            _ => Err(self.invalid("back")),
        }
    }

    /// Record the contact details on the draft.
    pub fn set_contact(
        &mut self,
        name: impl Into<String>,
        email: impl Into<String>,
        phone: Option<String>,
    ) -> Result<()> {
        if self.state != WizardState::EnteringContactInfo {
            return Err(self.invalid("set_contact"));
        }
        self.draft.customer_name = name.into();
        self.draft.customer_email = email.into();
        self.draft.customer_phone = phone;
        Ok(())
    }

    /// Record one custom-field answer on the draft.
    pub fn set_custom_value(&mut self, field_id: impl Into<String>, value: impl Into<String>) -> Result<()> {
        if self.state != WizardState::EnteringContactInfo {
            return Err(self.invalid("set_custom_value"));
        }
        self.draft.custom_values.insert(field_id.into(), value.into());
        Ok(())
    }

    /// Submit the draft.
    ///
    /// Local validation failures return an error and stay in
    /// `EnteringContactInfo`. Backend outcomes are reported through
    /// `SubmitOutcome`: success discards the draft; a slot that filled in
    /// the meantime sends the wizard back to the time-slot step with
    /// availability cleared; any other failure moves to `Failed` with the
    /// draft retained for `retry`.
    pub async fn submit(&mut self) -> Result<SubmitOutcome> {
        if self.state != WizardState::EnteringContactInfo {
            return Err(self.invalid("submit"));
        }
        self.draft.validate_contact(&self.fields)?;
        let request = self.draft.to_request(&self.fields)?;

        self.state = WizardState::Submitting;
        let backend = Arc::clone(&self.backend);
        match backend.create_booking(request).await {
            Ok(response) => {
                info!("Booking created: {}", response.id);
                self.draft = BookingDraft::default();
                self.availability = None;
                self.state = WizardState::Completed {
                    booking_id: response.id.clone(),
                };
                Ok(SubmitOutcome::Completed {
                    booking_id: response.id,
                })
            }
            Err(WizardError::SlotUnavailable) => {
                warn!("Selected slot filled before submission; re-selecting");
                self.draft.selected_time_slot = None;
                self.availability = None;
                self.generation += 1;
                self.state = WizardState::SelectingTimeSlot;
                Ok(SubmitOutcome::SlotTaken)
            }
            Err(e) => {
                warn!("Booking submission failed: {}", e);
                let message = e.to_string();
                self.state = WizardState::Failed {
                    message: message.clone(),
                };
                Ok(SubmitOutcome::Failed { message })
            }
        }
    }

    /// Re-attempt a failed submission without walking back through the
    /// earlier steps. Valid only in `Failed`; the retained draft is re-used.
    pub async fn retry(&mut self) -> Result<SubmitOutcome> {
        if !matches!(self.state, WizardState::Failed { .. }) {
            return Err(self.invalid("retry"));
        }
        self.state = WizardState::EnteringContactInfo;
        self.submit().await
    }
}
