//! Trait adapters wiring the HTTP client into the logic crates
//!
//! bw-slots and bw-wizard only see their own seam traits; the mappings here
//! translate transport errors into the variants those crates act on
//! (not-found tolerance for the two-phase editor, the stale-slot signal for
//! the wizard).

use async_trait::async_trait;
use bw_core::models::{
    CreateBookingRequest, CreateBookingResponse, CreateSlotRulesRequest, CustomFieldDef,
    TimeSlotRule,
};
use bw_slots::{SlotError, SlotRuleStore};
use bw_wizard::{BookingBackend, WizardError};
use chrono::NaiveDate;

use crate::client::BookingApiClient;
use crate::error::ApiError;

fn to_slot_error(error: ApiError) -> SlotError {
    match error {
        ApiError::NotFound(what) => SlotError::RuleNotFound(what),
        other => SlotError::Store(other.to_string()),
    }
}

fn to_wizard_error(error: ApiError) -> WizardError {
    match error {
        ApiError::SlotUnavailable(_) => WizardError::SlotUnavailable,
        other => WizardError::Backend(other.to_string()),
    }
}

#[async_trait]
impl SlotRuleStore for BookingApiClient {
    async fn create_rules(
        &self,
        request: CreateSlotRulesRequest,
    ) -> bw_slots::Result<Vec<TimeSlotRule>> {
        self.create_slot_rules(&request).await.map_err(to_slot_error)
    }

    async fn delete_rule(&self, id: &str) -> bw_slots::Result<()> {
        self.delete_slot_rule(id).await.map_err(|e| match e {
            ApiError::NotFound(_) => SlotError::RuleNotFound(id.to_string()),
            other => to_slot_error(other),
        })
    }
}

#[async_trait]
impl BookingBackend for BookingApiClient {
    async fn availability_for_date(&self, date: NaiveDate) -> bw_wizard::Result<Vec<TimeSlotRule>> {
        BookingApiClient::availability_for_date(self, date)
            .await
            .map_err(to_wizard_error)
    }

    async fn custom_fields(&self) -> bw_wizard::Result<Vec<CustomFieldDef>> {
        BookingApiClient::custom_fields(self).await.map_err(to_wizard_error)
    }

    async fn create_booking(
        &self,
        request: CreateBookingRequest,
    ) -> bw_wizard::Result<CreateBookingResponse> {
        BookingApiClient::create_booking(self, &request)
            .await
            .map_err(to_wizard_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_rule_not_found() {
        let mapped = to_slot_error(ApiError::NotFound("delete slot rule".to_string()));
        assert!(matches!(mapped, SlotError::RuleNotFound(_)));

        let mapped = to_slot_error(ApiError::AuthExpired);
        assert!(matches!(mapped, SlotError::Store(_)));
    }

    #[test]
    fn test_conflict_maps_to_slot_unavailable() {
        let mapped = to_wizard_error(ApiError::SlotUnavailable("full".to_string()));
        assert!(matches!(mapped, WizardError::SlotUnavailable));

        let mapped = to_wizard_error(ApiError::Connection("refused".to_string()));
        assert!(matches!(mapped, WizardError::Backend(_)));
    }
}
