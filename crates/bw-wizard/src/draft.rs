//! The wizard's accumulated, not-yet-submitted reservation selections
//!
//! A draft lives exactly as long as one wizard instance. It is created
//! empty, mutated only by the wizard's transitions, and discarded once the
//! booking is created or the user walks away.

use std::collections::HashMap;

use bw_core::models::{CreateBookingRequest, CustomFieldDef, CustomFieldValue};
use chrono::NaiveDate;

use crate::error::{Result, WizardError};

/// Wizard-local reservation state. Never persisted independently.
#[derive(Debug, Clone, Default)]
pub struct BookingDraft {
    /// Set at the date step; required to advance
    pub selected_date: Option<NaiveDate>,
    /// `"HH:MM-HH:MM"` of the chosen slot, set at the time-slot step
    pub selected_time_slot: Option<String>,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    /// Custom-field id to submitted value
    pub custom_values: HashMap<String, String>,
}

impl BookingDraft {
    /// Validate the contact step against the active field definitions.
    /// Returns the labels of everything missing so they can be surfaced
    /// in place, field by field.
    pub fn validate_contact(&self, fields: &[CustomFieldDef]) -> Result<()> {
        let mut missing = Vec::new();
        if self.customer_name.trim().is_empty() {
            missing.push("name".to_string());
        }
        if self.customer_email.trim().is_empty() {
            missing.push("email".to_string());
        }
        for field in fields.iter().filter(|f| f.is_active && f.required) {
            let value = self.custom_values.get(&field.id);
            if value.map(|v| v.trim().is_empty()).unwrap_or(true) {
                missing.push(field.label.clone());
            }
        }
        if !missing.is_empty() {
            return Err(WizardError::MissingFields(missing));
        }
        if !self.customer_email.contains('@') {
            return Err(WizardError::InvalidEmail(self.customer_email.clone()));
        }
        Ok(())
    }

    /// Compose the booking-creation request.
    ///
    /// The wire `timeSlot` value is only the start time of the selected
    /// interval (the part before the first `-`): the server re-resolves the
    /// slot from date + start time and re-validates availability.
    pub fn to_request(&self, fields: &[CustomFieldDef]) -> Result<CreateBookingRequest> {
        let booking_date = self.selected_date.ok_or(WizardError::InvalidTransition {
            state: "no date selected",
            action: "submit",
        })?;
        let interval = self
            .selected_time_slot
            .as_deref()
            .ok_or(WizardError::InvalidTransition {
                state: "no time slot selected",
                action: "submit",
            })?;
        let start_time = interval.split_once('-').map(|(s, _)| s).unwrap_or(interval);

        let custom_fields = fields
            .iter()
            .filter(|f| f.is_active)
            .filter_map(|f| {
                self.custom_values.get(&f.id).map(|value| CustomFieldValue {
                    field_id: f.id.clone(),
                    field_name: f.name.clone(),
                    value: value.clone(),
                })
            })
            .collect();

        Ok(CreateBookingRequest {
            booking_date,
            time_slot: start_time.to_string(),
            customer_name: self.customer_name.clone(),
            customer_email: self.customer_email.clone(),
            customer_phone: self.customer_phone.clone(),
            custom_fields,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bw_core::models::CustomFieldType;

    fn field(id: &str, label: &str, required: bool) -> CustomFieldDef {
        CustomFieldDef {
            id: id.to_string(),
            name: format!("field_{}", id),
            label: label.to_string(),
            field_type: CustomFieldType::Text,
            required,
            options: None,
            order: 0,
            is_active: true,
        }
    }

    fn draft() -> BookingDraft {
        BookingDraft {
            selected_date: Some("2030-06-01".parse().unwrap()),
            selected_time_slot: Some("09:00-10:00".to_string()),
            customer_name: "Ada".to_string(),
            customer_email: "ada@example.com".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_required_fields_reported_by_label() {
        let mut d = draft();
        d.customer_name = String::new();
        let fields = vec![field("f1", "Company", true), field("f2", "Notes", false)];

        match d.validate_contact(&fields).unwrap_err() {
            WizardError::MissingFields(missing) => {
                assert_eq!(missing, vec!["name", "Company"]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_inactive_required_field_is_not_enforced() {
        let d = draft();
        let mut f = field("f1", "Company", true);
        f.is_active = false;
        assert!(d.validate_contact(&[f]).is_ok());
    }

    #[test]
    fn test_request_uses_interval_start_as_wire_value() {
        let d = draft();
        let request = d.to_request(&[]).unwrap();
        assert_eq!(request.time_slot, "09:00");
        assert_eq!(request.booking_date.to_string(), "2030-06-01");
    }

    #[test]
    fn test_request_carries_field_name_and_value() {
        let mut d = draft();
        d.custom_values.insert("f1".to_string(), "Acme".to_string());
        let fields = vec![field("f1", "Company", true)];

        let request = d.to_request(&fields).unwrap();
        assert_eq!(request.custom_fields.len(), 1);
        assert_eq!(request.custom_fields[0].field_name, "field_f1");
        assert_eq!(request.custom_fields[0].value, "Acme");
    }
}
