//! Wire models for the booking API
//!
//! All types mirror the collaborator's JSON contract (camelCase fields).
//! Dates travel as ISO `YYYY-MM-DD`, times of day as `HH:MM` strings.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A single bookable interval as returned by the availability API.
///
/// One rule describes one time range and its recurrence: either a specific
/// calendar date, weekend-only recurrence, or every day. The server owns
/// capacity accounting; the client only reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlotRule {
    /// Unique identifier per rule instance (not per logical group)
    pub id: String,
    /// Start of the interval, wall-clock `HH:MM`
    pub start_time: String,
    /// End of the interval, wall-clock `HH:MM`
    pub end_time: String,
    /// Weekday 0-6 for weekday recurrence; meaningless when `specific_date` is set
    #[serde(default)]
    pub day_of_week: Option<u8>,
    /// True iff the rule recurs on Saturday/Sunday only
    #[serde(default)]
    pub is_weekend: bool,
    /// When present the rule applies to this date only
    #[serde(default)]
    pub specific_date: Option<NaiveDate>,
    /// Capacity for the slot
    pub max_bookings: u32,
    /// Bookings already taken; maintained server-side
    #[serde(default)]
    pub current_bookings: u32,
    /// Inactive rules are hidden from the enabled views but kept for history
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl TimeSlotRule {
    /// The display/selection form of the interval: `"HH:MM-HH:MM"`.
    pub fn interval(&self) -> String {
        format!("{}-{}", self.start_time, self.end_time)
    }

    /// A slot is unavailable once its capacity is reached.
    pub fn is_full(&self) -> bool {
        self.current_bookings >= self.max_bookings
    }

    /// Check the rule is well-formed: parseable `HH:MM` times, start before
    /// end, positive capacity. Callers are expected to validate collaborator
    /// responses before deriving groups from them.
    pub fn validate(&self) -> Result<()> {
        let start = parse_hhmm(&self.start_time)
            .ok_or_else(|| Error::InvalidField(format!("startTime `{}`", self.start_time)))?;
        let end = parse_hhmm(&self.end_time)
            .ok_or_else(|| Error::InvalidField(format!("endTime `{}`", self.end_time)))?;
        if start >= end {
            return Err(Error::InvalidField(format!(
                "interval `{}` does not start before it ends",
                self.interval()
            )));
        }
        if self.max_bookings == 0 {
            return Err(Error::InvalidField(format!(
                "maxBookings must be positive (rule {})",
                self.id
            )));
        }
        Ok(())
    }
}

/// Parse a wall-clock `HH:MM` string.
pub fn parse_hhmm(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M").ok()
}

/// Recurrence classification of a slot rule. Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecurrenceScope {
    /// Applies to one calendar date only (highest precedence)
    #[serde(rename = "specific")]
    SpecificDate,
    /// Recurs on Saturday/Sunday
    #[serde(rename = "weekend")]
    Weekend,
    /// Recurs every day
    #[serde(rename = "all")]
    AllDays,
}

impl RecurrenceScope {
    /// Classify a rule. A set `specificDate` wins over the weekend flag.
    pub fn of(rule: &TimeSlotRule) -> Self {
        if rule.specific_date.is_some() {
            RecurrenceScope::SpecificDate
        } else if rule.is_weekend {
            RecurrenceScope::Weekend
        } else {
            RecurrenceScope::AllDays
        }
    }

    /// Stable name used in grouping keys and filter queries.
    pub fn key_name(&self) -> &'static str {
        match self {
            RecurrenceScope::SpecificDate => "specific",
            RecurrenceScope::Weekend => "weekend",
            RecurrenceScope::AllDays => "allDays",
        }
    }
}

/// One time range inside a slot-rule create request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotInterval {
    pub start_time: String,
    pub end_time: String,
}

impl SlotInterval {
    /// Parse `"HH:MM-HH:MM"`, splitting on the first `-`.
    pub fn from_interval_string(value: &str) -> Option<Self> {
        let (start, end) = value.split_once('-')?;
        Some(Self {
            start_time: start.to_string(),
            end_time: end.to_string(),
        })
    }
}

/// Request body for creating slot rules. The server expands one request
/// into one stored rule per interval (and per day for weekday recurrence).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSlotRulesRequest {
    pub scope: RecurrenceScope,
    pub intervals: Vec<SlotInterval>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specific_date: Option<NaiveDate>,
    pub max_bookings: u32,
    pub is_active: bool,
}

/// Administrator-defined contact-form field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomFieldDef {
    pub id: String,
    /// Machine name, used as the submission key
    pub name: String,
    /// Human-facing label
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: CustomFieldType,
    #[serde(default)]
    pub required: bool,
    /// Choices for `select` fields
    #[serde(default)]
    pub options: Option<Vec<String>>,
    /// Display order within the form
    #[serde(default)]
    pub order: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Supported custom-field input types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomFieldType {
    Text,
    Textarea,
    Email,
    Phone,
    Number,
    Select,
    Checkbox,
}

/// One submitted custom-field answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomFieldValue {
    pub field_id: String,
    pub field_name: String,
    pub value: String,
}

/// Request body for creating a booking.
///
/// `time_slot` carries only the start time of the chosen interval; the
/// server re-resolves (and re-validates) the slot from `booking_date` +
/// start time, since availability may have changed since selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub booking_date: NaiveDate,
    pub time_slot: String,
    pub customer_name: String,
    pub customer_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub custom_fields: Vec<CustomFieldValue>,
}

/// Response from booking creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingResponse {
    pub id: String,
}

/// Booking lifecycle status, owned server-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }
}

/// A stored booking as listed by the administrative API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub booking_date: NaiveDate,
    pub time_slot: String,
    pub customer_name: String,
    pub customer_email: String,
    #[serde(default)]
    pub customer_phone: Option<String>,
    pub status: BookingStatus,
    #[serde(default)]
    pub custom_fields: Vec<CustomFieldValue>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Administrative user account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppUser {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// One key/value system-configuration entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemSetting {
    pub key: String,
    pub value: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Login request for the administrative API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response carrying the bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(id: &str) -> TimeSlotRule {
        TimeSlotRule {
            id: id.to_string(),
            start_time: "08:00".to_string(),
            end_time: "09:00".to_string(),
            day_of_week: None,
            is_weekend: false,
            specific_date: None,
            max_bookings: 2,
            current_bookings: 0,
            is_active: true,
        }
    }

    #[test]
    fn test_scope_precedence() {
        // A specific date wins even when the weekend flag is also set
        let mut r = rule("a");
        r.is_weekend = true;
        r.specific_date = Some(NaiveDate::from_ymd_opt(2024, 12, 25).unwrap());
        assert_eq!(RecurrenceScope::of(&r), RecurrenceScope::SpecificDate);

        r.specific_date = None;
        assert_eq!(RecurrenceScope::of(&r), RecurrenceScope::Weekend);

        r.is_weekend = false;
        assert_eq!(RecurrenceScope::of(&r), RecurrenceScope::AllDays);
    }

    #[test]
    fn test_is_full() {
        let mut r = rule("a");
        assert!(!r.is_full());
        r.current_bookings = 2;
        assert!(r.is_full());
    }

    #[test]
    fn test_validate_rejects_malformed() {
        let mut r = rule("a");
        r.start_time = "8am".to_string();
        assert!(r.validate().is_err());

        let mut r = rule("b");
        r.start_time = "10:00".to_string();
        r.end_time = "09:00".to_string();
        assert!(r.validate().is_err());

        let mut r = rule("c");
        r.max_bookings = 0;
        assert!(r.validate().is_err());
    }

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{
            "id": "r1",
            "startTime": "09:00",
            "endTime": "10:00",
            "isWeekend": true,
            "maxBookings": 3,
            "currentBookings": 1
        }"#;
        let r: TimeSlotRule = serde_json::from_str(json).unwrap();
        assert_eq!(r.interval(), "09:00-10:00");
        assert!(r.is_weekend);
        assert!(r.is_active);
        assert_eq!(RecurrenceScope::of(&r), RecurrenceScope::Weekend);
    }

    #[test]
    fn test_interval_string_round_trip() {
        let i = SlotInterval::from_interval_string("08:30-09:15").unwrap();
        assert_eq!(i.start_time, "08:30");
        assert_eq!(i.end_time, "09:15");
        assert!(SlotInterval::from_interval_string("0830").is_none());
    }
}
