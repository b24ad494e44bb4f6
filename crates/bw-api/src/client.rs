//! HTTP client for the remote booking API
//!
//! All business logic lives server-side; this client is a faithful
//! transport for the JSON contract. Authentication expiry is handled in
//! one place: any 401 clears the stored token and surfaces
//! `ApiError::AuthExpired`, so callers redirect to login instead of
//! retrying blind.

use std::sync::RwLock;
use std::time::Duration;

use bw_core::config::ApiConfig;
use bw_core::models::{
    AppUser, Booking, BookingStatus, CreateBookingRequest, CreateBookingResponse,
    CreateSlotRulesRequest, CustomFieldDef, LoginRequest, LoginResponse, SystemSetting,
    TimeSlotRule,
};
use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, error, info};

use crate::error::{ApiError, Result};

/// Client for the booking API.
pub struct BookingApiClient {
    client: Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl BookingApiClient {
    /// Create a new client from configuration.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ApiError::Configuration(e.to_string()))?;

        let base_url = config.base_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ApiError::Configuration("base URL must not be empty".to_string()));
        }

        info!("Booking API client initialized for: {}", base_url);

        Ok(Self {
            client,
            base_url,
            token: RwLock::new(config.token.clone()),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn with_auth(&self, request: RequestBuilder) -> RequestBuilder {
        match self.token.read().ok().and_then(|t| t.clone()) {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn clear_token(&self) {
        if let Ok(mut token) = self.token.write() {
            *token = None;
        }
    }

    /// Whether an administrative session token is currently held.
    pub fn is_authenticated(&self) -> bool {
        self.token.read().map(|t| t.is_some()).unwrap_or(false)
    }

    /// Shared response handling: the single place 401 is interpreted.
    async fn check(&self, response: Response, context: &str) -> Result<Response> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            error!("Session rejected during {}; clearing token", context);
            self.clear_token();
            return Err(ApiError::AuthExpired);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(context.to_string()));
        }
        if status == StatusCode::CONFLICT {
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::SlotUnavailable(message));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            error!("{} failed: {} - {}", context, status, message);
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, context: &str) -> Result<T> {
        debug!("GET {}", path);
        let response = self
            .with_auth(self.client.get(self.url(path)))
            .send()
            .await
            .map_err(|e| ApiError::Connection(e.to_string()))?;
        let response = self.check(response, context).await?;
        response
            .json()
            .await
            .map_err(|e| ApiError::HttpError(e.to_string()))
    }

    /// Log in to the administrative API and store the bearer token.
    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        let response = self
            .client
            .post(self.url("/api/auth/login"))
            .json(&LoginRequest {
                username: username.to_string(),
                password: password.to_string(),
            })
            .send()
            .await
            .map_err(|e| ApiError::Connection(e.to_string()))?;
        let response = self.check(response, "login").await?;
        let login: LoginResponse = response
            .json()
            .await
            .map_err(|e| ApiError::HttpError(e.to_string()))?;
        if let Ok(mut token) = self.token.write() {
            *token = Some(login.token);
        }
        info!("Logged in as {}", username);
        Ok(())
    }

    /// Availability for one date, as shown to the booking visitor.
    pub async fn availability_for_date(&self, date: NaiveDate) -> Result<Vec<TimeSlotRule>> {
        let path = format!("/api/availability?date={}", date);
        let slots: Vec<TimeSlotRule> = self.get_json(&path, "fetch availability").await?;
        info!("Fetched {} slot(s) for {}", slots.len(), date);
        Ok(slots)
    }

    /// The full administrative slot-rule list across all scopes.
    pub async fn list_slot_rules(&self) -> Result<Vec<TimeSlotRule>> {
        self.get_json("/api/admin/time-slots", "list slot rules").await
    }

    /// Create the stored rules for one logical group.
    pub async fn create_slot_rules(
        &self,
        request: &CreateSlotRulesRequest,
    ) -> Result<Vec<TimeSlotRule>> {
        debug!("Creating {} interval(s)", request.intervals.len());
        let response = self
            .with_auth(self.client.post(self.url("/api/admin/time-slots")))
            .json(request)
            .send()
            .await
            .map_err(|e| ApiError::Connection(e.to_string()))?;
        let response = self.check(response, "create slot rules").await?;
        let created: Vec<TimeSlotRule> = response
            .json()
            .await
            .map_err(|e| ApiError::HttpError(e.to_string()))?;
        info!("Created {} slot rule(s)", created.len());
        Ok(created)
    }

    /// Delete one stored slot rule.
    pub async fn delete_slot_rule(&self, id: &str) -> Result<()> {
        debug!("Deleting slot rule {}", id);
        let response = self
            .with_auth(
                self.client
                    .delete(self.url(&format!("/api/admin/time-slots/{}", id))),
            )
            .send()
            .await
            .map_err(|e| ApiError::Connection(e.to_string()))?;
        self.check(response, "delete slot rule").await?;
        Ok(())
    }

    /// Custom-field definitions for the contact form.
    pub async fn custom_fields(&self) -> Result<Vec<CustomFieldDef>> {
        self.get_json("/api/custom-fields", "fetch custom fields").await
    }

    /// Create a booking from the wizard's finalized draft.
    pub async fn create_booking(
        &self,
        request: &CreateBookingRequest,
    ) -> Result<CreateBookingResponse> {
        debug!(
            "Creating booking for {} at {}",
            request.booking_date, request.time_slot
        );
        let response = self
            .client
            .post(self.url("/api/bookings"))
            .json(request)
            .send()
            .await
            .map_err(|e| ApiError::Connection(e.to_string()))?;
        let response = self.check(response, "create booking").await?;
        let created: CreateBookingResponse = response
            .json()
            .await
            .map_err(|e| ApiError::HttpError(e.to_string()))?;
        info!("Created booking {}", created.id);
        Ok(created)
    }

    /// All bookings, for the administrative list.
    pub async fn list_bookings(&self) -> Result<Vec<Booking>> {
        self.get_json("/api/admin/bookings", "list bookings").await
    }

    /// Transition a booking's status.
    pub async fn update_booking_status(&self, id: &str, status: BookingStatus) -> Result<()> {
        let response = self
            .with_auth(
                self.client
                    .put(self.url(&format!("/api/admin/bookings/{}/status", id))),
            )
            .json(&serde_json::json!({ "status": status }))
            .send()
            .await
            .map_err(|e| ApiError::Connection(e.to_string()))?;
        self.check(response, "update booking status").await?;
        info!("Booking {} -> {}", id, status.as_str());
        Ok(())
    }

    /// Cancel a booking.
    pub async fn cancel_booking(&self, id: &str) -> Result<()> {
        let response = self
            .with_auth(
                self.client
                    .put(self.url(&format!("/api/admin/bookings/{}/cancel", id))),
            )
            .send()
            .await
            .map_err(|e| ApiError::Connection(e.to_string()))?;
        self.check(response, "cancel booking").await?;
        info!("Cancelled booking {}", id);
        Ok(())
    }

    /// Administrative user accounts.
    pub async fn list_users(&self) -> Result<Vec<AppUser>> {
        self.get_json("/api/admin/users", "list users").await
    }

    /// System configuration entries.
    pub async fn system_settings(&self) -> Result<Vec<SystemSetting>> {
        self.get_json("/api/admin/settings", "list settings").await
    }

    /// Update one system configuration entry.
    pub async fn update_system_setting(&self, key: &str, value: &str) -> Result<()> {
        let response = self
            .with_auth(
                self.client
                    .put(self.url(&format!("/api/admin/settings/{}", key))),
            )
            .json(&serde_json::json!({ "value": value }))
            .send()
            .await
            .map_err(|e| ApiError::Connection(e.to_string()))?;
        self.check(response, "update setting").await?;
        info!("Updated setting {}", key);
        Ok(())
    }
}
