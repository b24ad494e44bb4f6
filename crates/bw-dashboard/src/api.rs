//! Dashboard API types and handlers
//!
//! JSON endpoints backing the administrative dashboard. Slot groups are
//! derived fresh from the latest fetched rule snapshot on every request;
//! no grouped state is cached between requests.

use async_trait::async_trait;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use bw_core::models::{Booking, TimeSlotRule};
use bw_slots::{filter_groups, group_slots, ScopeFilter};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::error;

use crate::error::Result;

/// Slot-rule snapshot provider.
#[async_trait]
pub trait SlotProvider: Send + Sync {
    /// The full administrative rule list, fetched fresh.
    async fn slot_rules(&self) -> Result<Vec<TimeSlotRule>>;
}

/// Booking list provider.
#[async_trait]
pub trait BookingProvider: Send + Sync {
    /// All bookings, newest first as the collaborator returns them.
    async fn bookings(&self) -> Result<Vec<Booking>>;
}

/// Dashboard state shared across handlers
pub struct DashboardState {
    pub slots: Arc<dyn SlotProvider + Send + Sync>,
    pub bookings: Arc<dyn BookingProvider + Send + Sync>,
}

impl Clone for DashboardState {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            bookings: self.bookings.clone(),
        }
    }
}

impl DashboardState {
    pub fn new(
        slots: Arc<dyn SlotProvider + Send + Sync>,
        bookings: Arc<dyn BookingProvider + Send + Sync>,
    ) -> Self {
        Self { slots, bookings }
    }
}

/// Query parameters for the group list
#[derive(Debug, Deserialize)]
pub struct GroupQuery {
    /// Scope view: `all`, `specific`, `weekend`, or `allDays`
    pub scope: Option<String>,
}

/// Query parameters for the booking list
#[derive(Debug, Deserialize)]
pub struct BookingQuery {
    /// Filter by status name
    pub status: Option<String>,
    /// Limit results
    pub limit: Option<usize>,
}

/// Create the dashboard router
pub fn create_router(state: DashboardState) -> Router {
    Router::new()
        .route("/api/groups", get(list_groups))
        .route("/api/bookings", get(list_bookings))
        .route("/api/health", get(health_check))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any))
        .with_state(Arc::new(state))
}

/// List slot groups, optionally filtered to one scope view
async fn list_groups(
    State(state): State<Arc<DashboardState>>,
    Query(query): Query<GroupQuery>,
) -> impl IntoResponse {
    let filter = match query.scope.as_deref() {
        None => ScopeFilter::All,
        Some(value) => match ScopeFilter::parse(value) {
            Some(filter) => filter,
            None => {
                return (
                    StatusCode::BAD_REQUEST,
                    format!("Unknown scope view: {}", value),
                )
                    .into_response();
            }
        },
    };

    let rules = match state.slots.slot_rules().await {
        Ok(rules) => rules,
        Err(e) => {
            error!("Failed to fetch slot rules: {}", e);
            return (StatusCode::BAD_GATEWAY, e.to_string()).into_response();
        }
    };

    match group_slots(&rules) {
        Ok(groups) => {
            let filtered: Vec<_> = filter_groups(&groups, filter)
                .into_iter()
                .cloned()
                .collect();
            Json(filtered).into_response()
        }
        Err(e) => {
            error!("Rejected malformed rule snapshot: {}", e);
            (StatusCode::BAD_GATEWAY, e.to_string()).into_response()
        }
    }
}

/// List bookings
async fn list_bookings(
    State(state): State<Arc<DashboardState>>,
    Query(query): Query<BookingQuery>,
) -> impl IntoResponse {
    let mut bookings = match state.bookings.bookings().await {
        Ok(bookings) => bookings,
        Err(e) => {
            error!("Failed to fetch bookings: {}", e);
            return (StatusCode::BAD_GATEWAY, e.to_string()).into_response();
        }
    };

    if let Some(status) = query.status {
        bookings.retain(|b| b.status.as_str() == status);
    }
    if let Some(limit) = query.limit {
        bookings.truncate(limit);
    }

    Json(bookings).into_response()
}

/// Health check endpoint
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "bw-dashboard"
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use bw_core::models::RecurrenceScope;
    use tower::util::ServiceExt;

    struct FixedSlots(Vec<TimeSlotRule>);

    #[async_trait]
    impl SlotProvider for FixedSlots {
        async fn slot_rules(&self) -> Result<Vec<TimeSlotRule>> {
            Ok(self.0.clone())
        }
    }

    struct NoBookings;

    #[async_trait]
    impl BookingProvider for NoBookings {
        async fn bookings(&self) -> Result<Vec<Booking>> {
            Ok(Vec::new())
        }
    }

    fn weekend_rule(id: &str, start: &str, end: &str) -> TimeSlotRule {
        TimeSlotRule {
            id: id.to_string(),
            start_time: start.to_string(),
            end_time: end.to_string(),
            day_of_week: None,
            is_weekend: true,
            specific_date: None,
            max_bookings: 2,
            current_bookings: 0,
            is_active: true,
        }
    }

    fn router_with(rules: Vec<TimeSlotRule>) -> Router {
        create_router(DashboardState::new(
            Arc::new(FixedSlots(rules)),
            Arc::new(NoBookings),
        ))
    }

    #[tokio::test]
    async fn test_groups_endpoint_groups_fresh_snapshot() {
        let app = router_with(vec![
            weekend_rule("a", "08:00", "09:00"),
            weekend_rule("b", "09:00", "10:00"),
        ]);

        let response = app
            .oneshot(Request::get("/api/groups").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let groups: Vec<serde_json::Value> = serde_json::from_slice(&body).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0]["rules"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_scope_query_filters_views() {
        let mut dated = weekend_rule("c", "10:00", "11:00");
        dated.specific_date = Some("2030-01-01".parse().unwrap());
        let app = router_with(vec![weekend_rule("a", "08:00", "09:00"), dated]);

        let response = app
            .clone()
            .oneshot(
                Request::get("/api/groups?scope=weekend")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let groups: Vec<serde_json::Value> = serde_json::from_slice(&body).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(
            groups[0]["scope"],
            serde_json::to_value(RecurrenceScope::Weekend).unwrap()
        );

        let response = app
            .oneshot(
                Request::get("/api/groups?scope=bogus")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_snapshot_is_rejected_not_partially_grouped() {
        let mut bad = weekend_rule("a", "09:00", "08:00");
        bad.id = "backwards".to_string();
        let app = router_with(vec![bad]);

        let response = app
            .oneshot(Request::get("/api/groups").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
