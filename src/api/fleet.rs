use crate::fleet::{Alert, FleetStore, PassengerData, Vehicle};
use crate::subscription::SubscriberRegistry;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Shared state for the REST API
pub struct FleetAppState {
    pub store: Arc<FleetStore>,
    pub registry: Arc<SubscriberRegistry>,
}

/// Error response
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// Service health summary
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub vehicles: usize,
    pub alerts: usize,
    pub subscribers: usize,
}

/// Create fleet REST router
pub fn create_fleet_router(state: Arc<FleetAppState>) -> Router {
    Router::new()
        .route("/api/vehicles", get(list_vehicles))
        .route("/api/vehicles/:id", get(get_vehicle))
        .route("/api/alerts", get(list_alerts))
        .route("/api/alerts/:id/acknowledge", post(acknowledge_alert))
        .route("/api/analytics/passengers", get(list_passenger_series))
        .route("/api/health", get(health))
        .with_state(state)
}

/// GET /api/vehicles - All vehicles
async fn list_vehicles(State(state): State<Arc<FleetAppState>>) -> Json<Vec<Vehicle>> {
    Json(state.store.list_vehicles())
}

/// GET /api/vehicles/:id - One vehicle
async fn get_vehicle(
    State(state): State<Arc<FleetAppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vehicle>, ApiError> {
    state
        .store
        .get_vehicle(&id)
        .map(Json)
        .ok_or(ApiError::VehicleNotFound)
}

/// GET /api/alerts - All alerts, creation order
async fn list_alerts(State(state): State<Arc<FleetAppState>>) -> Json<Vec<Alert>> {
    Json(state.store.list_alerts())
}

/// POST /api/alerts/:id/acknowledge
async fn acknowledge_alert(
    State(state): State<Arc<FleetAppState>>,
    Path(id): Path<String>,
) -> Result<Json<Alert>, ApiError> {
    let alert = state
        .store
        .acknowledge_alert(&id)
        .ok_or(ApiError::AlertNotFound)?;

    debug!(alert_id = %id, "Alert acknowledged via API");
    Ok(Json(alert))
}

/// GET /api/analytics/passengers - Static ridership series
async fn list_passenger_series(
    State(state): State<Arc<FleetAppState>>,
) -> Json<Vec<PassengerData>> {
    Json(state.store.list_passenger_series())
}

/// GET /api/health
async fn health(State(state): State<Arc<FleetAppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        vehicles: state.store.vehicle_count(),
        alerts: state.store.alert_count(),
        subscribers: state.registry.subscriber_count(),
    })
}

/// API error types
#[derive(Debug)]
pub enum ApiError {
    VehicleNotFound,
    AlertNotFound,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::VehicleNotFound => (StatusCode::NOT_FOUND, "Vehicle not found"),
            ApiError::AlertNotFound => (StatusCode::NOT_FOUND, "Alert not found"),
        };

        let body = Json(ErrorResponse {
            error: error_message.to_string(),
        });

        (status, body).into_response()
    }
}
