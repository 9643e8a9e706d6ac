// Integration tests for the fleet REST API

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use transit_pulse::{
    api::create_app,
    config::AlertConfig,
    fleet::{FleetStore, VehiclePatch},
    simulation::AlertMonitor,
    subscription::SubscriberRegistry,
};

fn create_test_app() -> (Router, Arc<FleetStore>, Arc<SubscriberRegistry>) {
    let store = Arc::new(FleetStore::seeded());
    let registry = Arc::new(SubscriberRegistry::new(16));
    let app = create_app(Arc::clone(&store), Arc::clone(&registry));
    (app, store, registry)
}

async fn send(app: Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_list_vehicles() {
    let (app, store, _) = create_test_app();

    let (status, body) = send(app, "GET", "/api/vehicles").await;

    assert_eq!(status, StatusCode::OK);
    let vehicles = body.as_array().unwrap();
    assert_eq!(vehicles.len(), 5);
    assert_eq!(body, serde_json::to_value(store.list_vehicles()).unwrap());
    assert_eq!(vehicles[2]["name"], "Metro M1");
    assert_eq!(vehicles[2]["type"], "train");
    assert_eq!(vehicles[2]["status"], "critical");
}

#[tokio::test]
async fn test_get_vehicle_by_id() {
    let (app, store, _) = create_test_app();
    let vehicle = store.list_vehicles().remove(1);

    let (status, body) = send(app, "GET", &format!("/api/vehicles/{}", vehicle.id)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], vehicle.id.as_str());
    assert_eq!(body["passengerCount"], vehicle.passenger_count);
}

#[tokio::test]
async fn test_get_unknown_vehicle_returns_404() {
    let (app, _, _) = create_test_app();

    let (status, body) = send(app, "GET", "/api/vehicles/does-not-exist").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Vehicle not found");
}

#[tokio::test]
async fn test_alerts_and_acknowledgement() {
    let (app, store, registry) = create_test_app();

    // Metro M1 starts at 150/180 (83%)
    let monitor = AlertMonitor::new(
        Arc::clone(&store),
        Arc::clone(&registry),
        AlertConfig::default(),
    );
    let created = monitor.tick();
    assert!(!created.is_empty());

    let (status, body) = send(app.clone(), "GET", "/api/alerts").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), created.len());
    assert_eq!(body[0]["acknowledged"], false);

    let id = created[0].id.clone();
    let uri = format!("/api/alerts/{}/acknowledge", id);

    let (status, body) = send(app.clone(), "POST", &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id.as_str());
    assert_eq!(body["acknowledged"], true);

    // Idempotent
    let (status, body) = send(app, "POST", &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["acknowledged"], true);
}

#[tokio::test]
async fn test_acknowledge_unknown_alert_returns_404() {
    let (app, store, registry) = create_test_app();
    let vehicle_id = store.list_vehicles()[0].id.clone();
    store.update_vehicle(
        &vehicle_id,
        VehiclePatch {
            passenger_count: Some(59),
            ..Default::default()
        },
    );
    AlertMonitor::new(Arc::clone(&store), registry, AlertConfig::default()).tick();
    let before = store.list_alerts();

    let (status, body) = send(app, "POST", "/api/alerts/does-not-exist/acknowledge").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Alert not found");
    assert_eq!(store.list_alerts(), before);
}

#[tokio::test]
async fn test_passenger_series() {
    let (app, _, _) = create_test_app();

    let (status, body) = send(app, "GET", "/api/analytics/passengers").await;

    assert_eq!(status, StatusCode::OK);
    let points = body.as_array().unwrap();
    assert_eq!(points.len(), 16);
    assert_eq!(points[2]["route"], "Route 356E");
    assert_eq!(points[2]["time"], "08:00");
    assert_eq!(points[2]["passengers"], 120);
    assert_eq!(points[2]["hour"], 8);
}

#[tokio::test]
async fn test_health() {
    let (app, _, _) = create_test_app();

    let (status, body) = send(app, "GET", "/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["vehicles"], 5);
    assert_eq!(body["subscribers"], 0);
}
