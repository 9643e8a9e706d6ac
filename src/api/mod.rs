// HTTP and WebSocket APIs

pub mod fleet;
pub mod websocket;

pub use fleet::{create_fleet_router, ApiError, FleetAppState};
pub use websocket::{create_ws_router, ws_handler, WsAppState};

use crate::fleet::FleetStore;
use crate::subscription::SubscriberRegistry;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Full application router: REST + WebSocket, with permissive CORS for the
/// dashboard dev server
pub fn create_app(store: Arc<FleetStore>, registry: Arc<SubscriberRegistry>) -> Router {
    let fleet_state = Arc::new(FleetAppState {
        store: Arc::clone(&store),
        registry: Arc::clone(&registry),
    });
    let ws_state = Arc::new(WsAppState { store, registry });

    Router::new()
        .merge(create_fleet_router(fleet_state))
        .merge(create_ws_router(ws_state))
        .layer(CorsLayer::permissive())
}
