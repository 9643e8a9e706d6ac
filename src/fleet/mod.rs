// Entity store: vehicles, alerts and the static analytics series

mod model;
pub mod seed;
mod store;

pub use model::{
    Alert, AlertKind, AlertSeverity, BoundingBox, CrowdDetection, NewAlert, OccupancyStatus,
    PassengerData, Vehicle, VehicleMode, VehiclePatch, CRITICAL_LOAD_PERCENT, MEDIUM_LOAD_PERCENT,
};
pub use store::FleetStore;


#[cfg(test)]
pub(crate) fn test_vehicle(id: &str, passenger_count: u32, capacity: u32) -> Vehicle {
    Vehicle {
        id: id.to_string(),
        name: format!("Bus {}", id),
        mode: VehicleMode::Bus,
        route: "Route 1 - Depot to Market".to_string(),
        latitude: 12.97,
        longitude: 77.59,
        passenger_count,
        capacity,
        status: OccupancyStatus::Normal,
        speed: 30,
        last_updated: chrono::Utc::now(),
    }
}
