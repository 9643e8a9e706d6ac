use crate::fleet::model::{Alert, NewAlert, PassengerData, Vehicle, VehiclePatch};
use crate::fleet::seed;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

/// Authoritative in-memory state for vehicles and alerts.
///
/// Created once at startup and shared as `Arc<FleetStore>`. Nothing is
/// persisted; a restart reseeds everything.
pub struct FleetStore {
    /// Lock-free concurrent map for fast reads
    vehicles: DashMap<String, Vehicle>,

    /// Vehicle ids in insertion order, so listings are stable
    vehicle_order: RwLock<Vec<String>>,

    /// Append-only, creation order
    alerts: RwLock<Vec<Alert>>,

    /// Static analytics series
    passenger_series: Vec<PassengerData>,
}

impl FleetStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::with_passenger_series(Vec::new())
    }

    fn with_passenger_series(passenger_series: Vec<PassengerData>) -> Self {
        Self {
            vehicles: DashMap::new(),
            vehicle_order: RwLock::new(Vec::new()),
            alerts: RwLock::new(Vec::new()),
            passenger_series,
        }
    }

    /// Create a store holding the fixed seed fleet and passenger series
    pub fn seeded() -> Self {
        let store = Self::with_passenger_series(seed::seed_passenger_series());
        for vehicle in seed::seed_vehicles() {
            store.insert_vehicle(vehicle);
        }

        info!(
            vehicles = store.vehicle_count(),
            series_points = store.passenger_series.len(),
            "Fleet store seeded"
        );

        store
    }

    /// Add a vehicle. Status is recomputed from its load before storing.
    pub fn insert_vehicle(&self, mut vehicle: Vehicle) -> Vehicle {
        vehicle.refresh_status();

        let mut order = self
            .vehicle_order
            .write()
            .expect("vehicle order lock poisoned");
        if self
            .vehicles
            .insert(vehicle.id.clone(), vehicle.clone())
            .is_none()
        {
            order.push(vehicle.id.clone());
        }

        vehicle
    }

    /// Snapshot of all vehicles in insertion order
    pub fn list_vehicles(&self) -> Vec<Vehicle> {
        let order = self
            .vehicle_order
            .read()
            .expect("vehicle order lock poisoned");
        order
            .iter()
            .filter_map(|id| self.vehicles.get(id).map(|v| v.clone()))
            .collect()
    }

    pub fn get_vehicle(&self, id: &str) -> Option<Vehicle> {
        self.vehicles.get(id).map(|v| v.clone())
    }

    pub fn vehicle_count(&self) -> usize {
        self.vehicles.len()
    }

    /// Merge `patch` into the vehicle and recompute its status.
    ///
    /// Merge and recomputation happen under the entry guard, so readers never
    /// see a status that disagrees with the load. Returns `None` for an
    /// unknown id.
    pub fn update_vehicle(&self, id: &str, patch: VehiclePatch) -> Option<Vehicle> {
        let mut entry = self.vehicles.get_mut(id)?;
        patch.apply_to(&mut entry);
        entry.refresh_status();

        debug!(
            vehicle_id = %id,
            passengers = entry.passenger_count,
            status = ?entry.status,
            "Vehicle updated"
        );

        Some(entry.clone())
    }

    /// All alerts in creation order
    pub fn list_alerts(&self) -> Vec<Alert> {
        self.alerts.read().expect("alert lock poisoned").clone()
    }

    pub fn alert_count(&self) -> usize {
        self.alerts.read().expect("alert lock poisoned").len()
    }

    /// Alerts matching `filter`, in creation order
    pub fn find_alerts<F>(&self, filter: F) -> Vec<Alert>
    where
        F: Fn(&Alert) -> bool,
    {
        self.alerts
            .read()
            .expect("alert lock poisoned")
            .iter()
            .filter(|a| filter(a))
            .cloned()
            .collect()
    }

    /// Append a new unacknowledged alert with a fresh id and timestamp
    pub fn create_alert(&self, new_alert: NewAlert) -> Alert {
        let alert = Alert {
            id: Uuid::now_v7().to_string(),
            vehicle_id: new_alert.vehicle_id,
            vehicle_name: new_alert.vehicle_name,
            kind: new_alert.kind,
            severity: new_alert.severity,
            message: new_alert.message,
            timestamp: Utc::now(),
            acknowledged: false,
        };

        self.alerts
            .write()
            .expect("alert lock poisoned")
            .push(alert.clone());

        info!(
            alert_id = %alert.id,
            vehicle_id = %alert.vehicle_id,
            severity = ?alert.severity,
            "Alert created"
        );

        alert
    }

    /// Mark an alert acknowledged. Idempotent; `None` for an unknown id.
    pub fn acknowledge_alert(&self, id: &str) -> Option<Alert> {
        let mut alerts = self.alerts.write().expect("alert lock poisoned");
        let alert = alerts.iter_mut().find(|a| a.id == id)?;

        if !alert.acknowledged {
            alert.acknowledged = true;
            info!(alert_id = %id, "Alert acknowledged");
        }

        Some(alert.clone())
    }

    pub fn list_passenger_series(&self) -> Vec<PassengerData> {
        self.passenger_series.clone()
    }
}

impl Default for FleetStore {
    fn default() -> Self {
        Self::new()
    }
}
