use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Load at or above this percentage of capacity is `critical`
pub const CRITICAL_LOAD_PERCENT: u64 = 80;

/// Load at or above this percentage of capacity is `medium`
pub const MEDIUM_LOAD_PERCENT: u64 = 60;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleMode {
    Bus,
    Train,
}

/// Crowding level derived from passenger load
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OccupancyStatus {
    Normal,
    Medium,
    Critical,
}

impl OccupancyStatus {
    /// Derive status from `passengers / capacity`.
    ///
    /// Integer comparison keeps the 80% / 60% boundaries exact
    /// (48/60 is critical, 36/60 is medium).
    pub fn from_load(passenger_count: u32, capacity: u32) -> Self {
        let load = u64::from(passenger_count) * 100;
        let capacity = u64::from(capacity);

        if load >= capacity * CRITICAL_LOAD_PERCENT {
            OccupancyStatus::Critical
        } else if load >= capacity * MEDIUM_LOAD_PERCENT {
            OccupancyStatus::Medium
        } else {
            OccupancyStatus::Normal
        }
    }
}

/// A tracked bus or train
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub mode: VehicleMode,
    pub route: String,
    pub latitude: f64,
    pub longitude: f64,
    pub passenger_count: u32,
    pub capacity: u32,
    /// Always derived from `passenger_count / capacity`, see [`OccupancyStatus::from_load`]
    pub status: OccupancyStatus,
    /// km/h
    pub speed: u32,
    pub last_updated: DateTime<Utc>,
}

impl Vehicle {
    /// Load as a percentage of capacity (unrounded)
    pub fn capacity_percent(&self) -> f64 {
        f64::from(self.passenger_count) / f64::from(self.capacity) * 100.0
    }

    pub(crate) fn refresh_status(&mut self) {
        self.status = OccupancyStatus::from_load(self.passenger_count, self.capacity);
    }
}

/// Partial vehicle update. Only fields that are `Some` are changed.
///
/// Has no `status` field; the store recomputes it on every update.
#[derive(Clone, Debug, Default)]
pub struct VehiclePatch {
    pub name: Option<String>,
    pub route: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub passenger_count: Option<u32>,
    pub capacity: Option<u32>,
    pub speed: Option<u32>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl VehiclePatch {
    pub(crate) fn apply_to(self, vehicle: &mut Vehicle) {
        if let Some(v) = self.name {
            vehicle.name = v;
        }
        if let Some(v) = self.route {
            vehicle.route = v;
        }
        if let Some(v) = self.latitude {
            vehicle.latitude = v;
        }
        if let Some(v) = self.longitude {
            vehicle.longitude = v;
        }
        if let Some(v) = self.passenger_count {
            vehicle.passenger_count = v;
        }
        if let Some(v) = self.capacity {
            vehicle.capacity = v;
        }
        if let Some(v) = self.speed {
            vehicle.speed = v;
        }
        if let Some(v) = self.last_updated {
            vehicle.last_updated = v;
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Overcrowding,
    Capacity,
    Delay,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
}

/// Raised alert. Only `acknowledged` changes after creation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    pub vehicle_id: String,
    /// Vehicle name at creation time; not refreshed on rename
    pub vehicle_name: String,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub severity: AlertSeverity,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub acknowledged: bool,
}

/// Alert fields supplied by the caller; the store assigns the rest
#[derive(Clone, Debug)]
pub struct NewAlert {
    pub vehicle_id: String,
    pub vehicle_name: String,
    pub kind: AlertKind,
    pub severity: AlertSeverity,
    pub message: String,
}

/// One simulated detection in the camera frame
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub confidence: f64,
}

/// Crowd detection snapshot. Never stored; each one replaces the last.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrowdDetection {
    pub person_count: u32,
    pub timestamp: DateTime<Utc>,
    pub bounding_boxes: Vec<BoundingBox>,
    pub confidence: f64,
}

/// Hourly ridership point for the analytics chart
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PassengerData {
    pub route: String,
    pub time: String,
    pub passengers: u32,
    pub hour: u8,
}
