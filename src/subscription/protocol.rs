use crate::fleet::{Alert, CrowdDetection, Vehicle};
use serde::{Deserialize, Serialize};

/// Client → Server message types
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Acknowledge an alert from the dashboard
    #[serde(rename_all = "camelCase")]
    Acknowledge { alert_id: String },
    /// Application-level keep-alive
    Ping,
}

/// Server → Client message types
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// First frame on every connection
    InitialData {
        vehicles: Vec<Vehicle>,
        alerts: Vec<Alert>,
    },
    /// Full replacement value for one vehicle
    VehicleUpdate { data: Vehicle },
    /// Latest detection snapshot; replaces the previous one
    CrowdDetection { data: CrowdDetection },
    /// Newly created alert
    Alert { data: Alert },
    /// Reply to an `acknowledge` from this client
    AlertAcknowledged { data: Alert },
    Error { error: String },
}

impl ServerMessage {
    pub fn error(error: impl Into<String>) -> Self {
        ServerMessage::Error {
            error: error.into(),
        }
    }

    /// Wire name of this message
    pub fn kind(&self) -> &'static str {
        match self {
            ServerMessage::InitialData { .. } => "initial_data",
            ServerMessage::VehicleUpdate { .. } => "vehicle_update",
            ServerMessage::CrowdDetection { .. } => "crowd_detection",
            ServerMessage::Alert { .. } => "alert",
            ServerMessage::AlertAcknowledged { .. } => "alert_acknowledged",
            ServerMessage::Error { .. } => "error",
        }
    }
}
