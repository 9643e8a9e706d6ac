use crate::config::AlertConfig;
use crate::fleet::{
    Alert, AlertKind, AlertSeverity, FleetStore, NewAlert, OccupancyStatus, Vehicle,
    CRITICAL_LOAD_PERCENT, MEDIUM_LOAD_PERCENT,
};
use crate::subscription::{ServerMessage, SubscriberRegistry};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Scans vehicle load and raises overcrowding alerts.
///
/// Two rules, checked in order, at most one alert per vehicle per tick:
///
/// 1. load > 80% and status `critical`: raise a `high` `overcrowding` alert
///    unless the vehicle has *any* unacknowledged alert.
/// 2. otherwise, load > 60% and status `medium`: raise a `medium` `capacity`
///    alert unless the vehicle has an unacknowledged *medium* alert.
///
/// The suppression scopes differ: an open `high` alert does not suppress a
/// `medium` one.
pub struct AlertMonitor {
    store: Arc<FleetStore>,
    registry: Arc<SubscriberRegistry>,
    config: AlertConfig,
}

impl AlertMonitor {
    pub fn new(
        store: Arc<FleetStore>,
        registry: Arc<SubscriberRegistry>,
        config: AlertConfig,
    ) -> Self {
        Self {
            store,
            registry,
            config,
        }
    }

    /// Evaluate every vehicle once, returning the alerts created
    pub fn tick(&self) -> Vec<Alert> {
        let store = &self.store;

        let created = self.registry.publish_with(|outbox| {
            let mut created = Vec::new();

            for vehicle in store.list_vehicles() {
                if vehicle.capacity == 0 {
                    warn!(vehicle_id = %vehicle.id, "Skipping vehicle with zero capacity");
                    continue;
                }

                if let Some(alert) = evaluate(store, &vehicle) {
                    outbox.push(ServerMessage::Alert {
                        data: alert.clone(),
                    });
                    created.push(alert);
                }
            }

            created
        });

        debug!(created = created.len(), "Alert monitor tick complete");
        created
    }

    /// Run the monitor forever at the configured interval
    pub async fn run(self) {
        info!(interval_ms = self.config.interval_ms, "Starting alert monitor");
        let mut ticker = super::ticker(self.config.interval());

        loop {
            ticker.tick().await;
            self.tick();
        }
    }
}

fn evaluate(store: &FleetStore, vehicle: &Vehicle) -> Option<Alert> {
    let percent = vehicle.capacity_percent();

    if percent > CRITICAL_LOAD_PERCENT as f64 && vehicle.status == OccupancyStatus::Critical {
        let open = store.find_alerts(|a| a.vehicle_id == vehicle.id && !a.acknowledged);
        if !open.is_empty() {
            return None;
        }

        return Some(store.create_alert(NewAlert {
            vehicle_id: vehicle.id.clone(),
            vehicle_name: vehicle.name.clone(),
            kind: AlertKind::Overcrowding,
            severity: AlertSeverity::High,
            message: format!(
                "Critical overcrowding detected: {}/{} passengers ({}%)",
                vehicle.passenger_count,
                vehicle.capacity,
                percent.round()
            ),
        }));
    }

    if percent > MEDIUM_LOAD_PERCENT as f64 && vehicle.status == OccupancyStatus::Medium {
        let open = store.find_alerts(|a| {
            a.vehicle_id == vehicle.id && !a.acknowledged && a.severity == AlertSeverity::Medium
        });
        if !open.is_empty() {
            return None;
        }

        return Some(store.create_alert(NewAlert {
            vehicle_id: vehicle.id.clone(),
            vehicle_name: vehicle.name.clone(),
            kind: AlertKind::Capacity,
            severity: AlertSeverity::Medium,
            message: format!(
                "Moderate crowd level: {}/{} passengers ({}%)",
                vehicle.passenger_count,
                vehicle.capacity,
                percent.round()
            ),
        }));
    }

    None
}
