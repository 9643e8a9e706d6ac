use crate::config::MotionConfig;
use crate::fleet::{FleetStore, Vehicle, VehiclePatch};
use crate::subscription::{ServerMessage, SubscriberRegistry};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Random-walk stand-in for a vehicle telemetry feed.
///
/// A real feed must produce the same thing: a complete update submitted
/// through [`FleetStore::update_vehicle`], so status derivation stays in the
/// store.
pub struct MotionSimulator {
    store: Arc<FleetStore>,
    registry: Arc<SubscriberRegistry>,
    config: MotionConfig,
    rng: StdRng,
}

impl MotionSimulator {
    pub fn new(
        store: Arc<FleetStore>,
        registry: Arc<SubscriberRegistry>,
        config: MotionConfig,
    ) -> Self {
        Self::with_rng(store, registry, config, StdRng::from_entropy())
    }

    pub fn with_rng(
        store: Arc<FleetStore>,
        registry: Arc<SubscriberRegistry>,
        config: MotionConfig,
        rng: StdRng,
    ) -> Self {
        Self {
            store,
            registry,
            config,
            rng,
        }
    }

    /// Move every vehicle once and broadcast each update.
    ///
    /// Returns the updated vehicles. Vehicles with an unusable state are
    /// skipped for this tick.
    pub fn tick(&mut self) -> Vec<Vehicle> {
        let store = &self.store;
        let config = &self.config;
        let rng = &mut self.rng;

        let updated = self.registry.publish_with(|outbox| {
            let mut updated = Vec::new();

            for vehicle in store.list_vehicles() {
                let Some(patch) = next_position(&vehicle, config, rng) else {
                    continue;
                };

                if let Some(vehicle) = store.update_vehicle(&vehicle.id, patch) {
                    outbox.push(ServerMessage::VehicleUpdate {
                        data: vehicle.clone(),
                    });
                    updated.push(vehicle);
                }
            }

            updated
        });

        debug!(vehicles = updated.len(), "Motion tick complete");
        updated
    }

    /// Run the simulator forever at the configured interval
    pub async fn run(mut self) {
        info!(interval_ms = self.config.interval_ms, "Starting motion simulator");
        let mut ticker = super::ticker(self.config.interval());

        loop {
            ticker.tick().await;
            self.tick();
        }
    }
}

/// Draw the next position, load and speed for one vehicle
fn next_position(
    vehicle: &Vehicle,
    config: &MotionConfig,
    rng: &mut StdRng,
) -> Option<VehiclePatch> {
    if vehicle.capacity == 0 || !vehicle.latitude.is_finite() || !vehicle.longitude.is_finite() {
        warn!(
            vehicle_id = %vehicle.id,
            capacity = vehicle.capacity,
            "Skipping vehicle with unusable state"
        );
        return None;
    }

    let jitter = config.coordinate_jitter;
    let (lat_delta, lon_delta) = if jitter > 0.0 {
        (rng.gen_range(-jitter..=jitter), rng.gen_range(-jitter..=jitter))
    } else {
        (0.0, 0.0)
    };

    let passenger_jitter = i64::from(config.passenger_jitter);
    let passenger_delta = rng.gen_range(-passenger_jitter..=passenger_jitter);
    let passengers = (i64::from(vehicle.passenger_count) + passenger_delta)
        .clamp(0, i64::from(vehicle.capacity));

    Some(VehiclePatch {
        latitude: Some(vehicle.latitude + lat_delta),
        longitude: Some(vehicle.longitude + lon_delta),
        // Clamped into [0, capacity] above
        passenger_count: Some(passengers as u32),
        speed: Some(rng.gen_range(config.min_speed..=config.max_speed)),
        last_updated: Some(Utc::now()),
        ..Default::default()
    })
}
