//! Fixed startup fleet (Bangalore routes) and ridership series.

use crate::fleet::model::{OccupancyStatus, PassengerData, Vehicle, VehicleMode};
use chrono::Utc;
use uuid::Uuid;

struct SeedVehicle {
    name: &'static str,
    mode: VehicleMode,
    route: &'static str,
    latitude: f64,
    longitude: f64,
    passenger_count: u32,
    capacity: u32,
    speed: u32,
}

const SEED_FLEET: [SeedVehicle; 5] = [
    SeedVehicle {
        name: "Bus MH-01",
        mode: VehicleMode::Bus,
        route: "Route 356E - Whitefield to Majestic",
        latitude: 12.9716,
        longitude: 77.5946,
        passenger_count: 45,
        capacity: 60,
        speed: 35,
    },
    SeedVehicle {
        name: "Bus MH-02",
        mode: VehicleMode::Bus,
        route: "Route 500K - Kengeri to KR Market",
        latitude: 12.9141,
        longitude: 77.4925,
        passenger_count: 28,
        capacity: 60,
        speed: 42,
    },
    SeedVehicle {
        name: "Metro M1",
        mode: VehicleMode::Train,
        route: "Purple Line - Whitefield to Challaghatta",
        latitude: 13.0358,
        longitude: 77.5970,
        passenger_count: 150,
        capacity: 180,
        speed: 60,
    },
    SeedVehicle {
        name: "Bus MH-03",
        mode: VehicleMode::Bus,
        route: "Route 201A - Yeshwanthpur to Banashankari",
        latitude: 12.9879,
        longitude: 77.5704,
        passenger_count: 35,
        capacity: 60,
        speed: 38,
    },
    SeedVehicle {
        name: "Metro M2",
        mode: VehicleMode::Train,
        route: "Green Line - Nagasandra to Silk Institute",
        latitude: 12.9352,
        longitude: 77.6245,
        passenger_count: 120,
        capacity: 180,
        speed: 55,
    },
];

const SERIES_ROUTE: &str = "Route 356E";

/// (hour, passengers)
const SERIES_POINTS: [(u8, u32); 16] = [
    (6, 45),
    (7, 72),
    (8, 120),
    (9, 95),
    (10, 68),
    (11, 55),
    (12, 82),
    (13, 70),
    (14, 58),
    (15, 65),
    (16, 88),
    (17, 105),
    (18, 135),
    (19, 115),
    (20, 85),
    (21, 52),
];

/// Build the startup fleet with fresh ids
pub fn seed_vehicles() -> Vec<Vehicle> {
    let now = Utc::now();

    SEED_FLEET
        .iter()
        .map(|s| Vehicle {
            id: Uuid::new_v4().to_string(),
            name: s.name.to_string(),
            mode: s.mode,
            route: s.route.to_string(),
            latitude: s.latitude,
            longitude: s.longitude,
            passenger_count: s.passenger_count,
            capacity: s.capacity,
            status: OccupancyStatus::from_load(s.passenger_count, s.capacity),
            speed: s.speed,
            last_updated: now,
        })
        .collect()
}

pub fn seed_passenger_series() -> Vec<PassengerData> {
    SERIES_POINTS
        .iter()
        .map(|&(hour, passengers)| PassengerData {
            route: SERIES_ROUTE.to_string(),
            time: format!("{:02}:00", hour),
            passengers,
            hour,
        })
        .collect()
}
