// Periodic simulators: vehicle motion, crowd detection, alert monitoring

mod detection;
mod monitor;
mod motion;

pub use detection::CrowdDetector;
pub use monitor::AlertMonitor;
pub use motion::MotionSimulator;

use crate::config::PulseConfig;
use crate::fleet::FleetStore;
use crate::subscription::SubscriberRegistry;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, Interval, MissedTickBehavior};

/// Interval that skips missed ticks to prevent backlog under load
fn ticker(period: Duration) -> Interval {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker
}

/// Spawn the motion, detection and alert loops.
///
/// The loops never finish on their own; abort the handles on shutdown.
pub fn spawn_all(
    store: Arc<FleetStore>,
    registry: Arc<SubscriberRegistry>,
    config: &PulseConfig,
) -> Vec<JoinHandle<()>> {
    let motion = MotionSimulator::new(
        Arc::clone(&store),
        Arc::clone(&registry),
        config.motion.clone(),
    );
    let detector = CrowdDetector::new(Arc::clone(&registry), config.detection.clone());
    let monitor = AlertMonitor::new(store, registry, config.alerts.clone());

    vec![
        tokio::spawn(motion.run()),
        tokio::spawn(detector.run()),
        tokio::spawn(monitor.run()),
    ]
}
