use crate::config::DetectionConfig;
use crate::fleet::{BoundingBox, CrowdDetection};
use crate::subscription::{ServerMessage, SubscriberRegistry};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use tracing::{debug, info};

const BOX_MIN_WIDTH: f64 = 40.0;
const BOX_MAX_WIDTH: f64 = 80.0;
const BOX_MIN_HEIGHT: f64 = 80.0;
const BOX_MAX_HEIGHT: f64 = 160.0;

/// Per-box confidence range
const BOX_CONFIDENCE: (f64, f64) = (0.70, 1.00);

/// Aggregate confidence range
const FRAME_CONFIDENCE: (f64, f64) = (0.85, 1.00);

/// Synthesizes crowd detection snapshots for the webcam panel.
///
/// Independent of the store; keeps no state between ticks.
pub struct CrowdDetector {
    registry: Arc<SubscriberRegistry>,
    config: DetectionConfig,
    rng: StdRng,
}

impl CrowdDetector {
    pub fn new(registry: Arc<SubscriberRegistry>, config: DetectionConfig) -> Self {
        Self::with_rng(registry, config, StdRng::from_entropy())
    }

    pub fn with_rng(
        registry: Arc<SubscriberRegistry>,
        config: DetectionConfig,
        rng: StdRng,
    ) -> Self {
        Self {
            registry,
            config,
            rng,
        }
    }

    /// Produce and broadcast one detection snapshot
    pub fn tick(&mut self) -> CrowdDetection {
        let detection = self.detect();
        debug!(persons = detection.person_count, "Crowd detection tick");

        self.registry.publish(ServerMessage::CrowdDetection {
            data: detection.clone(),
        });

        detection
    }

    fn detect(&mut self) -> CrowdDetection {
        let person_count = self
            .rng
            .gen_range(self.config.min_persons..=self.config.max_persons);

        let bounding_boxes = (0..person_count)
            .map(|_| BoundingBox {
                x: self.rng.gen_range(0.0..self.config.frame_width),
                y: self.rng.gen_range(0.0..self.config.frame_height),
                width: self.rng.gen_range(BOX_MIN_WIDTH..BOX_MAX_WIDTH),
                height: self.rng.gen_range(BOX_MIN_HEIGHT..BOX_MAX_HEIGHT),
                confidence: self.rng.gen_range(BOX_CONFIDENCE.0..=BOX_CONFIDENCE.1),
            })
            .collect();

        CrowdDetection {
            person_count,
            timestamp: Utc::now(),
            bounding_boxes,
            confidence: self.rng.gen_range(FRAME_CONFIDENCE.0..=FRAME_CONFIDENCE.1),
        }
    }

    /// Run the detector forever at the configured interval
    pub async fn run(mut self) {
        info!(interval_ms = self.config.interval_ms, "Starting crowd detector");
        let mut ticker = super::ticker(self.config.interval());

        loop {
            ticker.tick().await;
            self.tick();
        }
    }
}
