use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::time::Duration;

/// Complete transit-pulse configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PulseConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub motion: MotionConfig,
    #[serde(default)]
    pub detection: DetectionConfig,
    #[serde(default)]
    pub alerts: AlertConfig,
    #[serde(default)]
    pub subscribers: SubscriberConfig,
}

/// HTTP / WebSocket bind address
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Vehicle motion simulator
#[derive(Debug, Clone, Deserialize)]
pub struct MotionConfig {
    #[serde(default = "default_motion_interval")]
    pub interval_ms: u64,
    /// Max latitude/longitude change per tick (degrees, each direction)
    #[serde(default = "default_coordinate_jitter")]
    pub coordinate_jitter: f64,
    /// Max passenger count change per tick (each direction)
    #[serde(default = "default_passenger_jitter")]
    pub passenger_jitter: u32,
    /// km/h
    #[serde(default = "default_min_speed")]
    pub min_speed: u32,
    /// km/h
    #[serde(default = "default_max_speed")]
    pub max_speed: u32,
}

fn default_motion_interval() -> u64 {
    3000
}

/// Upper bound for `coordinate_jitter`, in degrees
pub const MAX_COORDINATE_JITTER: f64 = 1.0;

fn default_coordinate_jitter() -> f64 {
    0.001
}

fn default_passenger_jitter() -> u32 {
    5
}

fn default_min_speed() -> u32 {
    20
}

fn default_max_speed() -> u32 {
    50
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_motion_interval(),
            coordinate_jitter: default_coordinate_jitter(),
            passenger_jitter: default_passenger_jitter(),
            min_speed: default_min_speed(),
            max_speed: default_max_speed(),
        }
    }
}

impl MotionConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Crowd detection simulator
#[derive(Debug, Clone, Deserialize)]
pub struct DetectionConfig {
    #[serde(default = "default_detection_interval")]
    pub interval_ms: u64,
    #[serde(default = "default_min_persons")]
    pub min_persons: u32,
    #[serde(default = "default_max_persons")]
    pub max_persons: u32,
    /// Camera frame size in pixels; boxes are placed inside it
    #[serde(default = "default_frame_width")]
    pub frame_width: f64,
    #[serde(default = "default_frame_height")]
    pub frame_height: f64,
}

fn default_detection_interval() -> u64 {
    2000
}

fn default_min_persons() -> u32 {
    5
}

fn default_max_persons() -> u32 {
    20
}

fn default_frame_width() -> f64 {
    600.0
}

fn default_frame_height() -> f64 {
    400.0
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_detection_interval(),
            min_persons: default_min_persons(),
            max_persons: default_max_persons(),
            frame_width: default_frame_width(),
            frame_height: default_frame_height(),
        }
    }
}

impl DetectionConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Alert monitor
#[derive(Debug, Clone, Deserialize)]
pub struct AlertConfig {
    #[serde(default = "default_alert_interval")]
    pub interval_ms: u64,
}

fn default_alert_interval() -> u64 {
    5000
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_alert_interval(),
        }
    }
}

impl AlertConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Per-subscriber delivery
#[derive(Debug, Clone, Deserialize)]
pub struct SubscriberConfig {
    /// Frames buffered per subscriber before new frames are skipped.
    ///
    /// A frame is only skipped once this many are queued behind a client
    /// whose socket is still open, so a stalled reader can miss events
    /// (including `alert`) until it reconnects and gets a fresh
    /// `initial_data`. The default holds several minutes of traffic at the
    /// default tick rates.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_channel_capacity() -> usize {
    1024
}

impl Default for SubscriberConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
        }
    }
}

impl PulseConfig {
    /// Apply `HOST` / `PORT` overrides. Unparseable values are ignored.
    pub fn apply_env(&mut self) {
        if let Ok(host) = std::env::var("HOST") {
            if !host.is_empty() {
                self.server.host = host;
            }
        }
        if let Ok(v) = std::env::var("PORT") {
            if let Ok(port) = v.parse::<u16>() {
                self.server.port = port;
            }
        }
    }

    /// Reject settings the simulators cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.motion.interval_ms == 0
            || self.detection.interval_ms == 0
            || self.alerts.interval_ms == 0
        {
            bail!("simulation intervals must be greater than zero");
        }
        if self.motion.min_speed > self.motion.max_speed {
            bail!(
                "motion.min_speed ({}) exceeds motion.max_speed ({})",
                self.motion.min_speed,
                self.motion.max_speed
            );
        }
        if !(0.0..=MAX_COORDINATE_JITTER).contains(&self.motion.coordinate_jitter) {
            bail!(
                "motion.coordinate_jitter must be between 0 and {} degrees",
                MAX_COORDINATE_JITTER
            );
        }
        if self.detection.min_persons > self.detection.max_persons {
            bail!(
                "detection.min_persons ({}) exceeds detection.max_persons ({})",
                self.detection.min_persons,
                self.detection.max_persons
            );
        }
        let frame_ok = |side: f64| side.is_finite() && side > 0.0;
        if !(frame_ok(self.detection.frame_width) && frame_ok(self.detection.frame_height)) {
            bail!("detection frame dimensions must be positive and finite");
        }
        if self.subscribers.channel_capacity == 0 {
            bail!("subscribers.channel_capacity must be greater than zero");
        }
        Ok(())
    }
}

/// Load configuration from TOML file
pub fn load_config(path: &str) -> Result<PulseConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path))?;
    let config: PulseConfig =
        toml::from_str(&contents).with_context(|| format!("Failed to parse config file {}", path))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = PulseConfig::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.motion.interval(), Duration::from_secs(3));
        assert_eq!(config.motion.passenger_jitter, 5);
        assert_eq!(config.detection.interval(), Duration::from_secs(2));
        assert_eq!(config.detection.max_persons, 20);
        assert_eq!(config.alerts.interval(), Duration::from_secs(5));
        assert_eq!(config.subscribers.channel_capacity, 1024);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_deserialization() {
        let toml = r#"
            [server]
            host = "127.0.0.1"
            port = 8080

            [motion]
            interval_ms = 1000
            coordinate_jitter = 0.002
            passenger_jitter = 3
            min_speed = 10
            max_speed = 30

            [detection]
            interval_ms = 500
            min_persons = 1
            max_persons = 4
            frame_width = 1280.0
            frame_height = 720.0

            [alerts]
            interval_ms = 250

            [subscribers]
            channel_capacity = 16
        "#;

        let config: PulseConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.server.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.motion.max_speed, 30);
        assert_eq!(config.detection.frame_width, 1280.0);
        assert_eq!(config.alerts.interval_ms, 250);
        assert_eq!(config.subscribers.channel_capacity, 16);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config() {
        // Missing sections and fields use defaults
        let toml = r#"
            [motion]
            interval_ms = 100
        "#;

        let config: PulseConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.motion.interval_ms, 100);
        assert_eq!(config.motion.max_speed, 50);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.alerts.interval_ms, 5000);
    }

    #[test]
    fn test_validate_rejects_bad_ranges() {
        let mut config = PulseConfig::default();
        config.motion.min_speed = 60;
        assert!(config.validate().is_err());

        let mut config = PulseConfig::default();
        config.detection.min_persons = 30;
        assert!(config.validate().is_err());

        let mut config = PulseConfig::default();
        config.alerts.interval_ms = 0;
        assert!(config.validate().is_err());

        let mut config = PulseConfig::default();
        config.subscribers.channel_capacity = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unsamplable_values() {
        let config: PulseConfig = toml::from_str("[detection]\nframe_width = inf").unwrap();
        assert!(config.validate().is_err());

        let config: PulseConfig = toml::from_str("[detection]\nframe_height = nan").unwrap();
        assert!(config.validate().is_err());

        let config: PulseConfig = toml::from_str("[motion]\ncoordinate_jitter = 1e308").unwrap();
        assert!(config.validate().is_err());

        let config: PulseConfig = toml::from_str("[motion]\ncoordinate_jitter = nan").unwrap();
        assert!(config.validate().is_err());

        let mut config = PulseConfig::default();
        config.motion.coordinate_jitter = MAX_COORDINATE_JITTER;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nport = 7000").unwrap();

        let config = load_config(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.server.port, 7000);
    }

    #[test]
    fn test_load_config_missing_file() {
        let err = load_config("/nonexistent/transit-pulse.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
