// Configuration
pub mod config;

// Vehicle / alert store and data model
pub mod fleet;

// Motion, crowd detection and alert simulators
pub mod simulation;

// Subscriber registry and WebSocket protocol
pub mod subscription;

// HTTP and WebSocket APIs
pub mod api;
