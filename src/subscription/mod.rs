// Broadcast fan-out and WebSocket subscriber management

pub mod manager;
pub mod protocol;
pub mod registry;

pub use manager::ConnectionManager;
pub use protocol::{ClientMessage, ServerMessage};
pub use registry::{Frame, SubscriberId, SubscriberRegistry, Subscription};
