use crate::fleet::FleetStore;
use crate::subscription::protocol::ServerMessage;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, error, info, warn};

/// Identifies one connected subscriber
pub type SubscriberId = u64;

/// Serialized JSON frame, shared by every recipient of one event
pub type Frame = Arc<str>;

/// Receiving half handed to a new connection
pub struct Subscription {
    pub id: SubscriberId,
    pub frames: mpsc::Receiver<Frame>,
}

/// Tracks connected subscribers and fans events out to them.
///
/// Membership lives behind a single mutex. Event production runs inside
/// [`SubscriberRegistry::publish_with`] while that mutex is held, and
/// [`SubscriberRegistry::subscribe`] takes it to build the `initial_data`
/// snapshot. Ticks are therefore serialized against each other and against
/// registration.
pub struct SubscriberRegistry {
    members: Mutex<HashMap<SubscriberId, mpsc::Sender<Frame>>>,
    next_id: AtomicU64,
    channel_capacity: usize,
}

impl SubscriberRegistry {
    /// `channel_capacity` is the per-subscriber frame buffer; a full buffer
    /// means the subscriber is not ready and new frames are skipped for it.
    pub fn new(channel_capacity: usize) -> Self {
        Self {
            members: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            channel_capacity: channel_capacity.max(1),
        }
    }

    /// Register a subscriber whose first frame is `initial_data` for the
    /// store as it is right now.
    pub fn subscribe(&self, store: &FleetStore) -> Subscription {
        let mut members = self.members.lock().expect("subscriber lock poisoned");

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel(self.channel_capacity);

        let initial = ServerMessage::InitialData {
            vehicles: store.list_vehicles(),
            alerts: store.list_alerts(),
        };
        match encode(&initial) {
            // Fresh channel with capacity >= 1, cannot be full
            Some(frame) => {
                let _ = tx.try_send(frame);
            }
            None => error!(subscriber_id = id, "Failed to encode initial data"),
        }

        members.insert(id, tx);
        info!(
            subscriber_id = id,
            subscribers = members.len(),
            "Subscriber registered"
        );

        Subscription { id, frames: rx }
    }

    /// Remove a subscriber. Unknown ids are ignored.
    pub fn unsubscribe(&self, id: SubscriberId) {
        let mut members = self.members.lock().expect("subscriber lock poisoned");
        if members.remove(&id).is_some() {
            info!(
                subscriber_id = id,
                subscribers = members.len(),
                "Subscriber removed"
            );
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.members.lock().expect("subscriber lock poisoned").len()
    }

    /// Deliver a single message to every subscriber
    pub fn publish(&self, message: ServerMessage) {
        self.publish_with(|outbox| outbox.push(message));
    }

    /// Run `produce` with the membership lock held, then deliver every
    /// message it pushed, in order, to all current subscribers.
    ///
    /// `produce` must not block or call back into the registry.
    pub fn publish_with<T, F>(&self, produce: F) -> T
    where
        F: FnOnce(&mut Vec<ServerMessage>) -> T,
    {
        let mut members = self.members.lock().expect("subscriber lock poisoned");

        let mut outbox = Vec::new();
        let result = produce(&mut outbox);

        for message in &outbox {
            let Some(frame) = encode(message) else {
                error!(kind = message.kind(), "Failed to encode event, dropping");
                continue;
            };
            deliver(&mut members, message.kind(), &frame);
        }

        result
    }
}

fn encode(message: &ServerMessage) -> Option<Frame> {
    serde_json::to_string(message).ok().map(Frame::from)
}

/// Send one frame to every member, dropping members whose receiver is gone
fn deliver(
    members: &mut HashMap<SubscriberId, mpsc::Sender<Frame>>,
    kind: &'static str,
    frame: &Frame,
) {
    let mut closed = Vec::new();

    for (id, tx) in members.iter() {
        match tx.try_send(Arc::clone(frame)) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) if kind == "alert" => {
                warn!(subscriber_id = id, kind, "Subscriber not ready, alert frame skipped");
            }
            Err(TrySendError::Full(_)) => {
                debug!(subscriber_id = id, kind, "Subscriber not ready, skipping frame");
            }
            Err(TrySendError::Closed(_)) => closed.push(*id),
        }
    }

    for id in closed {
        members.remove(&id);
        info!(subscriber_id = id, "Subscriber transport closed, removed");
    }
}
