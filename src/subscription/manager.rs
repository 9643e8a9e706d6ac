use crate::fleet::FleetStore;
use crate::subscription::protocol::{ClientMessage, ServerMessage};
use crate::subscription::registry::{SubscriberRegistry, Subscription};
use axum::extract::ws::{Message, WebSocket};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Drives a single WebSocket connection: forwards registry frames to the
/// socket and answers client messages against the store.
pub struct ConnectionManager {
    store: Arc<FleetStore>,
    registry: Arc<SubscriberRegistry>,
}

impl ConnectionManager {
    pub fn new(store: Arc<FleetStore>, registry: Arc<SubscriberRegistry>) -> Self {
        Self { store, registry }
    }

    /// Handle WebSocket connection lifecycle
    pub async fn handle(self, mut socket: WebSocket) {
        let Subscription { id, mut frames } = self.registry.subscribe(&self.store);
        info!(subscriber_id = id, "WebSocket connection established");

        loop {
            tokio::select! {
                // Handle incoming client messages
                msg = socket.recv() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            match self.handle_client_message(&text) {
                                Ok(Some(reply)) => {
                                    if let Err(e) = send_message(&mut socket, &reply).await {
                                        warn!(subscriber_id = id, error = %e, "Reply failed");
                                        break;
                                    }
                                }
                                Ok(None) => {}
                                Err(e) => {
                                    warn!(
                                        subscriber_id = id,
                                        error = %e,
                                        "Dropping malformed client message"
                                    );
                                }
                            }
                        }
                        Some(Ok(Message::Close(_))) | None => {
                            info!(subscriber_id = id, "WebSocket client disconnected");
                            break;
                        }
                        Some(Ok(Message::Ping(data))) => {
                            if let Err(e) = socket.send(Message::Pong(data)).await {
                                warn!(subscriber_id = id, error = %e, "Failed to send pong");
                                break;
                            }
                        }
                        Some(Ok(_)) => {
                            // Ignore binary, pong messages
                        }
                        Some(Err(e)) => {
                            warn!(subscriber_id = id, error = %e, "WebSocket error");
                            break;
                        }
                    }
                }

                // Forward broadcast frames
                frame = frames.recv() => {
                    match frame {
                        Some(frame) => {
                            if let Err(e) = socket.send(Message::Text(frame.to_string())).await {
                                warn!(subscriber_id = id, error = %e, "Failed to send frame");
                                break;
                            }
                        }
                        None => {
                            // Registry dropped us
                            debug!(subscriber_id = id, "Frame channel closed");
                            break;
                        }
                    }
                }
            }
        }

        self.registry.unsubscribe(id);
        info!(subscriber_id = id, "WebSocket connection closed");
    }

    /// Parse and apply one client message, returning the reply for this
    /// client (if any). Parse failures are returned as errors.
    pub(crate) fn handle_client_message(
        &self,
        text: &str,
    ) -> anyhow::Result<Option<ServerMessage>> {
        let msg: ClientMessage = serde_json::from_str(text)?;

        let reply = match msg {
            ClientMessage::Acknowledge { alert_id } => {
                match self.store.acknowledge_alert(&alert_id) {
                    Some(alert) => Some(ServerMessage::AlertAcknowledged { data: alert }),
                    None => {
                        debug!(alert_id = %alert_id, "Acknowledge for unknown alert");
                        Some(ServerMessage::error("Alert not found"))
                    }
                }
            }
            ClientMessage::Ping => None,
        };

        Ok(reply)
    }
}

async fn send_message(socket: &mut WebSocket, message: &ServerMessage) -> anyhow::Result<()> {
    let json = serde_json::to_string(message)?;
    socket.send(Message::Text(json)).await?;
    Ok(())
}
