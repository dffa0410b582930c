//! Live hub: per-user fan-out of order events and notifications
//!
//! The order manager only publishes to its own `broadcast::Sender`.
//! [`spawn_order_forwarder`] consumes that stream and routes each event to
//! both parties of the order; WebSocket connections subscribe per user.

use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;
use shared::notification::NotificationRequest;
use shared::order::OrderEvent;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::orders::storage::OrderStorage;

/// Per-user channel capacity
const USER_CHANNEL_CAPACITY: usize = 256;

/// Frame pushed to a live subscriber
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum LiveMessage {
    OrderEvent(OrderEvent),
    Notification(NotificationRequest),
}

#[derive(Debug, Clone, Default)]
pub struct LiveHub {
    channels: Arc<DashMap<String, broadcast::Sender<LiveMessage>>>,
}

impl LiveHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, user_id: &str) -> broadcast::Receiver<LiveMessage> {
        self.channels
            .entry(user_id.to_string())
            .or_insert_with(|| broadcast::channel(USER_CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// Send to one user; returns the number of live receivers reached.
    /// Channels nobody listens to are dropped.
    pub fn publish(&self, user_id: &str, message: LiveMessage) -> usize {
        let Some(sender) = self.channels.get(user_id).map(|s| s.clone()) else {
            return 0;
        };
        match sender.send(message) {
            Ok(n) => n,
            Err(_) => {
                self.channels
                    .remove_if(user_id, |_, s| s.receiver_count() == 0);
                0
            }
        }
    }

    /// Number of users with an open channel
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }
}

/// Route committed order events to both parties of each order
pub fn spawn_order_forwarder(
    hub: LiveHub,
    storage: OrderStorage,
    mut events: broadcast::Receiver<OrderEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => forward_event(&hub, &storage, event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Live forwarder lagged behind order events");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Order event stream closed, live forwarder stopping");
                    break;
                }
            }
        }
    })
}

fn forward_event(hub: &LiveHub, storage: &OrderStorage, event: OrderEvent) {
    let snapshot = match storage.get_snapshot(&event.order_id) {
        Ok(Some(snapshot)) => snapshot,
        Ok(None) => {
            tracing::warn!(order_id = %event.order_id, "Live forward skipped: order not found");
            return;
        }
        Err(e) => {
            tracing::warn!(order_id = %event.order_id, error = %e, "Live forward skipped");
            return;
        }
    };
    for user_id in [&snapshot.buyer_id, &snapshot.seller_id] {
        hub.publish(user_id, LiveMessage::OrderEvent(event.clone()));
    }
}
