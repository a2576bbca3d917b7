//! Application events.
//!
//! Mutating services publish events onto an mpsc channel; a background task
//! drains the channel and logs them. Delivery is best-effort — a full or
//! closed channel is logged, never surfaced to the caller.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{error, info};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    CartCreated(Uuid),
    CartItemAdded { cart_id: Uuid, item_id: String },
    OrderPlaced { order_id: String, source_id: String },
    OrderCompleted(String),
    MasterDataReplaced { kind: String, count: usize },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously.
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }

    /// Sends an event, logging instead of propagating a channel failure.
    pub async fn send_or_log(&self, event: Event) {
        if let Err(e) = self.send(event).await {
            error!("{}", e);
        }
    }
}

/// Drains the event channel until every sender is dropped.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        match &event {
            Event::OrderPlaced {
                order_id,
                source_id,
            } => {
                info!(order_id, source_id, "Order placed");
            }
            Event::OrderCompleted(order_id) => {
                info!(order_id, "Order completed");
            }
            Event::MasterDataReplaced { kind, count } => {
                info!(kind, count, "Master data replaced");
            }
            Event::CartCreated(cart_id) => {
                info!(%cart_id, "Cart created");
            }
            Event::CartItemAdded { cart_id, item_id } => {
                info!(%cart_id, item_id, "Cart item added");
            }
        }
    }

    info!("Event processing loop stopped");
}
