//! Server-held order carts and checkout.
//!
//! Carts are ephemeral working state, held in memory only; the ledger is the
//! persistent record. A cart is bound to its source at creation. Checkout
//! turns the cart lines into order snapshots, prepends the order to the
//! ledger and clears the cart.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use dashmap::DashMap;
use rust_decimal::Decimal;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::models::{Order, OrderItem, OrderStatus};
use crate::services::routing::RoutingService;
use crate::store::JsonStore;

#[derive(Debug, Clone)]
pub struct Cart {
    pub id: Uuid,
    pub source_id: String,
    pub destination_id: Option<String>,
    pub desired_delivery_date: Option<NaiveDate>,
    pub remarks: Option<String>,
    pub lines: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    /// Always Σ(price × quantity) over the current lines.
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(OrderItem::line_total).sum()
    }
}

#[derive(Debug, Default, Clone)]
pub struct CreateCartInput {
    pub source_id: String,
    pub destination_id: Option<String>,
    pub desired_delivery_date: Option<NaiveDate>,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AddItemInput {
    pub item_id: String,
    /// Explicit user confirmation that a recent duplicate is intended.
    pub confirm: bool,
}

#[derive(Debug, Default, Clone)]
pub struct UpdateCartInput {
    pub destination_id: Option<String>,
    pub desired_delivery_date: Option<NaiveDate>,
    pub remarks: Option<String>,
}

#[derive(Clone)]
pub struct CartService {
    store: Arc<JsonStore>,
    routing: Arc<RoutingService>,
    event_sender: EventSender,
    carts: Arc<DashMap<Uuid, Cart>>,
    duplicate_window: Duration,
}

impl CartService {
    pub fn new(
        store: Arc<JsonStore>,
        routing: Arc<RoutingService>,
        event_sender: EventSender,
        duplicate_window_days: i64,
    ) -> Self {
        Self {
            store,
            routing,
            event_sender,
            carts: Arc::new(DashMap::new()),
            duplicate_window: Duration::days(duplicate_window_days),
        }
    }

    /// Creates a cart for a source. When the source has exactly one
    /// reachable destination it is selected automatically; an explicit
    /// destination must be reachable from the source.
    #[instrument(skip(self))]
    pub async fn create_cart(&self, input: CreateCartInput) -> Result<Cart, ServiceError> {
        let source = self
            .store
            .locations()
            .await
            .into_iter()
            .find(|l| l.id == input.source_id)
            .ok_or_else(|| {
                ServiceError::ValidationError(format!(
                    "unknown source location: {}",
                    input.source_id
                ))
            })?;

        let destination_id = self
            .routing
            .effective_destination(&source.id, input.destination_id.as_deref())
            .await;
        if let (Some(requested), None) = (input.destination_id.as_deref(), &destination_id) {
            return Err(ServiceError::ValidationError(format!(
                "destination {} is not reachable from {}",
                requested, source.id
            )));
        }

        let now = Utc::now();
        let cart = Cart {
            id: Uuid::new_v4(),
            source_id: source.id,
            destination_id,
            desired_delivery_date: input.desired_delivery_date,
            remarks: input.remarks,
            lines: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.carts.insert(cart.id, cart.clone());

        self.event_sender.send_or_log(Event::CartCreated(cart.id)).await;
        info!("Created cart {} for source {}", cart.id, cart.source_id);
        Ok(cart)
    }

    pub fn get_cart(&self, cart_id: Uuid) -> Result<Cart, ServiceError> {
        self.carts
            .get(&cart_id)
            .map(|entry| entry.clone())
            .ok_or_else(|| ServiceError::NotFound(format!("Cart {} not found", cart_id)))
    }

    /// Adds an item: an existing line gains quantity 1, a new line is
    /// inserted at quantity 1 with the master fields snapshotted. If any
    /// ledger order from the same source already contains the item within
    /// the duplicate window, the add is refused until `confirm` is set.
    #[instrument(skip(self))]
    pub async fn add_item(&self, cart_id: Uuid, input: AddItemInput) -> Result<Cart, ServiceError> {
        let source_id = self.get_cart(cart_id)?.source_id;

        let item = self
            .store
            .items()
            .await
            .into_iter()
            .find(|i| i.id == input.item_id)
            .ok_or_else(|| ServiceError::NotFound(format!("Item {} not found", input.item_id)))?;

        if !input.confirm {
            if let Some(recent) = self.recent_duplicate(&source_id, &item.id).await {
                return Err(ServiceError::Conflict(format!(
                    "{} was already ordered on {} (order {}); resubmit with confirm=true to add it anyway",
                    item.name,
                    recent.date.format("%Y-%m-%d"),
                    recent.id
                )));
            }
        }

        let mut entry = self
            .carts
            .get_mut(&cart_id)
            .ok_or_else(|| ServiceError::NotFound(format!("Cart {} not found", cart_id)))?;
        match entry.lines.iter_mut().find(|line| line.item_id == item.id) {
            Some(line) => line.quantity += 1,
            None => entry.lines.push(OrderItem {
                item_id: item.id.clone(),
                item_name: item.name.clone(),
                quantity: 1,
                unit: item.unit.clone(),
                price: item.price,
            }),
        }
        entry.updated_at = Utc::now();
        let cart = entry.clone();
        drop(entry);

        self.event_sender
            .send_or_log(Event::CartItemAdded {
                cart_id,
                item_id: item.id,
            })
            .await;
        Ok(cart)
    }

    /// Adjusts a line's quantity by a signed delta; a resulting quantity
    /// below 1 removes the line.
    pub fn adjust_quantity(
        &self,
        cart_id: Uuid,
        item_id: &str,
        delta: i32,
    ) -> Result<Cart, ServiceError> {
        let mut entry = self
            .carts
            .get_mut(&cart_id)
            .ok_or_else(|| ServiceError::NotFound(format!("Cart {} not found", cart_id)))?;

        let idx = entry
            .lines
            .iter()
            .position(|line| line.item_id == item_id)
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Item {} is not in cart {}", item_id, cart_id))
            })?;

        let next = entry.lines[idx].quantity.saturating_add(delta);
        if next < 1 {
            entry.lines.remove(idx);
        } else {
            entry.lines[idx].quantity = next;
        }
        entry.updated_at = Utc::now();
        Ok(entry.clone())
    }

    /// Updates destination, desired delivery date or remarks. A destination
    /// change is validated against the routing table.
    pub async fn update_cart(
        &self,
        cart_id: Uuid,
        input: UpdateCartInput,
    ) -> Result<Cart, ServiceError> {
        if let Some(destination_id) = &input.destination_id {
            let source_id = self.get_cart(cart_id)?.source_id;
            if !self.routing.is_reachable(&source_id, destination_id).await {
                return Err(ServiceError::ValidationError(format!(
                    "destination {} is not reachable from {}",
                    destination_id, source_id
                )));
            }
        }

        let mut entry = self
            .carts
            .get_mut(&cart_id)
            .ok_or_else(|| ServiceError::NotFound(format!("Cart {} not found", cart_id)))?;
        if let Some(destination_id) = input.destination_id {
            entry.destination_id = Some(destination_id);
        }
        if let Some(date) = input.desired_delivery_date {
            entry.desired_delivery_date = Some(date);
        }
        if let Some(remarks) = input.remarks {
            entry.remarks = if remarks.trim().is_empty() {
                None
            } else {
                Some(remarks)
            };
        }
        entry.updated_at = Utc::now();
        Ok(entry.clone())
    }

    /// Turns the cart into a pending order at the head of the ledger.
    ///
    /// Rejected without creating anything unless the cart has a source, a
    /// reachable destination and at least one line. On success the cart
    /// lines and remarks are cleared.
    #[instrument(skip(self))]
    pub async fn checkout(&self, cart_id: Uuid) -> Result<Order, ServiceError> {
        let cart = self.get_cart(cart_id)?;

        let destination_id = cart.destination_id.clone().ok_or_else(|| {
            ServiceError::ValidationError("a destination must be selected before checkout".into())
        })?;
        if cart.lines.is_empty() {
            return Err(ServiceError::ValidationError(
                "the cart has no items".into(),
            ));
        }
        if !self
            .routing
            .is_reachable(&cart.source_id, &destination_id)
            .await
        {
            return Err(ServiceError::ValidationError(format!(
                "destination {} is not reachable from {}",
                destination_id, cart.source_id
            )));
        }

        let now = Utc::now();
        let order = Order {
            id: generate_order_id(now),
            date: now,
            source_id: cart.source_id.clone(),
            destination_id,
            items: cart.lines.clone(),
            total_amount: cart.total(),
            status: OrderStatus::Pending,
            desired_delivery_date: cart.desired_delivery_date,
            remarks: cart.remarks.clone(),
        };

        self.store.prepend_order(order.clone()).await?;

        if let Some(mut entry) = self.carts.get_mut(&cart_id) {
            entry.lines.clear();
            entry.remarks = None;
            entry.updated_at = now;
        }

        self.event_sender
            .send_or_log(Event::OrderPlaced {
                order_id: order.id.clone(),
                source_id: order.source_id.clone(),
            })
            .await;
        info!(
            "Checkout of cart {} created order {} ({} lines, total {})",
            cart_id,
            order.id,
            order.items.len(),
            order.total_amount
        );
        Ok(order)
    }

    /// Most recent ledger order from the source containing the item inside
    /// the duplicate window.
    async fn recent_duplicate(&self, source_id: &str, item_id: &str) -> Option<Order> {
        let cutoff = Utc::now() - self.duplicate_window;
        self.store.orders().await.into_iter().find(|order| {
            order.source_id == source_id
                && order.date > cutoff
                && order.items.iter().any(|line| line.item_id == item_id)
        })
    }
}

/// Slip numbers: `ORD-<yyyymmdd>-<short uuid>`, unique without coordination.
fn generate_order_id(now: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("ORD-{}-{}", now.format("%Y%m%d"), &suffix[..6])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_ids_carry_date_and_unique_suffix() {
        let now = Utc::now();
        let a = generate_order_id(now);
        let b = generate_order_id(now);
        assert!(a.starts_with(&format!("ORD-{}-", now.format("%Y%m%d"))));
        assert_ne!(a, b);
    }
}
