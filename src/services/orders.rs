//! Order ledger queries and the completion transition.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::models::{Order, OrderStatus};
use crate::store::JsonStore;

#[derive(Debug, Default, Clone)]
pub struct OrderFilter {
    pub source_id: Option<String>,
    pub status: Option<OrderStatus>,
}

#[derive(Clone)]
pub struct OrderService {
    store: Arc<JsonStore>,
    event_sender: EventSender,
}

impl OrderService {
    pub fn new(store: Arc<JsonStore>, event_sender: EventSender) -> Self {
        Self {
            store,
            event_sender,
        }
    }

    /// Lists orders newest first (ledger order), with optional source and
    /// status filters. Returns the page plus the filtered total.
    pub async fn list_orders(
        &self,
        filter: OrderFilter,
        page: u64,
        limit: u64,
    ) -> (Vec<Order>, u64) {
        let matching: Vec<Order> = self
            .store
            .orders()
            .await
            .into_iter()
            .filter(|order| {
                filter
                    .source_id
                    .as_deref()
                    .map_or(true, |s| order.source_id == s)
                    && filter.status.map_or(true, |s| order.status == s)
            })
            .collect();

        let total = matching.len() as u64;
        let start = page.saturating_sub(1).saturating_mul(limit) as usize;
        let orders = matching
            .into_iter()
            .skip(start)
            .take(limit as usize)
            .collect();
        (orders, total)
    }

    pub async fn get_order(&self, order_id: &str) -> Result<Order, ServiceError> {
        self.store
            .orders()
            .await
            .into_iter()
            .find(|order| order.id == order_id)
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", order_id)))
    }

    /// Marks a pending order completed. Any other current status is
    /// rejected; snapshot fields are never touched.
    #[instrument(skip(self))]
    pub async fn complete_order(&self, order_id: &str) -> Result<Order, ServiceError> {
        let order = self.get_order(order_id).await?;
        if order.status != OrderStatus::Pending {
            return Err(ServiceError::InvalidOperation(format!(
                "order {} is {} and cannot be completed",
                order_id, order.status
            )));
        }

        let updated = self
            .store
            .set_order_status(order_id, OrderStatus::Completed)
            .await?;

        self.event_sender
            .send_or_log(Event::OrderCompleted(updated.id.clone()))
            .await;
        info!("Order {} marked completed", updated.id);
        Ok(updated)
    }
}
