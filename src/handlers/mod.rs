use std::sync::Arc;

use crate::config::AppConfig;
use crate::events::EventSender;
use crate::services::{
    CartService, DocumentService, MasterDataService, OrderService, RecommendationService,
    RoutingService,
};
use crate::store::JsonStore;

pub mod carts;
pub mod catalog;
pub mod changes;
pub mod documents;
pub mod masters;
pub mod network;
pub mod orders;
pub mod routing;

/// Service container shared across handlers.
#[derive(Clone)]
pub struct AppServices {
    pub masters: Arc<MasterDataService>,
    pub routing: Arc<RoutingService>,
    pub recommendations: Arc<RecommendationService>,
    pub carts: Arc<CartService>,
    pub orders: Arc<OrderService>,
    pub documents: Arc<DocumentService>,
}

impl AppServices {
    pub fn new(store: Arc<JsonStore>, event_sender: EventSender, config: &AppConfig) -> Self {
        let masters = Arc::new(MasterDataService::new(store.clone(), event_sender.clone()));
        let routing = Arc::new(RoutingService::new(store.clone()));
        let recommendations = Arc::new(RecommendationService::new(
            store.clone(),
            config.recommendation_min_count,
        ));
        let carts = Arc::new(CartService::new(
            store.clone(),
            routing.clone(),
            event_sender.clone(),
            config.duplicate_order_window_days,
        ));
        let orders = Arc::new(OrderService::new(store, event_sender));
        let documents = Arc::new(DocumentService::new(orders.clone(), masters.clone()));

        Self {
            masters,
            routing,
            recommendations,
            carts,
            orders,
            documents,
        }
    }
}
