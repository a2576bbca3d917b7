//! Resupply API Library
//!
//! Ordering backend for consumable-materials resupply between stores,
//! factories and outside suppliers.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod models;
pub mod openapi;
pub mod seed;
pub mod services;
pub mod store;

use axum::{response::Json, routing::get, routing::post, routing::put, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use utoipa::ToSchema;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<store::JsonStore>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: handlers::AppServices,
}

// Common query parameters for list endpoints
#[derive(Debug, Deserialize, ToSchema)]
pub struct ListQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

pub(crate) fn default_page() -> u64 {
    1
}
pub(crate) fn default_limit() -> u64 {
    20
}

// Common response wrappers
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub errors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
}

#[derive(Serialize, ToSchema)]
pub struct ResponseMeta {
    pub timestamp: String,
}

impl ResponseMeta {
    fn capture() -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            errors: None,
            meta: Some(ResponseMeta::capture()),
        }
    }

    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
            errors: None,
            meta: Some(ResponseMeta::capture()),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
            errors: None,
            meta: Some(ResponseMeta::capture()),
        }
    }
}

/// Standard API result type for JSON responses
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, errors::ServiceError>;

// API routes mounted under /api/v1
pub fn api_v1_routes() -> Router<AppState> {
    let routing = Router::new().route(
        "/routing/:source_id/destinations",
        get(handlers::routing::list_destinations),
    );

    let catalog = Router::new()
        .route("/catalog", get(handlers::catalog::list_catalog))
        .route(
            "/catalog/categories",
            get(handlers::catalog::list_categories),
        );

    let carts = Router::new()
        .route("/carts", post(handlers::carts::create_cart))
        .route("/carts/:id", get(handlers::carts::get_cart))
        .route("/carts/:id", put(handlers::carts::update_cart))
        .route("/carts/:id/items", post(handlers::carts::add_item))
        .route(
            "/carts/:id/items/:item_id",
            put(handlers::carts::adjust_quantity),
        )
        .route("/carts/:id/checkout", post(handlers::carts::checkout));

    let orders = Router::new()
        .route("/orders", get(handlers::orders::list_orders))
        .route("/orders/:id", get(handlers::orders::get_order))
        .route("/orders/:id/complete", post(handlers::orders::complete_order));

    let masters = Router::new()
        .route(
            "/masters/items",
            get(handlers::masters::list_items).put(handlers::masters::replace_items),
        )
        .route(
            "/masters/locations",
            get(handlers::masters::list_locations).put(handlers::masters::replace_locations),
        )
        .route(
            "/masters/suppliers",
            get(handlers::masters::list_suppliers).put(handlers::masters::replace_suppliers),
        );

    Router::new()
        // Status and health endpoints
        .route("/status", get(api_status))
        .route("/health", get(health_check))
        .merge(routing)
        .merge(catalog)
        .merge(carts)
        .merge(orders)
        .merge(masters)
        .route("/network-info", get(handlers::network::network_info))
        .route("/changes", get(handlers::changes::change_stream))
}

async fn api_status() -> ApiResult<Value> {
    let version = env!("CARGO_PKG_VERSION");
    let status_data = json!({
        "status": "ok",
        "version": version,
        "service": "resupply-api",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    Ok(Json(ApiResponse::success(status_data)))
}

async fn health_check(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> ApiResult<Value> {
    // A readable ledger means the JSON files are mounted and parseable.
    let order_count = state.store.orders().await.len();

    let health_data = json!({
        "status": "healthy",
        "checks": {
            "storage": "healthy",
            "orders": order_count,
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    Ok(Json(ApiResponse::success(health_data)))
}
