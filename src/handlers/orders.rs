use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Order, OrderItem, OrderStatus};
use crate::services::orders::OrderFilter;
use crate::{ApiResponse, AppState, PaginatedResponse, errors::ServiceError};

// Order DTOs
#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: String,
    pub date: chrono::DateTime<chrono::Utc>,
    pub source_id: String,
    /// Resolved from the current master data, not frozen in the order.
    pub source_name: String,
    pub destination_id: String,
    pub destination_name: String,
    pub items: Vec<OrderItem>,
    pub total_amount: rust_decimal::Decimal,
    pub status: OrderStatus,
    pub desired_delivery_date: Option<chrono::NaiveDate>,
    pub remarks: Option<String>,
}

// Query flattening breaks numeric deserialization through serde_urlencoded,
// so the pagination fields are inlined rather than nested behind ListQuery.
#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderListQuery {
    #[serde(default = "crate::default_page")]
    pub page: u64,
    #[serde(default = "crate::default_limit")]
    pub limit: u64,
    pub source_id: Option<String>,
    pub status: Option<OrderStatus>,
}

pub(crate) async fn map_order(state: &AppState, order: Order) -> OrderResponse {
    let source_name = state.services.masters.display_name(&order.source_id).await;
    let destination_name = state
        .services
        .masters
        .display_name(&order.destination_id)
        .await;

    OrderResponse {
        id: order.id,
        date: order.date,
        source_id: order.source_id,
        source_name,
        destination_id: order.destination_id,
        destination_name,
        items: order.items,
        total_amount: order.total_amount,
        status: order.status,
        desired_delivery_date: order.desired_delivery_date,
        remarks: order.remarks,
    }
}

/// List orders, newest first
#[utoipa::path(
    get,
    path = "/api/v1/orders",
    summary = "List orders",
    description = "Get a paginated list of orders, newest first, with optional filtering",
    params(
        ("page" = Option<u64>, Query, description = "Page number (default: 1)"),
        ("limit" = Option<u64>, Query, description = "Items per page (default: 20)"),
        ("source_id" = Option<String>, Query, description = "Filter by source location"),
        ("status" = Option<String>, Query, description = "Filter by order status"),
    ),
    responses(
        (status = 200, description = "Orders retrieved successfully", body = ApiResponse<PaginatedResponse<OrderResponse>>),
    )
)]
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<OrderListQuery>,
) -> Result<Json<ApiResponse<PaginatedResponse<OrderResponse>>>, ServiceError> {
    let filter = OrderFilter {
        source_id: query.source_id,
        status: query.status,
    };
    let (page, limit) = (query.page.max(1), query.limit.max(1));
    let (orders, total) = state.services.orders.list_orders(filter, page, limit).await;

    let mut items = Vec::with_capacity(orders.len());
    for order in orders {
        items.push(map_order(&state, order).await);
    }

    Ok(Json(ApiResponse::success(PaginatedResponse {
        items,
        total,
        page,
        limit,
        total_pages: total.div_ceil(limit),
    })))
}

/// Get a single order by id
#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    summary = "Get an order",
    params(("id" = String, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order retrieved successfully", body = ApiResponse<OrderResponse>),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<OrderResponse>>, ServiceError> {
    let order = state.services.orders.get_order(&id).await?;
    Ok(Json(ApiResponse::success(map_order(&state, order).await)))
}

/// Mark a pending order as completed
#[utoipa::path(
    post,
    path = "/api/v1/orders/{id}/complete",
    summary = "Complete an order",
    params(("id" = String, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order completed successfully", body = ApiResponse<OrderResponse>),
        (status = 400, description = "Order is not pending", body = crate::errors::ErrorResponse),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn complete_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<OrderResponse>>, ServiceError> {
    let order = state.services.orders.complete_order(&id).await?;
    Ok(Json(ApiResponse::success_with_message(
        map_order(&state, order).await,
        "Order completed".to_string(),
    )))
}
