use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::OrderItem;
use crate::services::carts::{AddItemInput, Cart, CreateCartInput, UpdateCartInput};
use crate::{ApiResponse, AppState, errors::ServiceError};

use super::orders::OrderResponse;

// Cart DTOs
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateCartRequest {
    #[validate(length(min = 1))]
    pub source_id: String,
    pub destination_id: Option<String>,
    pub desired_delivery_date: Option<NaiveDate>,
    pub remarks: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct AddItemRequest {
    #[validate(length(min = 1))]
    pub item_id: String,

    /// Confirms an add the server flagged as a recent duplicate.
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct AdjustQuantityRequest {
    /// Signed change applied to the line's quantity; dropping below 1
    /// removes the line.
    pub delta: i32,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateCartRequest {
    pub destination_id: Option<String>,
    pub desired_delivery_date: Option<NaiveDate>,
    pub remarks: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartResponse {
    pub id: Uuid,
    pub source_id: String,
    pub destination_id: Option<String>,
    pub desired_delivery_date: Option<NaiveDate>,
    pub remarks: Option<String>,
    pub lines: Vec<OrderItem>,
    pub total_amount: rust_decimal::Decimal,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Cart> for CartResponse {
    fn from(cart: Cart) -> Self {
        let total_amount = cart.total();
        Self {
            id: cart.id,
            source_id: cart.source_id,
            destination_id: cart.destination_id,
            desired_delivery_date: cart.desired_delivery_date,
            remarks: cart.remarks,
            lines: cart.lines,
            total_amount,
            created_at: cart.created_at,
            updated_at: cart.updated_at,
        }
    }
}

/// Create a cart for a source location
#[utoipa::path(
    post,
    path = "/api/v1/carts",
    summary = "Create a cart",
    request_body = CreateCartRequest,
    responses(
        (status = 201, description = "Cart created successfully", body = ApiResponse<CartResponse>),
        (status = 400, description = "Unknown source or unreachable destination", body = crate::errors::ErrorResponse),
    )
)]
pub async fn create_cart(
    State(state): State<AppState>,
    Json(payload): Json<CreateCartRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    payload.validate()?;

    let cart = state
        .services
        .carts
        .create_cart(CreateCartInput {
            source_id: payload.source_id,
            destination_id: payload.destination_id,
            desired_delivery_date: payload.desired_delivery_date,
            remarks: payload.remarks,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(CartResponse::from(cart))),
    ))
}

/// Get a cart
#[utoipa::path(
    get,
    path = "/api/v1/carts/{id}",
    summary = "Get a cart",
    params(("id" = Uuid, Path, description = "Cart ID")),
    responses(
        (status = 200, description = "Cart retrieved successfully", body = ApiResponse<CartResponse>),
        (status = 404, description = "Cart not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn get_cart(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<CartResponse>>, ServiceError> {
    let cart = state.services.carts.get_cart(id)?;
    Ok(Json(ApiResponse::success(CartResponse::from(cart))))
}

/// Add an item to a cart
#[utoipa::path(
    post,
    path = "/api/v1/carts/{id}/items",
    summary = "Add an item to a cart",
    request_body = AddItemRequest,
    params(("id" = Uuid, Path, description = "Cart ID")),
    responses(
        (status = 200, description = "Item added successfully", body = ApiResponse<CartResponse>),
        (status = 404, description = "Cart or item not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Recently ordered; confirmation required", body = crate::errors::ErrorResponse),
    )
)]
pub async fn add_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddItemRequest>,
) -> Result<Json<ApiResponse<CartResponse>>, ServiceError> {
    payload.validate()?;

    let cart = state
        .services
        .carts
        .add_item(
            id,
            AddItemInput {
                item_id: payload.item_id,
                confirm: payload.confirm,
            },
        )
        .await?;
    Ok(Json(ApiResponse::success(CartResponse::from(cart))))
}

/// Adjust a cart line's quantity
#[utoipa::path(
    put,
    path = "/api/v1/carts/{id}/items/{item_id}",
    summary = "Adjust a line's quantity",
    request_body = AdjustQuantityRequest,
    params(
        ("id" = Uuid, Path, description = "Cart ID"),
        ("item_id" = String, Path, description = "Item ID"),
    ),
    responses(
        (status = 200, description = "Quantity adjusted successfully", body = ApiResponse<CartResponse>),
        (status = 404, description = "Cart or line not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn adjust_quantity(
    State(state): State<AppState>,
    Path((id, item_id)): Path<(Uuid, String)>,
    Json(payload): Json<AdjustQuantityRequest>,
) -> Result<Json<ApiResponse<CartResponse>>, ServiceError> {
    let cart = state
        .services
        .carts
        .adjust_quantity(id, &item_id, payload.delta)?;
    Ok(Json(ApiResponse::success(CartResponse::from(cart))))
}

/// Update a cart's destination, delivery date or remarks
#[utoipa::path(
    put,
    path = "/api/v1/carts/{id}",
    summary = "Update a cart",
    request_body = UpdateCartRequest,
    params(("id" = Uuid, Path, description = "Cart ID")),
    responses(
        (status = 200, description = "Cart updated successfully", body = ApiResponse<CartResponse>),
        (status = 400, description = "Destination not reachable", body = crate::errors::ErrorResponse),
        (status = 404, description = "Cart not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn update_cart(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCartRequest>,
) -> Result<Json<ApiResponse<CartResponse>>, ServiceError> {
    let cart = state
        .services
        .carts
        .update_cart(
            id,
            UpdateCartInput {
                destination_id: payload.destination_id,
                desired_delivery_date: payload.desired_delivery_date,
                remarks: payload.remarks,
            },
        )
        .await?;
    Ok(Json(ApiResponse::success(CartResponse::from(cart))))
}

/// Check out a cart, creating a pending order
#[utoipa::path(
    post,
    path = "/api/v1/carts/{id}/checkout",
    summary = "Check out a cart",
    params(("id" = Uuid, Path, description = "Cart ID")),
    responses(
        (status = 201, description = "Order created successfully", body = ApiResponse<OrderResponse>),
        (status = 400, description = "Missing destination or empty cart", body = crate::errors::ErrorResponse),
        (status = 404, description = "Cart not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn checkout(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let order = state.services.carts.checkout(id).await?;
    let response = super::orders::map_order(&state, order).await;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            response,
            "Order placed".to_string(),
        )),
    ))
}
