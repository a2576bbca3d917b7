use axum::{extract::State, response::Json};

use crate::models::{Item, Location, Supplier};
use crate::{ApiResponse, AppState, errors::ServiceError};

/// List the item master
#[utoipa::path(
    get,
    path = "/api/v1/masters/items",
    summary = "List the item master",
    responses(
        (status = 200, description = "Items retrieved successfully", body = ApiResponse<Vec<Item>>),
    )
)]
pub async fn list_items(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Item>>>, ServiceError> {
    Ok(Json(ApiResponse::success(state.services.masters.items().await)))
}

/// Replace the item master
#[utoipa::path(
    put,
    path = "/api/v1/masters/items",
    summary = "Replace the item master",
    request_body = Vec<Item>,
    responses(
        (status = 200, description = "Items replaced successfully", body = ApiResponse<Vec<Item>>),
        (status = 400, description = "Empty or duplicate IDs", body = crate::errors::ErrorResponse),
    )
)]
pub async fn replace_items(
    State(state): State<AppState>,
    Json(payload): Json<Vec<Item>>,
) -> Result<Json<ApiResponse<Vec<Item>>>, ServiceError> {
    let items = state.services.masters.replace_items(payload).await?;
    Ok(Json(ApiResponse::success_with_message(
        items,
        "Item master replaced".to_string(),
    )))
}

/// List the location master
#[utoipa::path(
    get,
    path = "/api/v1/masters/locations",
    summary = "List the location master",
    responses(
        (status = 200, description = "Locations retrieved successfully", body = ApiResponse<Vec<Location>>),
    )
)]
pub async fn list_locations(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Location>>>, ServiceError> {
    Ok(Json(ApiResponse::success(
        state.services.masters.locations().await,
    )))
}

/// Replace the location master
#[utoipa::path(
    put,
    path = "/api/v1/masters/locations",
    summary = "Replace the location master",
    request_body = Vec<Location>,
    responses(
        (status = 200, description = "Locations replaced successfully", body = ApiResponse<Vec<Location>>),
        (status = 400, description = "Empty or duplicate IDs", body = crate::errors::ErrorResponse),
    )
)]
pub async fn replace_locations(
    State(state): State<AppState>,
    Json(payload): Json<Vec<Location>>,
) -> Result<Json<ApiResponse<Vec<Location>>>, ServiceError> {
    let locations = state.services.masters.replace_locations(payload).await?;
    Ok(Json(ApiResponse::success_with_message(
        locations,
        "Location master replaced".to_string(),
    )))
}

/// List the supplier master
#[utoipa::path(
    get,
    path = "/api/v1/masters/suppliers",
    summary = "List the supplier master",
    responses(
        (status = 200, description = "Suppliers retrieved successfully", body = ApiResponse<Vec<Supplier>>),
    )
)]
pub async fn list_suppliers(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Supplier>>>, ServiceError> {
    Ok(Json(ApiResponse::success(
        state.services.masters.suppliers().await,
    )))
}

/// Replace the supplier master
#[utoipa::path(
    put,
    path = "/api/v1/masters/suppliers",
    summary = "Replace the supplier master",
    request_body = Vec<Supplier>,
    responses(
        (status = 200, description = "Suppliers replaced successfully", body = ApiResponse<Vec<Supplier>>),
        (status = 400, description = "Empty or duplicate IDs", body = crate::errors::ErrorResponse),
    )
)]
pub async fn replace_suppliers(
    State(state): State<AppState>,
    Json(payload): Json<Vec<Supplier>>,
) -> Result<Json<ApiResponse<Vec<Supplier>>>, ServiceError> {
    let suppliers = state.services.masters.replace_suppliers(payload).await?;
    Ok(Json(ApiResponse::success_with_message(
        suppliers,
        "Supplier master replaced".to_string(),
    )))
}
