use axum::{
    extract::{Query, State},
    response::Json,
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::services::recommendations::{CatalogEntry, CatalogFilter};
use crate::{ApiResponse, AppState, errors::ServiceError};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CatalogQuery {
    /// Source location; enables the frequently-ordered flag.
    pub source_id: Option<String>,
    pub category: Option<String>,
    /// Case-insensitive match against item name or id.
    pub search: Option<String>,
    #[serde(default)]
    pub recommended_only: bool,
}

/// Browse the item catalog
#[utoipa::path(
    get,
    path = "/api/v1/catalog",
    summary = "Browse the item catalog",
    description = "Items with an ordering-history flag, frequently ordered items first",
    params(
        ("source_id" = Option<String>, Query, description = "Source location for the frequently-ordered flag"),
        ("category" = Option<String>, Query, description = "Filter by category"),
        ("search" = Option<String>, Query, description = "Search by item name or ID"),
        ("recommended_only" = Option<bool>, Query, description = "Only frequently ordered items"),
    ),
    responses(
        (status = 200, description = "Catalog retrieved successfully", body = ApiResponse<Vec<CatalogEntry>>),
    )
)]
pub async fn list_catalog(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<ApiResponse<Vec<CatalogEntry>>>, ServiceError> {
    let filter = CatalogFilter {
        source_id: query.source_id,
        category: query.category,
        search: query.search,
        recommended_only: query.recommended_only,
    };
    let entries = state.services.recommendations.catalog(&filter).await;
    Ok(Json(ApiResponse::success(entries)))
}

/// List catalog categories
#[utoipa::path(
    get,
    path = "/api/v1/catalog/categories",
    summary = "List catalog categories",
    responses(
        (status = 200, description = "Categories retrieved successfully", body = ApiResponse<Vec<String>>),
    )
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<String>>>, ServiceError> {
    let categories = state.services.recommendations.categories().await;
    Ok(Json(ApiResponse::success(categories)))
}
