use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::services::routing::Destination;
use crate::{ApiResponse, AppState, errors::ServiceError};

#[derive(Debug, Deserialize, ToSchema)]
pub struct DestinationsQuery {
    /// Destination id currently selected by the caller, if any.
    pub selected: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DestinationsResponse {
    pub destinations: Vec<Destination>,
    /// Selection after applying the routing rules: auto-selected when only
    /// one destination exists, cleared when the previous pick is no longer
    /// reachable.
    pub effective_selection: Option<String>,
}

/// List destinations reachable from a source location
#[utoipa::path(
    get,
    path = "/api/v1/routing/{source_id}/destinations",
    summary = "List reachable destinations",
    params(
        ("source_id" = String, Path, description = "Source location ID"),
        ("selected" = Option<String>, Query, description = "Currently selected destination ID"),
    ),
    responses(
        (status = 200, description = "Destinations retrieved successfully", body = ApiResponse<DestinationsResponse>),
        (status = 404, description = "Source location not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn list_destinations(
    State(state): State<AppState>,
    Path(source_id): Path<String>,
    Query(query): Query<DestinationsQuery>,
) -> Result<Json<ApiResponse<DestinationsResponse>>, ServiceError> {
    let known_source = state
        .store
        .locations()
        .await
        .iter()
        .any(|l| l.id == source_id);
    if !known_source {
        return Err(ServiceError::NotFound(format!(
            "Location {} not found",
            source_id
        )));
    }

    let destinations = state.services.routing.destinations(&source_id).await;
    let effective_selection = state
        .services
        .routing
        .effective_destination(&source_id, query.selected.as_deref())
        .await;

    Ok(Json(ApiResponse::success(DestinationsResponse {
        destinations,
        effective_selection,
    })))
}
