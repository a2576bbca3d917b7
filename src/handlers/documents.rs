use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse},
};

use crate::AppState;

/// Printable purchase-order sheet, served at the root rather than under
/// /api/v1 so the URL can be opened directly in a browser for printing.
#[utoipa::path(
    get,
    path = "/printable-order/{order_id}",
    summary = "Printable purchase-order sheet",
    params(("order_id" = String, Path, description = "Order ID")),
    responses(
        (status = 200, description = "HTML purchase-order sheet", content_type = "text/html"),
        (status = 404, description = "Order not found", content_type = "text/html"),
    )
)]
pub async fn printable_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> impl IntoResponse {
    match state.services.documents.render(&order_id).await {
        Some(html) => (StatusCode::OK, Html(html)),
        None => (
            StatusCode::NOT_FOUND,
            Html(state.services.documents.not_found_page(&order_id)),
        ),
    }
}
