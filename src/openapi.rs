use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Resupply API",
        version = "0.1.0",
        description = r#"
# Materials Resupply API

Ordering backend for consumable materials flowing between stores, factories
and outside suppliers.

## Features

- **Routing**: Per-source destination lists with auto-selection
- **Catalog**: Item browsing with frequently-ordered flags per source
- **Carts & Checkout**: Server-held carts with duplicate-order guarding
- **Order Ledger**: Append-only order history with a completion transition
- **Purchase-Order Sheets**: Printable HTML documents per order
- **Master Data**: Whole-list replacement of items, locations and suppliers
- **Change Notices**: SSE stream announcing which data key changed

## Error Handling

The API uses a consistent error response format:

```json
{
  "error": "Not Found",
  "message": "Order ORD-20240101-abc123 not found",
  "timestamp": "2024-01-01T00:00:00Z"
}
```

## Pagination

List endpoints support `page` (default: 1) and `limit` (default: 20).
        "#
    ),
    servers(
        (url = "http://localhost:3001", description = "Local development")
    ),
    tags(
        (name = "Routing", description = "Source-to-destination routing"),
        (name = "Catalog", description = "Item catalog and recommendations"),
        (name = "Carts", description = "Cart and checkout endpoints"),
        (name = "Orders", description = "Order ledger endpoints"),
        (name = "Masters", description = "Master data management"),
        (name = "Documents", description = "Printable purchase-order sheets"),
        (name = "System", description = "Network info and change notices")
    ),
    paths(
        crate::handlers::routing::list_destinations,

        crate::handlers::catalog::list_catalog,
        crate::handlers::catalog::list_categories,

        crate::handlers::carts::create_cart,
        crate::handlers::carts::get_cart,
        crate::handlers::carts::update_cart,
        crate::handlers::carts::add_item,
        crate::handlers::carts::adjust_quantity,
        crate::handlers::carts::checkout,

        crate::handlers::orders::list_orders,
        crate::handlers::orders::get_order,
        crate::handlers::orders::complete_order,

        crate::handlers::masters::list_items,
        crate::handlers::masters::replace_items,
        crate::handlers::masters::list_locations,
        crate::handlers::masters::replace_locations,
        crate::handlers::masters::list_suppliers,
        crate::handlers::masters::replace_suppliers,

        crate::handlers::documents::printable_order,
        crate::handlers::network::network_info,
        crate::handlers::changes::change_stream,
    ),
    components(
        schemas(
            // Common types
            crate::ApiResponse<serde_json::Value>,
            crate::PaginatedResponse<serde_json::Value>,
            crate::ListQuery,

            // Domain types
            crate::models::Location,
            crate::models::LocationType,
            crate::models::Supplier,
            crate::models::SupplierType,
            crate::models::ContactInfo,
            crate::models::Item,
            crate::models::OrderItem,
            crate::models::Order,
            crate::models::OrderStatus,

            // Routing and catalog types
            crate::services::routing::Destination,
            crate::services::routing::DestinationKind,
            crate::services::recommendations::CatalogEntry,
            crate::handlers::routing::DestinationsResponse,

            // Cart and order types
            crate::handlers::carts::CreateCartRequest,
            crate::handlers::carts::AddItemRequest,
            crate::handlers::carts::AdjustQuantityRequest,
            crate::handlers::carts::UpdateCartRequest,
            crate::handlers::carts::CartResponse,
            crate::handlers::orders::OrderResponse,

            // System types
            crate::handlers::network::NetworkInfo,

            // Error types
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_document_covers_core_paths() {
        let openapi = ApiDocV1::openapi();
        let json = serde_json::to_string_pretty(&openapi).unwrap();
        assert!(json.contains("Resupply API"));
        assert!(json.contains("/api/v1/orders"));
        assert!(json.contains("/api/v1/carts"));
        assert!(json.contains("/printable-order/{order_id}"));
    }
}
