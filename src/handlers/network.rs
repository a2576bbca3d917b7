use std::net::IpAddr;

use axum::{extract::State, response::Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{ApiResponse, AppState, errors::ServiceError};

#[derive(Debug, Serialize, ToSchema)]
pub struct NetworkInfo {
    /// Non-loopback IPv4 addresses of the host, for reaching the service
    /// from other devices on the same network.
    pub addresses: Vec<String>,
    pub port: u16,
}

/// Addresses the service is reachable at on the local network
#[utoipa::path(
    get,
    path = "/api/v1/network-info",
    summary = "Local network addresses",
    responses(
        (status = 200, description = "Network info retrieved successfully", body = ApiResponse<NetworkInfo>),
        (status = 500, description = "Interface enumeration failed", body = crate::errors::ErrorResponse),
    )
)]
pub async fn network_info(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<NetworkInfo>>, ServiceError> {
    let interfaces = local_ip_address::list_afinet_netifas()
        .map_err(|e| ServiceError::InternalError(format!("Failed to list interfaces: {}", e)))?;

    let addresses = interfaces
        .into_iter()
        .filter_map(|(_, addr)| match addr {
            IpAddr::V4(v4) if !v4.is_loopback() => Some(v4.to_string()),
            _ => None,
        })
        .collect();

    Ok(Json(ApiResponse::success(NetworkInfo {
        addresses,
        port: state.config.port,
    })))
}
