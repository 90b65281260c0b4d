use axum::{extract::State, Json};
use serde::Serialize;

use crate::error::ApiError;
use crate::info::ServiceInfo;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerCallResponse {
    pub caller: String,
    pub called_service: String,
    pub discovery_method: String,
    pub peer_response: ServiceInfo,
}

/// GET /api/discovery/call-peer - look up the configured peer through the
/// registry and relay its info payload
///
/// Resolution and call failures are returned as-is: 503 when no instance is
/// registered, 502 when the call or its payload fails.
pub async fn call_peer(State(state): State<AppState>) -> Result<Json<PeerCallResponse>, ApiError> {
    let peer = &state.config.discovery.peer_service;
    let peer_response = state.client.fetch_info(peer).await?;

    Ok(Json(PeerCallResponse {
        caller: state.config.service.name.clone(),
        called_service: peer.clone(),
        discovery_method: state.client.describe(),
        peer_response,
    }))
}
