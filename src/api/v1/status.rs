//! Backend status endpoint

use axum::extract::State;

use crate::api::state::AppState;
use crate::api::types::{Json, StatusResponse};

/// GET /status
pub async fn get_status(State(state): State<AppState>) -> Json<StatusResponse> {
    let status = state.registry.status().await;

    Json(StatusResponse {
        contract_initialized: status.initialized,
        web3_connected: status.connected,
    })
}
