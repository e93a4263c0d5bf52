//! Model endpoint handlers

use axum::extract::{Path, State};
use tracing::{debug, info};

use crate::api::state::AppState;
use crate::api::types::json::JsonRejection;
use crate::api::types::{
    ApiError, Json, ModelResponse, ModelTransactionResponse, RegisterModelBody, UpdateModelBody,
};

use super::{ensure_initialized, model_error, parse_model_id};

/// POST /models
pub async fn register_model(
    State(state): State<AppState>,
    body: Result<Json<RegisterModelBody>, JsonRejection>,
) -> Result<Json<ModelTransactionResponse>, ApiError> {
    ensure_initialized(&state)?;
    let Json(body) = body?;
    let (request, key) = body.into_request()?;
    let caller = key.identity();

    debug!(name = %request.name, version = %request.version, caller = %caller, "Registering model");

    let committed = state
        .registry
        .register(request, &caller)
        .await
        .map_err(ApiError::from)?;

    info!(
        model_id = %committed.value.id(),
        owner = %caller,
        "Model registered"
    );

    Ok(Json(ModelTransactionResponse::from(&committed)))
}

/// GET /models
pub async fn list_models(
    State(state): State<AppState>,
) -> Result<Json<Vec<ModelResponse>>, ApiError> {
    debug!("Listing all models");

    let models = state
        .registry
        .list_models()
        .await
        .map_err(ApiError::from)?;

    Ok(Json(models.iter().map(ModelResponse::from).collect()))
}

/// GET /models/{model_id}
pub async fn get_model(
    State(state): State<AppState>,
    Path(model_id): Path<String>,
) -> Result<Json<ModelResponse>, ApiError> {
    debug!(model_id = %model_id, "Getting model");

    let id = parse_model_id(&model_id)?;
    let model = state.registry.get_model(&id).await.map_err(model_error)?;

    Ok(Json(ModelResponse::from(&model)))
}

/// PUT /models/{model_id}
pub async fn update_model(
    State(state): State<AppState>,
    Path(model_id): Path<String>,
    body: Result<Json<UpdateModelBody>, JsonRejection>,
) -> Result<Json<ModelTransactionResponse>, ApiError> {
    ensure_initialized(&state)?;
    let Json(body) = body?;
    let (request, key) = body.into_request()?;
    let id = parse_model_id(&model_id)?;
    let caller = key.identity();

    debug!(model_id = %id, caller = %caller, "Updating model");

    let committed = state
        .registry
        .update(&id, request, &caller)
        .await
        .map_err(model_error)?;

    info!(model_id = %id, version = %committed.value.version(), "Model updated");

    Ok(Json(ModelTransactionResponse::from(&committed)))
}
