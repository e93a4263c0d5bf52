//! Validation endpoint handlers

use axum::extract::{Path, State};
use tracing::{debug, info};

use crate::api::state::AppState;
use crate::api::types::json::JsonRejection;
use crate::api::types::{
    ApiError, Json, ValidateModelBody, ValidationResponse, ValidationSubmittedResponse,
};

use super::{ensure_initialized, model_error, parse_model_id};

/// POST /models/{model_id}/validations
pub async fn submit_validation(
    State(state): State<AppState>,
    Path(model_id): Path<String>,
    body: Result<Json<ValidateModelBody>, JsonRejection>,
) -> Result<Json<ValidationSubmittedResponse>, ApiError> {
    ensure_initialized(&state)?;
    let Json(body) = body?;
    let (request, key) = body.into_request()?;
    let id = parse_model_id(&model_id)?;
    let caller = key.identity();

    debug!(model_id = %id, validator = %caller, "Submitting validation");

    let committed = state
        .registry
        .validate(&id, request, &caller)
        .await
        .map_err(model_error)?;

    info!(
        model_id = %id,
        validator = %caller,
        is_valid = committed.value.is_valid(),
        "Model validated"
    );

    Ok(Json(ValidationSubmittedResponse::from(&committed)))
}

/// GET /models/{model_id}/validations
pub async fn list_validations(
    State(state): State<AppState>,
    Path(model_id): Path<String>,
) -> Result<Json<Vec<ValidationResponse>>, ApiError> {
    debug!(model_id = %model_id, "Listing validations");

    let id = parse_model_id(&model_id)?;
    let validations = state
        .registry
        .get_model_validations(&id)
        .await
        .map_err(model_error)?;

    Ok(Json(validations.iter().map(ValidationResponse::from).collect()))
}
