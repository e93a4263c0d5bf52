//! Registry API endpoints

pub mod models;
pub mod status;
pub mod users;
pub mod validations;

use axum::{
    routing::{get, post},
    Router,
};

use crate::domain::{DomainError, ModelId};

use super::state::AppState;
use super::types::ApiError;

/// Create the registry router, nested under the configured prefix
pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route("/models", get(models::list_models).post(models::register_model))
        .route("/models/", post(models::register_model))
        .route(
            "/models/{model_id}",
            get(models::get_model).put(models::update_model),
        )
        .route(
            "/models/{model_id}/validations",
            get(validations::list_validations).post(validations::submit_validation),
        )
        .route("/users/{owner}/models", get(users::list_user_models))
        .route("/status", get(status::get_status))
}

/// Mutating routes answer 503 before looking at the body
fn ensure_initialized(state: &AppState) -> Result<(), ApiError> {
    if state.registry.is_initialized() {
        Ok(())
    } else {
        Err(ApiError::unavailable(
            crate::infrastructure::services::NOT_INITIALIZED_DETAIL,
        ))
    }
}

/// A malformed id cannot name a registered model
fn parse_model_id(raw: &str) -> Result<ModelId, ApiError> {
    ModelId::parse(raw).map_err(|_| ApiError::not_found(MODEL_NOT_FOUND))
}

const MODEL_NOT_FOUND: &str = "Model not found";

/// Domain failures on model routes, with a uniform not-found detail
fn model_error(err: DomainError) -> ApiError {
    match err {
        DomainError::NotFound { message } => {
            tracing::debug!(reason = %message, "Model lookup missed");
            ApiError::not_found(MODEL_NOT_FOUND)
        }
        other => ApiError::from(other),
    }
}
