//! Owner endpoint handlers

use axum::extract::{Path, State};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::{FieldError, Identity};

/// GET /users/{owner}/models
pub async fn list_user_models(
    State(state): State<AppState>,
    Path(owner): Path<String>,
) -> Result<Json<Vec<String>>, ApiError> {
    debug!(owner = %owner, "Listing owned models");

    let owner = Identity::parse(&owner).map_err(|e| {
        let error = FieldError::from(e);
        ApiError::unprocessable(error.message.clone(), vec![error])
    })?;

    let ids = state
        .registry
        .get_user_models(&owner)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(ids.iter().map(ToString::to_string).collect()))
}
