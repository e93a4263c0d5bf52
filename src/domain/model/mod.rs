//! Model domain - Registered model metadata

mod entity;
mod validation;

pub use entity::{Model, ModelId};
pub use validation::{
    check_registration, check_release, validate_identity, validate_metadata_uri,
    validate_model_id, validate_name, validate_name_length, validate_private_key,
    validate_version, ModelValidationError, MAX_NAME_LENGTH, METADATA_URI_SCHEME,
};
