//! API request, response and error types

pub mod error;
pub mod json;
pub mod models;

pub use error::{ApiError, ApiErrorResponse, ApiErrorType};
pub use json::Json;
pub use models::{
    Credential, ModelResponse, ModelTransactionResponse, RegisterModelBody, StatusResponse,
    UpdateModelBody, ValidateModelBody, ValidationResponse, ValidationSubmittedResponse,
};
