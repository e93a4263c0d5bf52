//! Registry request and response bodies

use serde::{Deserialize, Serialize};

use crate::domain::model::{check_release, validate_name, validate_name_length};
use crate::domain::{FieldError, Model, SigningKey, TransactionReceipt, Validation};
use crate::infrastructure::services::{
    Committed, RegisterModelRequest, UpdateModelRequest, ValidateModelRequest,
};

use super::error::ApiError;

/// Per-request signing key; never logged or echoed
#[derive(Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    fn signing_key(&self) -> Result<SigningKey, FieldError> {
        SigningKey::parse(&self.0).map_err(FieldError::from)
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential([REDACTED])")
    }
}

impl From<&SigningKey> for Credential {
    fn from(key: &SigningKey) -> Self {
        Self(key.expose_hex())
    }
}

/// Collect the key failure alongside the field failures, or hand back the key
fn finish<T>(
    value: T,
    mut errors: Vec<FieldError>,
    credential: &Credential,
) -> Result<(T, SigningKey), ApiError> {
    let key = match credential.signing_key() {
        Ok(key) => Some(key),
        Err(e) => {
            errors.push(e);
            None
        }
    };

    match key {
        Some(key) if errors.is_empty() => Ok((value, key)),
        _ => Err(ApiError::unprocessable("Invalid request", errors)),
    }
}

/// POST /models body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterModelBody {
    pub name: String,
    pub version: String,
    pub metadata_uri: String,
    pub private_key: Credential,
}

impl RegisterModelBody {
    /// Check every field and derive the signing key
    pub fn into_request(self) -> Result<(RegisterModelRequest, SigningKey), ApiError> {
        let mut errors: Vec<FieldError> = [validate_name(&self.name), validate_name_length(&self.name)]
            .into_iter()
            .filter_map(Result::err)
            .map(FieldError::from)
            .collect();
        errors.extend(check_release(&self.version, &self.metadata_uri));

        let request = RegisterModelRequest {
            name: self.name,
            version: self.version,
            metadata_uri: self.metadata_uri,
        };

        finish(request, errors, &self.private_key)
    }
}

/// PUT /models/{model_id} body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateModelBody {
    pub version: String,
    pub metadata_uri: String,
    pub private_key: Credential,
}

impl UpdateModelBody {
    pub fn into_request(self) -> Result<(UpdateModelRequest, SigningKey), ApiError> {
        let errors = check_release(&self.version, &self.metadata_uri);

        let request = UpdateModelRequest {
            version: self.version,
            metadata_uri: self.metadata_uri,
        };

        finish(request, errors, &self.private_key)
    }
}

/// POST /models/{model_id}/validations body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateModelBody {
    pub is_valid: bool,
    #[serde(default)]
    pub comments: String,
    pub private_key: Credential,
}

impl ValidateModelBody {
    pub fn into_request(self) -> Result<(ValidateModelRequest, SigningKey), ApiError> {
        let request = ValidateModelRequest {
            is_valid: self.is_valid,
            comments: self.comments,
        };

        finish(request, Vec::new(), &self.private_key)
    }
}

/// A registered model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelResponse {
    pub model_id: String,
    pub name: String,
    pub version: String,
    pub metadata_uri: String,
    pub owner: String,
    pub timestamp: i64,
    pub is_active: bool,
}

impl From<&Model> for ModelResponse {
    fn from(model: &Model) -> Self {
        Self {
            model_id: model.id().to_string(),
            name: model.name().to_string(),
            version: model.version().to_string(),
            metadata_uri: model.metadata_uri().to_string(),
            owner: model.owner().to_string(),
            timestamp: model.timestamp(),
            is_active: model.is_active(),
        }
    }
}

/// A model together with the receipt of the mutation that produced it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelTransactionResponse {
    #[serde(flatten)]
    pub model: ModelResponse,
    pub transaction_hash: String,
    pub block_number: u64,
}

impl From<&Committed<Model>> for ModelTransactionResponse {
    fn from(committed: &Committed<Model>) -> Self {
        Self {
            model: ModelResponse::from(&committed.value),
            transaction_hash: committed.receipt.transaction_hash.clone(),
            block_number: committed.receipt.block_number,
        }
    }
}

/// One entry of a model's validation history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResponse {
    pub validator: String,
    pub timestamp: i64,
    pub is_valid: bool,
    pub comments: String,
}

impl From<&Validation> for ValidationResponse {
    fn from(validation: &Validation) -> Self {
        Self {
            validator: validation.validator().to_string(),
            timestamp: validation.timestamp(),
            is_valid: validation.is_valid(),
            comments: validation.comments().to_string(),
        }
    }
}

/// Result of submitting a validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationSubmittedResponse {
    pub status: String,
    pub transaction_hash: String,
    pub block_number: u64,
    pub model_id: String,
    pub validation: ValidationResponse,
}

impl From<&Committed<Validation>> for ValidationSubmittedResponse {
    fn from(committed: &Committed<Validation>) -> Self {
        let TransactionReceipt {
            transaction_hash,
            block_number,
            ..
        } = &committed.receipt;

        Self {
            status: "success".to_string(),
            transaction_hash: transaction_hash.clone(),
            block_number: *block_number,
            model_id: committed.value.model_id().to_string(),
            validation: ValidationResponse::from(&committed.value),
        }
    }
}

/// GET /status body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub contract_initialized: bool,
    pub web3_connected: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    const KEY: &str = "0x0101010101010101010101010101010101010101010101010101010101010101";

    fn register_body(name: &str, version: &str, uri: &str, key: &str) -> RegisterModelBody {
        RegisterModelBody {
            name: name.to_string(),
            version: version.to_string(),
            metadata_uri: uri.to_string(),
            private_key: Credential::new(key),
        }
    }

    #[test]
    fn test_register_body_accepts_valid_fields() {
        let (request, key) = register_body("TestModel", "1.0.0", "ipfs://QmTest", KEY)
            .into_request()
            .unwrap();

        assert_eq!(request.name, "TestModel");
        assert_eq!(key.identity(), SigningKey::parse(KEY).unwrap().identity());
    }

    #[test]
    fn test_register_body_reports_every_failing_field() {
        let err = register_body(&"x".repeat(51), "1.0", "http://bad", "0x1234")
            .into_request()
            .unwrap_err();

        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);

        let fields: Vec<&str> = err
            .response
            .errors
            .iter()
            .map(|e| e.field.as_str())
            .collect();
        assert_eq!(fields, vec!["name", "version", "metadata_uri", "private_key"]);
    }

    #[test]
    fn test_update_body_rejects_bad_key_only() {
        let body = UpdateModelBody {
            version: "2.0.0".to_string(),
            metadata_uri: "ipfs://QmTestV2".to_string(),
            private_key: Credential::new("not-a-key"),
        };

        let err = body.into_request().unwrap_err();
        assert_eq!(err.response.errors.len(), 1);
        assert_eq!(err.response.errors[0].field, "private_key");
    }

    #[test]
    fn test_credential_debug_is_redacted() {
        let body = register_body("TestModel", "1.0.0", "ipfs://QmTest", KEY);
        let debug = format!("{:?}", body);

        assert!(!debug.contains(&KEY[2..]));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_validate_body_comments_default_to_empty() {
        let body: ValidateModelBody =
            serde_json::from_str(&format!(r#"{{"is_valid": true, "private_key": "{}"}}"#, KEY))
                .unwrap();

        assert_eq!(body.comments, "");
    }

    #[test]
    fn test_transaction_response_flattens_model() {
        let model = ModelResponse {
            model_id: "0xabc".to_string(),
            name: "TestModel".to_string(),
            version: "1.0.0".to_string(),
            metadata_uri: "ipfs://QmTest".to_string(),
            owner: "0xdef".to_string(),
            timestamp: 1_700_000_000,
            is_active: true,
        };
        let response = ModelTransactionResponse {
            model,
            transaction_hash: "0x01".to_string(),
            block_number: 7,
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["name"], "TestModel");
        assert_eq!(json["block_number"], 7);
        assert_eq!(json["transaction_hash"], "0x01");
    }
}
