//! HTTP client for a running registry server

mod error;

pub use error::ClientError;

use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::types::{
    Credential, ModelResponse, ModelTransactionResponse, RegisterModelBody, StatusResponse,
    UpdateModelBody, ValidateModelBody, ValidationResponse, ValidationSubmittedResponse,
};
use crate::domain::SigningKey;

pub const DEFAULT_API_URL: &str = "http://localhost:8001/api/v1";

#[derive(Deserialize)]
struct ErrorBody {
    detail: String,
}

/// Typed client over the registry routes
#[derive(Debug, Clone)]
pub struct RegistryClient {
    client: reqwest::Client,
    base_url: String,
}

impl RegistryClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        reqwest::Url::parse(&base_url).map_err(|e| ClientError::InvalidUrl {
            message: format!("{}: {}", base_url, e),
        })?;

        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn status(&self) -> Result<StatusResponse, ClientError> {
        self.send(Method::GET, "/status", None::<&()>).await
    }

    pub async fn register_model(
        &self,
        name: &str,
        version: &str,
        metadata_uri: &str,
        key: &SigningKey,
    ) -> Result<ModelTransactionResponse, ClientError> {
        let body = RegisterModelBody {
            name: name.to_string(),
            version: version.to_string(),
            metadata_uri: metadata_uri.to_string(),
            private_key: Credential::from(key),
        };

        self.send(Method::POST, "/models/", Some(&body)).await
    }

    pub async fn get_model(&self, model_id: &str) -> Result<ModelResponse, ClientError> {
        self.send(Method::GET, &format!("/models/{}", model_id), None::<&()>)
            .await
    }

    pub async fn list_models(&self) -> Result<Vec<ModelResponse>, ClientError> {
        self.send(Method::GET, "/models", None::<&()>).await
    }

    pub async fn update_model(
        &self,
        model_id: &str,
        version: &str,
        metadata_uri: &str,
        key: &SigningKey,
    ) -> Result<ModelTransactionResponse, ClientError> {
        let body = UpdateModelBody {
            version: version.to_string(),
            metadata_uri: metadata_uri.to_string(),
            private_key: Credential::from(key),
        };

        self.send(Method::PUT, &format!("/models/{}", model_id), Some(&body))
            .await
    }

    pub async fn validate_model(
        &self,
        model_id: &str,
        is_valid: bool,
        comments: &str,
        key: &SigningKey,
    ) -> Result<ValidationSubmittedResponse, ClientError> {
        let body = ValidateModelBody {
            is_valid,
            comments: comments.to_string(),
            private_key: Credential::from(key),
        };

        self.send(
            Method::POST,
            &format!("/models/{}/validations", model_id),
            Some(&body),
        )
        .await
    }

    pub async fn get_model_validations(
        &self,
        model_id: &str,
    ) -> Result<Vec<ValidationResponse>, ClientError> {
        self.send(
            Method::GET,
            &format!("/models/{}/validations", model_id),
            None::<&()>,
        )
        .await
    }

    pub async fn get_user_models(&self, owner: &str) -> Result<Vec<String>, ClientError> {
        self.send(Method::GET, &format!("/users/{}/models", owner), None::<&()>)
            .await
    }

    async fn send<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!(method = %method, url = %url, "Sending registry request");

        let mut request = self.client.request(method, &url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        let text = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.detail)
            .unwrap_or_else(|_| {
                if text.is_empty() {
                    status.to_string()
                } else {
                    text
                }
            });

        Err(ClientError::Api {
            status: status.as_u16(),
            detail,
        })
    }
}
