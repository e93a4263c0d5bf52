//! Application state for shared services

use std::sync::Arc;

use crate::domain::{DomainError, Identity, Model, ModelId, Validation};
use crate::infrastructure::services::{
    BackendStatus, Committed, RegisterModelRequest, RegistryService, UpdateModelRequest,
    ValidateModelRequest,
};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<dyn RegistryServiceTrait>,
}

impl AppState {
    pub fn new(registry: Arc<dyn RegistryServiceTrait>) -> Self {
        Self { registry }
    }
}

/// Trait for registry service operations
#[async_trait::async_trait]
pub trait RegistryServiceTrait: Send + Sync {
    fn is_initialized(&self) -> bool;
    async fn status(&self) -> BackendStatus;
    async fn register(
        &self,
        request: RegisterModelRequest,
        caller: &Identity,
    ) -> Result<Committed<Model>, DomainError>;
    async fn update(
        &self,
        id: &ModelId,
        request: UpdateModelRequest,
        caller: &Identity,
    ) -> Result<Committed<Model>, DomainError>;
    async fn validate(
        &self,
        id: &ModelId,
        request: ValidateModelRequest,
        caller: &Identity,
    ) -> Result<Committed<Validation>, DomainError>;
    async fn get_model(&self, id: &ModelId) -> Result<Model, DomainError>;
    async fn list_models(&self) -> Result<Vec<Model>, DomainError>;
    async fn get_model_validations(&self, id: &ModelId) -> Result<Vec<Validation>, DomainError>;
    async fn get_user_models(&self, owner: &Identity) -> Result<Vec<ModelId>, DomainError>;
}

#[async_trait::async_trait]
impl RegistryServiceTrait for RegistryService {
    fn is_initialized(&self) -> bool {
        RegistryService::is_initialized(self)
    }

    async fn status(&self) -> BackendStatus {
        RegistryService::status(self).await
    }

    async fn register(
        &self,
        request: RegisterModelRequest,
        caller: &Identity,
    ) -> Result<Committed<Model>, DomainError> {
        RegistryService::register(self, request, caller).await
    }

    async fn update(
        &self,
        id: &ModelId,
        request: UpdateModelRequest,
        caller: &Identity,
    ) -> Result<Committed<Model>, DomainError> {
        RegistryService::update(self, id, request, caller).await
    }

    async fn validate(
        &self,
        id: &ModelId,
        request: ValidateModelRequest,
        caller: &Identity,
    ) -> Result<Committed<Validation>, DomainError> {
        RegistryService::validate(self, id, request, caller).await
    }

    async fn get_model(&self, id: &ModelId) -> Result<Model, DomainError> {
        RegistryService::get_model(self, id).await
    }

    async fn list_models(&self) -> Result<Vec<Model>, DomainError> {
        RegistryService::list_models(self).await
    }

    async fn get_model_validations(&self, id: &ModelId) -> Result<Vec<Validation>, DomainError> {
        RegistryService::get_model_validations(self, id).await
    }

    async fn get_user_models(&self, owner: &Identity) -> Result<Vec<ModelId>, DomainError> {
        RegistryService::get_user_models(self, owner).await
    }
}
