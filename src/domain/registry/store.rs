//! Registry store trait

use std::fmt::Debug;

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::domain::{DomainError, Identity, Model, ModelId, Validation};

/// Durable keyed collection of models, their validation history and the
/// per-owner list of registered IDs.
///
/// Every mutating method is atomic: callers never observe a partial write.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RegistryStore: Send + Sync + Debug {
    /// Insert a new model and append its ID to the owner's list.
    /// Fails with `DuplicateKey` if the ID is already present.
    async fn put(&self, model: Model) -> Result<(), DomainError>;

    /// Fetch a model, failing with `NotFound` if absent
    async fn get(&self, id: &ModelId) -> Result<Model, DomainError>;

    /// Replace version and metadata URI only, returning the updated model
    async fn update(
        &self,
        id: &ModelId,
        version: &str,
        metadata_uri: &str,
    ) -> Result<Model, DomainError>;

    /// Append to a model's validation history; `NotFound` if the model is absent
    async fn append_validation(&self, validation: Validation) -> Result<(), DomainError>;

    /// Validation history in insertion order (empty for unknown IDs)
    async fn list_validations(&self, id: &ModelId) -> Result<Vec<Validation>, DomainError>;

    /// IDs registered by `owner`, in registration order
    async fn list_owned(&self, owner: &Identity) -> Result<Vec<ModelId>, DomainError>;

    /// Every model, in registration order
    async fn list(&self) -> Result<Vec<Model>, DomainError>;

    /// Connectivity probe
    async fn ping(&self) -> Result<(), DomainError>;
}
