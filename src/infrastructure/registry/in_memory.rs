//! In-memory registry store

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::{DomainError, Identity, Model, ModelId, RegistryStore, Validation};

#[derive(Debug, Default)]
struct RegistryState {
    models: HashMap<ModelId, Model>,
    /// Registration order of every model
    order: Vec<ModelId>,
    validations: HashMap<ModelId, Vec<Validation>>,
    owned: HashMap<Identity, Vec<ModelId>>,
}

/// Thread-safe in-memory registry store
///
/// All state sits behind one lock, so each mutation is a single critical
/// section. Data is lost when the process terminates.
#[derive(Debug, Default)]
pub struct InMemoryRegistryStore {
    state: RwLock<RegistryState>,
}

impl InMemoryRegistryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, RegistryState>, DomainError> {
        self.state
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, RegistryState>, DomainError> {
        self.state
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))
    }
}

fn model_not_found(id: &ModelId) -> DomainError {
    DomainError::not_found(format!("Model '{}' not found", id))
}

#[async_trait]
impl RegistryStore for InMemoryRegistryStore {
    async fn put(&self, model: Model) -> Result<(), DomainError> {
        let mut state = self.write()?;
        let id = model.id().clone();

        if state.models.contains_key(&id) {
            return Err(DomainError::duplicate_key(id.as_str()));
        }

        state
            .owned
            .entry(model.owner().clone())
            .or_default()
            .push(id.clone());
        state.order.push(id.clone());
        state.models.insert(id, model);

        Ok(())
    }

    async fn get(&self, id: &ModelId) -> Result<Model, DomainError> {
        self.read()?
            .models
            .get(id)
            .cloned()
            .ok_or_else(|| model_not_found(id))
    }

    async fn update(
        &self,
        id: &ModelId,
        version: &str,
        metadata_uri: &str,
    ) -> Result<Model, DomainError> {
        let mut state = self.write()?;
        let model = state.models.get_mut(id).ok_or_else(|| model_not_found(id))?;

        model.set_release(version, metadata_uri);
        Ok(model.clone())
    }

    async fn append_validation(&self, validation: Validation) -> Result<(), DomainError> {
        let mut state = self.write()?;
        let id = validation.model_id().clone();

        if !state.models.contains_key(&id) {
            return Err(model_not_found(&id));
        }

        state.validations.entry(id).or_default().push(validation);
        Ok(())
    }

    async fn list_validations(&self, id: &ModelId) -> Result<Vec<Validation>, DomainError> {
        Ok(self.read()?.validations.get(id).cloned().unwrap_or_default())
    }

    async fn list_owned(&self, owner: &Identity) -> Result<Vec<ModelId>, DomainError> {
        Ok(self.read()?.owned.get(owner).cloned().unwrap_or_default())
    }

    async fn list(&self) -> Result<Vec<Model>, DomainError> {
        let state = self.read()?;

        Ok(state
            .order
            .iter()
            .filter_map(|id| state.models.get(id).cloned())
            .collect())
    }

    async fn ping(&self) -> Result<(), DomainError> {
        self.read().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn alice() -> Identity {
        Identity::parse("0x1111111111111111111111111111111111111111").unwrap()
    }

    fn bob() -> Identity {
        Identity::parse("0x2222222222222222222222222222222222222222").unwrap()
    }

    fn model(name: &str, owner: Identity) -> Model {
        Model::new(name, "1.0.0", format!("ipfs://{}", name), owner)
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let store = InMemoryRegistryStore::new();
        let model = model("TestModel", alice());

        store.put(model.clone()).await.unwrap();

        assert_eq!(store.get(model.id()).await.unwrap(), model);
    }

    #[tokio::test]
    async fn test_put_duplicate_keeps_single_record() {
        let store = InMemoryRegistryStore::new();
        store.put(model("TestModel", alice())).await.unwrap();

        let result = store.put(model("TestModel", bob())).await;

        assert!(matches!(result, Err(DomainError::DuplicateKey { .. })));
        assert_eq!(store.list().await.unwrap().len(), 1);
        assert!(store.list_owned(&bob()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let store = InMemoryRegistryStore::new();
        let result = store.get(&ModelId::derive("Missing", "1.0.0")).await;

        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_update_replaces_release_fields_only() {
        let store = InMemoryRegistryStore::new();
        let original = model("TestModel", alice());
        store.put(original.clone()).await.unwrap();

        let updated = store
            .update(original.id(), "2.0.0", "ipfs://QmTestV2")
            .await
            .unwrap();

        assert_eq!(updated.version(), "2.0.0");
        assert_eq!(updated.metadata_uri(), "ipfs://QmTestV2");
        assert_eq!(updated.name(), original.name());
        assert_eq!(updated.owner(), original.owner());
        assert_eq!(updated.timestamp(), original.timestamp());
        assert_eq!(store.get(original.id()).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store = InMemoryRegistryStore::new();
        let result = store
            .update(&ModelId::derive("Missing", "1.0.0"), "2.0.0", "ipfs://x")
            .await;

        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_validations_append_in_order() {
        let store = InMemoryRegistryStore::new();
        let model = model("TestModel", alice());
        store.put(model.clone()).await.unwrap();

        store
            .append_validation(Validation::new(model.id().clone(), bob(), true, "first"))
            .await
            .unwrap();
        store
            .append_validation(Validation::new(model.id().clone(), bob(), false, "second"))
            .await
            .unwrap();

        let history = store.list_validations(model.id()).await.unwrap();
        let comments: Vec<&str> = history.iter().map(|v| v.comments()).collect();

        assert_eq!(comments, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_append_validation_for_missing_model() {
        let store = InMemoryRegistryStore::new();
        let validation = Validation::new(ModelId::derive("Missing", "1.0.0"), bob(), true, "x");

        let result = store.append_validation(validation).await;

        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_list_owned_and_list_keep_registration_order() {
        let store = InMemoryRegistryStore::new();
        let names = ["Zeta", "Alpha", "Mid"];

        for name in names {
            store.put(model(name, alice())).await.unwrap();
        }
        store.put(model("Other", bob())).await.unwrap();

        let owned = store.list_owned(&alice()).await.unwrap();
        let expected: Vec<ModelId> = names
            .iter()
            .map(|n| ModelId::derive(n, "1.0.0"))
            .collect();
        assert_eq!(owned, expected);

        let listed: Vec<String> = store
            .list()
            .await
            .unwrap()
            .iter()
            .map(|m| m.name().to_string())
            .collect();
        assert_eq!(listed, vec!["Zeta", "Alpha", "Mid", "Other"]);
    }

    #[tokio::test]
    async fn test_ping() {
        assert!(InMemoryRegistryStore::new().ping().await.is_ok());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_puts_of_same_id_keep_one() {
        let store = Arc::new(InMemoryRegistryStore::new());
        let owners: Vec<Identity> = (1..=32u32)
            .map(|n| Identity::parse(&format!("0x{n:040x}")).unwrap())
            .collect();

        let handles: Vec<_> = owners
            .iter()
            .cloned()
            .map(|owner| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.put(model("Race", owner)).await })
            })
            .collect();

        let mut stored = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(()) => stored += 1,
                Err(DomainError::DuplicateKey { .. }) => {}
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }
        assert_eq!(stored, 1);

        let models = store.list().await.unwrap();
        assert_eq!(models.len(), 1);

        let mut owning = 0;
        for owner in &owners {
            let owned = store.list_owned(owner).await.unwrap();
            if owner == models[0].owner() {
                assert_eq!(owned, vec![ModelId::derive("Race", "1.0.0")]);
                owning += 1;
            } else {
                assert!(owned.is_empty());
            }
        }
        assert_eq!(owning, 1);
    }
}
