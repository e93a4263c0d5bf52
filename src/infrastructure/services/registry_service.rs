//! Registry service - Registration, update, validation and queries

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::model::{check_registration, check_release};
use crate::domain::{
    DomainError, Identity, Model, ModelId, RegistryEvent, RegistryStore, TransactionReceipt,
    Validation,
};
use crate::infrastructure::observability::record_registry_operation;

/// Detail reported while the registry has no address configured
pub const NOT_INITIALIZED_DETAIL: &str =
    "Smart contract not initialized. Please set registry.address (APP__REGISTRY__ADDRESS).";

/// Request to register a new model
#[derive(Debug, Clone)]
pub struct RegisterModelRequest {
    pub name: String,
    pub version: String,
    pub metadata_uri: String,
}

/// Request to replace a model's version and metadata URI
#[derive(Debug, Clone)]
pub struct UpdateModelRequest {
    pub version: String,
    pub metadata_uri: String,
}

/// Request to attach a validation to a model
#[derive(Debug, Clone)]
pub struct ValidateModelRequest {
    pub is_valid: bool,
    pub comments: String,
}

/// A committed mutation: the resulting value and its receipt
#[derive(Debug, Clone)]
pub struct Committed<T> {
    pub value: T,
    pub receipt: TransactionReceipt,
}

/// Backend readiness as reported by the status endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendStatus {
    pub initialized: bool,
    pub connected: bool,
}

/// Applies registry state transitions on top of a [`RegistryStore`]
#[derive(Debug)]
pub struct RegistryService {
    store: Arc<dyn RegistryStore>,
    /// Registry instance address; `None` until configured
    address: Option<String>,
    block_number: AtomicU64,
}

impl RegistryService {
    pub fn new(store: Arc<dyn RegistryStore>, address: Option<String>) -> Self {
        Self {
            store,
            address,
            block_number: AtomicU64::new(0),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.address.is_some()
    }

    pub async fn status(&self) -> BackendStatus {
        let connected = match self.store.ping().await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Registry store unreachable");
                false
            }
        };

        BackendStatus {
            initialized: self.is_initialized(),
            connected,
        }
    }

    /// Register a model owned by `caller`
    pub async fn register(
        &self,
        request: RegisterModelRequest,
        caller: &Identity,
    ) -> Result<Committed<Model>, DomainError> {
        let result = self.register_inner(request, caller).await;
        record_registry_operation("register", outcome(&result));
        result
    }

    async fn register_inner(
        &self,
        request: RegisterModelRequest,
        caller: &Identity,
    ) -> Result<Committed<Model>, DomainError> {
        let address = self.address()?;

        let errors = check_registration(&request.name, &request.version, &request.metadata_uri);
        if !errors.is_empty() {
            return Err(DomainError::invalid_fields(errors));
        }

        let model = Model::new(
            request.name,
            request.version,
            request.metadata_uri,
            caller.clone(),
        );

        self.store.put(model.clone()).await.map_err(|e| match e {
            DomainError::DuplicateKey { .. } => DomainError::already_exists("Model already exists"),
            other => other,
        })?;

        let receipt = self.commit(
            address,
            caller,
            RegistryEvent::ModelRegistered {
                model_id: model.id().clone(),
                name: model.name().to_string(),
                version: model.version().to_string(),
                owner: caller.clone(),
            },
        );

        Ok(Committed {
            value: model,
            receipt,
        })
    }

    /// Replace version and metadata URI; only the owner may do this
    pub async fn update(
        &self,
        id: &ModelId,
        request: UpdateModelRequest,
        caller: &Identity,
    ) -> Result<Committed<Model>, DomainError> {
        let result = self.update_inner(id, request, caller).await;
        record_registry_operation("update", outcome(&result));
        result
    }

    async fn update_inner(
        &self,
        id: &ModelId,
        request: UpdateModelRequest,
        caller: &Identity,
    ) -> Result<Committed<Model>, DomainError> {
        let address = self.address()?;

        let errors = check_release(&request.version, &request.metadata_uri);
        if !errors.is_empty() {
            return Err(DomainError::invalid_fields(errors));
        }

        let existing = self.store.get(id).await?;

        if !existing.is_owned_by(caller) {
            return Err(DomainError::not_owner("Not the model owner"));
        }

        let model = self
            .store
            .update(id, &request.version, &request.metadata_uri)
            .await?;

        let receipt = self.commit(
            address,
            caller,
            RegistryEvent::ModelUpdated {
                model_id: id.clone(),
                version: model.version().to_string(),
                metadata_uri: model.metadata_uri().to_string(),
            },
        );

        Ok(Committed {
            value: model,
            receipt,
        })
    }

    /// Attach a validation; the owner may not validate their own model.
    ///
    /// Repeated validations by the same identity are all recorded.
    pub async fn validate(
        &self,
        id: &ModelId,
        request: ValidateModelRequest,
        caller: &Identity,
    ) -> Result<Committed<Validation>, DomainError> {
        let result = self.validate_inner(id, request, caller).await;
        record_registry_operation("validate", outcome(&result));
        result
    }

    async fn validate_inner(
        &self,
        id: &ModelId,
        request: ValidateModelRequest,
        caller: &Identity,
    ) -> Result<Committed<Validation>, DomainError> {
        let address = self.address()?;
        let model = self.store.get(id).await?;

        if model.is_owned_by(caller) {
            return Err(DomainError::self_validation(
                "Owner cannot validate own model",
            ));
        }

        let validation = Validation::new(
            id.clone(),
            caller.clone(),
            request.is_valid,
            request.comments,
        );
        self.store.append_validation(validation.clone()).await?;

        let receipt = self.commit(
            address,
            caller,
            RegistryEvent::ModelValidated {
                model_id: id.clone(),
                validator: caller.clone(),
                is_valid: validation.is_valid(),
                comments: validation.comments().to_string(),
            },
        );

        Ok(Committed {
            value: validation,
            receipt,
        })
    }

    pub async fn get_model(&self, id: &ModelId) -> Result<Model, DomainError> {
        self.address()?;
        self.store.get(id).await
    }

    pub async fn list_models(&self) -> Result<Vec<Model>, DomainError> {
        self.address()?;
        self.store.list().await
    }

    /// Validation history of a known model, oldest first
    pub async fn get_model_validations(&self, id: &ModelId) -> Result<Vec<Validation>, DomainError> {
        self.address()?;
        self.store.get(id).await?;
        self.store.list_validations(id).await
    }

    /// IDs registered by `owner`, in registration order
    pub async fn get_user_models(&self, owner: &Identity) -> Result<Vec<ModelId>, DomainError> {
        self.address()?;
        self.store.list_owned(owner).await
    }

    fn address(&self) -> Result<&str, DomainError> {
        self.address
            .as_deref()
            .ok_or_else(|| DomainError::backend_unavailable(NOT_INITIALIZED_DETAIL))
    }

    /// Assign the next block number, build the receipt and log the event
    fn commit(&self, address: &str, caller: &Identity, event: RegistryEvent) -> TransactionReceipt {
        let block_number = self.block_number.fetch_add(1, Ordering::SeqCst) + 1;

        info!(
            event = event.name(),
            model_id = %event.model_id(),
            from = %caller,
            block_number,
            "Registry event emitted"
        );
        debug!(event = ?event, "Registry event payload");

        TransactionReceipt::new(address, block_number, caller.clone(), vec![event])
    }
}

fn outcome<T>(result: &Result<T, DomainError>) -> &'static str {
    match result {
        Ok(_) => "success",
        Err(
            DomainError::Validation { .. }
            | DomainError::NotFound { .. }
            | DomainError::AlreadyExists { .. }
            | DomainError::NotOwner { .. }
            | DomainError::SelfValidation { .. },
        ) => "rejected",
        Err(_) => "error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::registry::MockRegistryStore;
    use crate::domain::SigningKey;
    use crate::infrastructure::registry::InMemoryRegistryStore;

    const REGISTRY: &str = "0x5fbdb2315678afecb367f032d93f642f64180aa3";

    fn identity(seed: u8) -> Identity {
        let key = format!("0x{}", hex::encode([seed; 32]));
        SigningKey::parse(&key).unwrap().identity()
    }

    fn owner() -> Identity {
        identity(1)
    }

    fn validator() -> Identity {
        identity(2)
    }

    fn create_service() -> RegistryService {
        RegistryService::new(
            Arc::new(InMemoryRegistryStore::new()),
            Some(REGISTRY.to_string()),
        )
    }

    fn register_request(name: &str, version: &str, uri: &str) -> RegisterModelRequest {
        RegisterModelRequest {
            name: name.to_string(),
            version: version.to_string(),
            metadata_uri: uri.to_string(),
        }
    }

    async fn register_test_model(service: &RegistryService) -> ModelId {
        service
            .register(register_request("TestModel", "1.0.0", "ipfs://QmTest"), &owner())
            .await
            .unwrap()
            .value
            .id()
            .clone()
    }

    #[tokio::test]
    async fn test_register_model() {
        let service = create_service();

        let committed = service
            .register(register_request("TestModel", "1.0.0", "ipfs://QmTest"), &owner())
            .await
            .unwrap();

        let model = committed.value;
        assert_eq!(model.id(), &ModelId::derive("TestModel", "1.0.0"));
        assert_eq!(model.owner(), &owner());
        assert!(model.is_active());

        let receipt = committed.receipt;
        assert_eq!(receipt.block_number, 1);
        assert_eq!(receipt.from, owner());
        assert_eq!(
            receipt.events,
            vec![RegistryEvent::ModelRegistered {
                model_id: model.id().clone(),
                name: "TestModel".to_string(),
                version: "1.0.0".to_string(),
                owner: owner(),
            }]
        );

        let fetched = service.get_model(model.id()).await.unwrap();
        assert_eq!(fetched.metadata_uri(), "ipfs://QmTest");
    }

    #[tokio::test]
    async fn test_register_twice_fails_with_already_exists() {
        let service = create_service();
        register_test_model(&service).await;

        let result = service
            .register(register_request("TestModel", "1.0.0", "ipfs://QmOther"), &validator())
            .await;

        assert!(matches!(result, Err(DomainError::AlreadyExists { .. })));
        assert_eq!(service.list_models().await.unwrap().len(), 1);
        assert!(service.get_user_models(&validator()).await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_registrations_of_same_pair_admit_one_owner() {
        let service = Arc::new(create_service());

        let handles: Vec<_> = (1..=32u8)
            .map(|seed| {
                let service = Arc::clone(&service);
                tokio::spawn(async move {
                    let caller = identity(seed);
                    let result = service
                        .register(register_request("Race", "1.0.0", "ipfs://QmRace"), &caller)
                        .await;
                    (caller, result)
                })
            })
            .collect();

        let mut winners = Vec::new();
        let mut losers = Vec::new();
        for handle in handles {
            let (caller, result) = handle.await.unwrap();
            match result {
                Ok(_) => winners.push(caller),
                Err(DomainError::AlreadyExists { .. }) => losers.push(caller),
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }

        assert_eq!(winners.len(), 1);
        assert_eq!(losers.len(), 31);

        let id = ModelId::derive("Race", "1.0.0");
        let models = service.list_models().await.unwrap();
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].owner(), &winners[0]);
        assert_eq!(service.get_user_models(&winners[0]).await.unwrap(), vec![id]);
        for loser in &losers {
            assert!(service.get_user_models(loser).await.unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_fields() {
        let service = create_service();

        let result = service
            .register(register_request("", "1.0", "https://x"), &owner())
            .await;

        match result {
            Err(DomainError::Validation { errors, .. }) => assert_eq!(errors.len(), 3),
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(service.list_models().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_register_accepts_whitespace_only_name() {
        let service = create_service();

        let committed = service
            .register(register_request("   ", "1.0.0", "ipfs://QmTest"), &owner())
            .await
            .unwrap();

        assert_eq!(committed.value.name(), "   ");
        assert_eq!(committed.value.id(), &ModelId::derive("   ", "1.0.0"));
    }

    #[tokio::test]
    async fn test_user_models_track_registration_order() {
        let service = create_service();

        service
            .register(register_request("Model1", "1.0.0", "ipfs://Qm1"), &owner())
            .await
            .unwrap();
        service
            .register(register_request("Model2", "1.0.0", "ipfs://Qm2"), &owner())
            .await
            .unwrap();

        let user_models = service.get_user_models(&owner()).await.unwrap();
        assert_eq!(user_models.len(), 2);

        let first = service.get_model(&user_models[0]).await.unwrap();
        let second = service.get_model(&user_models[1]).await.unwrap();
        assert_eq!(first.name(), "Model1");
        assert_eq!(second.name(), "Model2");
    }

    #[tokio::test]
    async fn test_update_model_by_owner() {
        let service = create_service();
        let id = register_test_model(&service).await;

        let committed = service
            .update(
                &id,
                UpdateModelRequest {
                    version: "2.0.0".to_string(),
                    metadata_uri: "ipfs://QmTestV2".to_string(),
                },
                &owner(),
            )
            .await
            .unwrap();

        assert_eq!(
            committed.receipt.events,
            vec![RegistryEvent::ModelUpdated {
                model_id: id.clone(),
                version: "2.0.0".to_string(),
                metadata_uri: "ipfs://QmTestV2".to_string(),
            }]
        );

        let model = service.get_model(&id).await.unwrap();
        assert_eq!(model.version(), "2.0.0");
        assert_eq!(model.metadata_uri(), "ipfs://QmTestV2");
        assert_eq!(model.name(), "TestModel");
    }

    #[tokio::test]
    async fn test_update_by_non_owner_leaves_model_unchanged() {
        let service = create_service();
        let id = register_test_model(&service).await;

        let result = service
            .update(
                &id,
                UpdateModelRequest {
                    version: "2.0.0".to_string(),
                    metadata_uri: "ipfs://QmTestV2".to_string(),
                },
                &validator(),
            )
            .await;

        assert!(matches!(result, Err(DomainError::NotOwner { .. })));

        let model = service.get_model(&id).await.unwrap();
        assert_eq!(model.version(), "1.0.0");
        assert_eq!(model.metadata_uri(), "ipfs://QmTest");
    }

    #[tokio::test]
    async fn test_update_missing_model() {
        let service = create_service();

        let result = service
            .update(
                &ModelId::derive("Missing", "1.0.0"),
                UpdateModelRequest {
                    version: "2.0.0".to_string(),
                    metadata_uri: "ipfs://QmTestV2".to_string(),
                },
                &owner(),
            )
            .await;

        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_validate_model() {
        let service = create_service();
        let id = register_test_model(&service).await;

        let committed = service
            .validate(
                &id,
                ValidateModelRequest {
                    is_valid: true,
                    comments: "Good model".to_string(),
                },
                &validator(),
            )
            .await
            .unwrap();

        assert_eq!(committed.value.validator(), &validator());
        assert_eq!(committed.receipt.events[0].name(), "ModelValidated");

        let history = service.get_model_validations(&id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].validator(), &validator());
        assert!(history[0].is_valid());
        assert_eq!(history[0].comments(), "Good model");
    }

    #[tokio::test]
    async fn test_owner_cannot_validate_own_model() {
        let service = create_service();
        let id = register_test_model(&service).await;

        let result = service
            .validate(
                &id,
                ValidateModelRequest {
                    is_valid: true,
                    comments: "Self validation".to_string(),
                },
                &owner(),
            )
            .await;

        assert!(matches!(result, Err(DomainError::SelfValidation { .. })));
        assert!(service.get_model_validations(&id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_repeated_validation_appends_each_time() {
        let service = create_service();
        let id = register_test_model(&service).await;

        for expected in 1..=3 {
            service
                .validate(
                    &id,
                    ValidateModelRequest {
                        is_valid: expected % 2 == 1,
                        comments: format!("round {}", expected),
                    },
                    &validator(),
                )
                .await
                .unwrap();

            let history = service.get_model_validations(&id).await.unwrap();
            assert_eq!(history.len(), expected);
        }
    }

    #[tokio::test]
    async fn test_validate_missing_model() {
        let service = create_service();

        let result = service
            .validate(
                &ModelId::derive("fake", "0.0.0"),
                ValidateModelRequest {
                    is_valid: true,
                    comments: "Validation".to_string(),
                },
                &validator(),
            )
            .await;

        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_validations_of_missing_model_not_found() {
        let service = create_service();
        let result = service
            .get_model_validations(&ModelId::derive("fake", "0.0.0"))
            .await;

        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_block_numbers_increase() {
        let service = create_service();
        let id = register_test_model(&service).await;

        let committed = service
            .validate(
                &id,
                ValidateModelRequest {
                    is_valid: false,
                    comments: "Needs work".to_string(),
                },
                &validator(),
            )
            .await
            .unwrap();

        assert_eq!(committed.receipt.block_number, 2);
    }

    #[tokio::test]
    async fn test_uninitialized_registry_is_unavailable() {
        let service = RegistryService::new(Arc::new(InMemoryRegistryStore::new()), None);

        let status = service.status().await;
        assert!(!status.initialized);
        assert!(status.connected);

        let result = service
            .register(register_request("TestModel", "1.0.0", "ipfs://QmTest"), &owner())
            .await;
        assert!(matches!(result, Err(DomainError::BackendUnavailable { .. })));
        assert!(service.list_models().await.is_err());
    }

    #[tokio::test]
    async fn test_status_reports_unreachable_store() {
        let mut store = MockRegistryStore::new();
        store
            .expect_ping()
            .returning(|| Err(DomainError::backend_unavailable("connection refused")));

        let service = RegistryService::new(Arc::new(store), Some(REGISTRY.to_string()));
        let status = service.status().await;

        assert!(status.initialized);
        assert!(!status.connected);
    }

    #[tokio::test]
    async fn test_non_owner_update_never_reaches_store_write() {
        let model = Model::new("TestModel", "1.0.0", "ipfs://QmTest", owner());
        let id = model.id().clone();

        let mut store = MockRegistryStore::new();
        store.expect_get().returning(move |_| Ok(model.clone()));
        store.expect_update().never();

        let service = RegistryService::new(Arc::new(store), Some(REGISTRY.to_string()));
        let result = service
            .update(
                &id,
                UpdateModelRequest {
                    version: "2.0.0".to_string(),
                    metadata_uri: "ipfs://QmTestV2".to_string(),
                },
                &validator(),
            )
            .await;

        assert!(matches!(result, Err(DomainError::NotOwner { .. })));
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let mut store = MockRegistryStore::new();
        store
            .expect_put()
            .returning(|_| Err(DomainError::storage("disk full")));

        let service = RegistryService::new(Arc::new(store), Some(REGISTRY.to_string()));
        let result = service
            .register(register_request("TestModel", "1.0.0", "ipfs://QmTest"), &owner())
            .await;

        assert!(matches!(result, Err(DomainError::Storage { .. })));
    }
}
