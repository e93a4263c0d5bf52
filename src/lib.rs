//! Model Registry
//!
//! A registry of machine-learning model metadata:
//! - Registration keyed by a deterministic id over name and version
//! - Owner-only updates of version and metadata URI
//! - Third-party validations with an append-only history
//! - In-memory or PostgreSQL storage

pub mod api;
pub mod cli;
pub mod client;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use self::config::AppConfig;

use std::sync::Arc;

use tracing::{info, warn};

use api::state::AppState;
use domain::DomainError;
use infrastructure::registry::{RegistryStoreFactory, StoreConfig};
use infrastructure::services::RegistryService;

/// Create the application state with the default configuration
pub async fn create_app_state() -> Result<AppState, DomainError> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> Result<AppState, DomainError> {
    let storage = &config.registry.storage;
    let store_config =
        StoreConfig::from_settings(&storage.backend, storage.url.as_deref(), storage.max_connections)?;

    info!(backend = ?store_config.store_type(), "Creating registry store");
    let store = RegistryStoreFactory::create(&store_config).await?;

    match &config.registry.address {
        Some(address) => info!(address = %address, "Registry initialized"),
        None => warn!("Registry address not configured; registry routes will answer 503"),
    }

    let service = RegistryService::new(store, config.registry.address.clone());

    Ok(AppState::new(Arc::new(service)))
}
