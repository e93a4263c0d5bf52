//! Registry store factory for runtime backend selection

use std::sync::Arc;

use crate::domain::{DomainError, RegistryStore};

use super::in_memory::InMemoryRegistryStore;
use super::postgres::{PostgresConfig, PostgresRegistryStore};

/// Supported store backends
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreType {
    /// In-memory store (for testing/development)
    InMemory,
    /// PostgreSQL store
    Postgres,
}

impl StoreType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Some(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Some(Self::Postgres),
            _ => None,
        }
    }
}

/// Store configuration
#[derive(Debug, Clone)]
pub enum StoreConfig {
    InMemory,
    Postgres(PostgresConfig),
}

impl StoreConfig {
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    pub fn postgres_url(url: impl Into<String>) -> Self {
        Self::Postgres(PostgresConfig::new(url))
    }

    /// Build a store configuration from its textual settings
    pub fn from_settings(
        backend: &str,
        url: Option<&str>,
        max_connections: u32,
    ) -> Result<Self, DomainError> {
        match StoreType::from_str(backend) {
            Some(StoreType::InMemory) => Ok(Self::InMemory),
            Some(StoreType::Postgres) => {
                let url = url.ok_or_else(|| {
                    DomainError::configuration("PostgreSQL store requires registry.storage.url")
                })?;

                Ok(Self::Postgres(
                    PostgresConfig::new(url).with_max_connections(max_connections),
                ))
            }
            None => Err(DomainError::configuration(format!(
                "Unknown registry storage backend '{}'",
                backend
            ))),
        }
    }

    pub fn store_type(&self) -> StoreType {
        match self {
            Self::InMemory => StoreType::InMemory,
            Self::Postgres(_) => StoreType::Postgres,
        }
    }
}

/// Factory for creating registry stores
#[derive(Debug)]
pub struct RegistryStoreFactory;

impl RegistryStoreFactory {
    pub async fn create(config: &StoreConfig) -> Result<Arc<dyn RegistryStore>, DomainError> {
        match config {
            StoreConfig::InMemory => Ok(Arc::new(InMemoryRegistryStore::new())),
            StoreConfig::Postgres(pg_config) => {
                let store = PostgresRegistryStore::connect(pg_config).await?;
                store.ensure_schema().await?;
                Ok(Arc::new(store))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_type_from_str() {
        assert_eq!(StoreType::from_str("memory"), Some(StoreType::InMemory));
        assert_eq!(StoreType::from_str("In-Memory"), Some(StoreType::InMemory));
        assert_eq!(StoreType::from_str("postgresql"), Some(StoreType::Postgres));
        assert_eq!(StoreType::from_str("redis"), None);
    }

    #[test]
    fn test_from_settings() {
        let config = StoreConfig::from_settings("memory", None, 10).unwrap();
        assert_eq!(config.store_type(), StoreType::InMemory);

        let config = StoreConfig::from_settings("pg", Some("postgres://db/registry"), 5).unwrap();
        match config {
            StoreConfig::Postgres(pg) => {
                assert_eq!(pg.url, "postgres://db/registry");
                assert_eq!(pg.max_connections, 5);
            }
            other => panic!("unexpected config: {other:?}"),
        }

        assert!(matches!(
            StoreConfig::from_settings("postgres", None, 5),
            Err(DomainError::Configuration { .. })
        ));
        assert!(StoreConfig::from_settings("sqlite", None, 5).is_err());
    }

    #[tokio::test]
    async fn test_create_in_memory() {
        let store = RegistryStoreFactory::create(&StoreConfig::in_memory())
            .await
            .unwrap();

        assert!(store.ping().await.is_ok());
        assert!(store.list().await.unwrap().is_empty());
    }
}
