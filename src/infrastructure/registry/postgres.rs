//! PostgreSQL registry store with connection pooling

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;

use crate::domain::{DomainError, Identity, Model, ModelId, RegistryStore, Validation};

const MODEL_COLUMNS: &str = "model_id, name, version, metadata_uri, owner, is_active, registered_at";

/// PostgreSQL connection configuration
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections to maintain
    pub min_connections: u32,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
    /// Idle timeout in seconds
    pub idle_timeout_secs: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/model_registry".to_string(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 30,
            idle_timeout_secs: 600,
        }
    }
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }
}

/// Registry store backed by two tables: models and validations.
///
/// Registration order is the `seq` column; the owner's list is derived from
/// it, so inserting a model and recording its ownership is one statement.
pub struct PostgresRegistryStore {
    pool: PgPool,
}

impl Debug for PostgresRegistryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresRegistryStore").finish()
    }
}

impl PostgresRegistryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect using a pooled connection
    pub async fn connect(config: &PostgresConfig) -> Result<Self, DomainError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
            .connect(&config.url)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to connect to PostgreSQL: {}", e)))?;

        Ok(Self::new(pool))
    }

    /// Create tables and indexes if missing
    pub async fn ensure_schema(&self) -> Result<(), DomainError> {
        let statements = [
            r#"
            CREATE TABLE IF NOT EXISTS registry_models (
                seq BIGSERIAL UNIQUE,
                model_id VARCHAR(66) PRIMARY KEY,
                name TEXT NOT NULL,
                version TEXT NOT NULL,
                metadata_uri TEXT NOT NULL,
                owner VARCHAR(42) NOT NULL,
                is_active BOOLEAN NOT NULL,
                registered_at BIGINT NOT NULL
            )
            "#,
            r#"
            CREATE INDEX IF NOT EXISTS registry_models_owner_idx
                ON registry_models (owner, seq)
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS registry_validations (
                seq BIGSERIAL PRIMARY KEY,
                model_id VARCHAR(66) NOT NULL REFERENCES registry_models (model_id),
                validator VARCHAR(42) NOT NULL,
                is_valid BOOLEAN NOT NULL,
                comments TEXT NOT NULL,
                submitted_at BIGINT NOT NULL
            )
            "#,
            r#"
            CREATE INDEX IF NOT EXISTS registry_validations_model_idx
                ON registry_validations (model_id, seq)
            "#,
        ];

        for statement in statements {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| DomainError::storage(format!("Failed to create schema: {}", e)))?;
        }

        Ok(())
    }
}

fn column<'r, T>(row: &'r PgRow, name: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(name)
        .map_err(|e| DomainError::storage(format!("Failed to read column '{}': {}", name, e)))
}

fn parse_model_id(value: String) -> Result<ModelId, DomainError> {
    ModelId::parse(value).map_err(|e| DomainError::storage(format!("Corrupt model ID: {}", e)))
}

fn parse_identity(value: String) -> Result<Identity, DomainError> {
    Identity::parse(value).map_err(|e| DomainError::storage(format!("Corrupt identity: {}", e)))
}

fn model_from_row(row: &PgRow) -> Result<Model, DomainError> {
    Ok(Model::restore(
        parse_model_id(column(row, "model_id")?)?,
        column(row, "name")?,
        column(row, "version")?,
        column(row, "metadata_uri")?,
        parse_identity(column(row, "owner")?)?,
        column(row, "is_active")?,
        column(row, "registered_at")?,
    ))
}

fn validation_from_row(row: &PgRow) -> Result<Validation, DomainError> {
    let validation = Validation::new(
        parse_model_id(column(row, "model_id")?)?,
        parse_identity(column(row, "validator")?)?,
        column(row, "is_valid")?,
        column::<String>(row, "comments")?,
    );

    Ok(validation.with_timestamp(column(row, "submitted_at")?))
}

fn model_not_found(id: &ModelId) -> DomainError {
    DomainError::not_found(format!("Model '{}' not found", id))
}

#[async_trait]
impl RegistryStore for PostgresRegistryStore {
    async fn put(&self, model: Model) -> Result<(), DomainError> {
        let query = r#"
            INSERT INTO registry_models
                (model_id, name, version, metadata_uri, owner, is_active, registered_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#;

        sqlx::query(query)
            .bind(model.id().as_str())
            .bind(model.name())
            .bind(model.version())
            .bind(model.metadata_uri())
            .bind(model.owner().as_str())
            .bind(model.is_active())
            .bind(model.timestamp())
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    DomainError::duplicate_key(model.id().as_str())
                }
                other => DomainError::storage(format!("Failed to insert model: {}", other)),
            })?;

        Ok(())
    }

    async fn get(&self, id: &ModelId) -> Result<Model, DomainError> {
        let query = format!(
            "SELECT {} FROM registry_models WHERE model_id = $1",
            MODEL_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get model: {}", e)))?
            .ok_or_else(|| model_not_found(id))?;

        model_from_row(&row)
    }

    async fn update(
        &self,
        id: &ModelId,
        version: &str,
        metadata_uri: &str,
    ) -> Result<Model, DomainError> {
        let query = format!(
            r#"
            UPDATE registry_models
            SET version = $2, metadata_uri = $3
            WHERE model_id = $1
            RETURNING {}
            "#,
            MODEL_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(id.as_str())
            .bind(version)
            .bind(metadata_uri)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to update model: {}", e)))?
            .ok_or_else(|| model_not_found(id))?;

        model_from_row(&row)
    }

    async fn append_validation(&self, validation: Validation) -> Result<(), DomainError> {
        let query = r#"
            INSERT INTO registry_validations
                (model_id, validator, is_valid, comments, submitted_at)
            VALUES ($1, $2, $3, $4, $5)
        "#;

        sqlx::query(query)
            .bind(validation.model_id().as_str())
            .bind(validation.validator().as_str())
            .bind(validation.is_valid())
            .bind(validation.comments())
            .bind(validation.timestamp())
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                    model_not_found(validation.model_id())
                }
                other => DomainError::storage(format!("Failed to insert validation: {}", other)),
            })?;

        Ok(())
    }

    async fn list_validations(&self, id: &ModelId) -> Result<Vec<Validation>, DomainError> {
        let query = r#"
            SELECT model_id, validator, is_valid, comments, submitted_at
            FROM registry_validations
            WHERE model_id = $1
            ORDER BY seq
        "#;

        let rows = sqlx::query(query)
            .bind(id.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list validations: {}", e)))?;

        rows.iter().map(validation_from_row).collect()
    }

    async fn list_owned(&self, owner: &Identity) -> Result<Vec<ModelId>, DomainError> {
        let rows = sqlx::query("SELECT model_id FROM registry_models WHERE owner = $1 ORDER BY seq")
            .bind(owner.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list owned models: {}", e)))?;

        rows.iter()
            .map(|row| parse_model_id(column(row, "model_id")?))
            .collect()
    }

    async fn list(&self) -> Result<Vec<Model>, DomainError> {
        let query = format!("SELECT {} FROM registry_models ORDER BY seq", MODEL_COLUMNS);

        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list models: {}", e)))?;

        rows.iter().map(model_from_row).collect()
    }

    async fn ping(&self) -> Result<(), DomainError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::backend_unavailable(format!("PostgreSQL unreachable: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postgres_config_defaults() {
        let config = PostgresConfig::new("postgres://db/registry").with_max_connections(4);

        assert_eq!(config.url, "postgres://db/registry");
        assert_eq!(config.max_connections, 4);
        assert_eq!(config.min_connections, 1);
    }
}
