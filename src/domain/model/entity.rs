//! Model entity and related types

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::validation::{validate_model_id, ModelValidationError};
use crate::domain::Identity;

/// Content-derived model identifier: `0x` + 32 hex-encoded bytes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModelId(String);

impl ModelId {
    /// Derive the ID for a `(name, version)` pair.
    ///
    /// Hashes a length-prefixed encoding so that no two distinct pairs share
    /// the same preimage.
    pub fn derive(name: &str, version: &str) -> Self {
        let mut hasher = Sha256::new();

        for part in [name, version] {
            hasher.update((part.len() as u64).to_be_bytes());
            hasher.update(part.as_bytes());
        }

        Self(format!("0x{}", hex::encode(hasher.finalize())))
    }

    /// Parse a textual model ID; normalized to lowercase
    pub fn parse(id: impl AsRef<str>) -> Result<Self, ModelValidationError> {
        let id = id.as_ref();
        validate_model_id(id)?;
        Ok(Self(id.to_ascii_lowercase()))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ModelId {
    type Error = ModelValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ModelId> for String {
    fn from(id: ModelId) -> Self {
        id.0
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered, versioned ML artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    /// Derived from the name and the version at registration time
    model_id: ModelId,

    name: String,

    version: String,

    /// Location of the artifact metadata (`ipfs://...`)
    metadata_uri: String,

    /// Registrant; the only identity allowed to update the model
    owner: Identity,

    is_active: bool,

    /// Registration time in seconds since the Unix epoch
    timestamp: i64,
}

impl Model {
    /// Create a freshly registered model owned by `owner`
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        metadata_uri: impl Into<String>,
        owner: Identity,
    ) -> Self {
        let name = name.into();
        let version = version.into();

        Self {
            model_id: ModelId::derive(&name, &version),
            name,
            version,
            metadata_uri: metadata_uri.into(),
            owner,
            is_active: true,
            timestamp: Utc::now().timestamp(),
        }
    }

    /// Rebuild a model from persisted fields
    pub fn restore(
        model_id: ModelId,
        name: String,
        version: String,
        metadata_uri: String,
        owner: Identity,
        is_active: bool,
        timestamp: i64,
    ) -> Self {
        Self {
            model_id,
            name,
            version,
            metadata_uri,
            owner,
            is_active,
            timestamp,
        }
    }

    /// Builder-style method to set the registration time
    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    // Getters

    pub fn id(&self) -> &ModelId {
        &self.model_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn metadata_uri(&self) -> &str {
        &self.metadata_uri
    }

    pub fn owner(&self) -> &Identity {
        &self.owner
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn is_owned_by(&self, identity: &Identity) -> bool {
        &self.owner == identity
    }

    /// Replace version and metadata URI; the ID is left untouched
    pub fn set_release(&mut self, version: impl Into<String>, metadata_uri: impl Into<String>) {
        self.version = version.into();
        self.metadata_uri = metadata_uri.into();
    }
}
