//! Registry events and transaction receipts

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::{Identity, ModelId};

/// Event emitted by a successful state transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "PascalCase")]
pub enum RegistryEvent {
    ModelRegistered {
        model_id: ModelId,
        name: String,
        version: String,
        owner: Identity,
    },
    ModelUpdated {
        model_id: ModelId,
        version: String,
        metadata_uri: String,
    },
    ModelValidated {
        model_id: ModelId,
        validator: Identity,
        is_valid: bool,
        comments: String,
    },
}

impl RegistryEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ModelRegistered { .. } => "ModelRegistered",
            Self::ModelUpdated { .. } => "ModelUpdated",
            Self::ModelValidated { .. } => "ModelValidated",
        }
    }

    pub fn model_id(&self) -> &ModelId {
        match self {
            Self::ModelRegistered { model_id, .. }
            | Self::ModelUpdated { model_id, .. }
            | Self::ModelValidated { model_id, .. } => model_id,
        }
    }

    /// Feed the event name and every field into `hasher`, each length-prefixed.
    pub fn digest_into(&self, hasher: &mut Sha256) {
        update_field(hasher, self.name().as_bytes());
        update_field(hasher, self.model_id().as_str().as_bytes());

        match self {
            Self::ModelRegistered {
                name,
                version,
                owner,
                ..
            } => {
                update_field(hasher, name.as_bytes());
                update_field(hasher, version.as_bytes());
                update_field(hasher, owner.as_str().as_bytes());
            }
            Self::ModelUpdated {
                version,
                metadata_uri,
                ..
            } => {
                update_field(hasher, version.as_bytes());
                update_field(hasher, metadata_uri.as_bytes());
            }
            Self::ModelValidated {
                validator,
                is_valid,
                comments,
                ..
            } => {
                update_field(hasher, validator.as_str().as_bytes());
                update_field(hasher, &[u8::from(*is_valid)]);
                update_field(hasher, comments.as_bytes());
            }
        }
    }
}

fn update_field(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_be_bytes());
    hasher.update(bytes);
}

/// Outcome of a committed mutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    pub transaction_hash: String,
    pub block_number: u64,
    pub from: Identity,
    pub events: Vec<RegistryEvent>,
}

impl TransactionReceipt {
    /// Build a receipt whose hash commits to the registry address, the block
    /// number, the sender and the emitted events.
    pub fn new(
        registry_address: &str,
        block_number: u64,
        from: Identity,
        events: Vec<RegistryEvent>,
    ) -> Self {
        let mut hasher = Sha256::new();
        update_field(&mut hasher, registry_address.as_bytes());
        hasher.update(block_number.to_be_bytes());
        update_field(&mut hasher, from.as_str().as_bytes());

        for event in &events {
            event.digest_into(&mut hasher);
        }

        Self {
            transaction_hash: format!("0x{}", hex::encode(hasher.finalize())),
            block_number,
            from,
            events,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> Identity {
        Identity::parse("0x1234567890123456789012345678901234567890").unwrap()
    }

    fn registered() -> RegistryEvent {
        RegistryEvent::ModelRegistered {
            model_id: ModelId::derive("TestModel", "1.0.0"),
            name: "TestModel".to_string(),
            version: "1.0.0".to_string(),
            owner: identity(),
        }
    }

    #[test]
    fn test_event_serialization_is_tagged() {
        let json = serde_json::to_value(registered()).unwrap();

        assert_eq!(json["event"], "ModelRegistered");
        assert_eq!(json["name"], "TestModel");
        assert_eq!(json["owner"], identity().as_str());
    }

    #[test]
    fn test_receipt_hash_changes_with_block() {
        let first = TransactionReceipt::new("0xregistry", 1, identity(), vec![registered()]);
        let second = TransactionReceipt::new("0xregistry", 2, identity(), vec![registered()]);

        assert_ne!(first.transaction_hash, second.transaction_hash);
        assert_eq!(first.transaction_hash.len(), 66);
        assert_eq!(first.events[0].name(), "ModelRegistered");
    }

    fn validated(is_valid: bool, comments: &str) -> RegistryEvent {
        RegistryEvent::ModelValidated {
            model_id: ModelId::derive("TestModel", "1.0.0"),
            validator: identity(),
            is_valid,
            comments: comments.to_string(),
        }
    }

    fn hash_of(events: Vec<RegistryEvent>) -> String {
        TransactionReceipt::new("0xregistry", 1, identity(), events).transaction_hash
    }

    #[test]
    fn test_receipt_hash_is_deterministic() {
        assert_eq!(
            hash_of(vec![registered(), validated(true, "ok")]),
            hash_of(vec![registered(), validated(true, "ok")])
        );
    }

    #[test]
    fn test_receipt_hash_commits_to_every_event_field() {
        let base = hash_of(vec![validated(true, "ok")]);

        assert_ne!(base, hash_of(vec![validated(false, "ok")]));
        assert_ne!(base, hash_of(vec![validated(true, "ok!")]));
        assert_ne!(base, hash_of(vec![registered()]));
        assert_ne!(base, hash_of(vec![]));
    }

    #[test]
    fn test_receipt_hash_separates_adjacent_fields() {
        let update = |version: &str, uri: &str| RegistryEvent::ModelUpdated {
            model_id: ModelId::derive("TestModel", "1.0.0"),
            version: version.to_string(),
            metadata_uri: uri.to_string(),
        };

        assert_ne!(
            hash_of(vec![update("1.0.1", "ipfs://a")]),
            hash_of(vec![update("1.0.1i", "pfs://a")])
        );
    }
}
