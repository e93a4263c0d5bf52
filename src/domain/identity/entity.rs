//! Caller identity and per-request signing keys

use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::model::{validate_identity, validate_private_key, ModelValidationError};

/// Number of digest bytes kept for an identity
const IDENTITY_LENGTH: usize = 20;

/// Opaque, comparable identity of a registry participant (address-like)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity(String);

impl Identity {
    /// Parse an `0x`-prefixed, 20-byte hex identity; normalized to lowercase
    pub fn parse(value: impl AsRef<str>) -> Result<Self, ModelValidationError> {
        let value = value.as_ref();
        validate_identity(value)?;
        Ok(Self(value.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Identity {
    type Error = ModelValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Identity> for String {
    fn from(identity: Identity) -> Self {
        identity.0
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 32-byte signing credential supplied with every mutating request.
///
/// Never persisted; `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningKey([u8; 32]);

impl SigningKey {
    /// Parse an `0x`-prefixed, 32-byte hex key
    pub fn parse(value: &str) -> Result<Self, ModelValidationError> {
        validate_private_key(value)?;

        let bytes = hex::decode(&value[2..]).map_err(|_| ModelValidationError::InvalidPrivateKey)?;
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|_| ModelValidationError::InvalidPrivateKey)?;

        Ok(Self(bytes))
    }

    /// Generate a fresh random key
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Identity controlled by this key: the trailing 20 bytes of its SHA-256 digest
    pub fn identity(&self) -> Identity {
        let digest = Sha256::digest(self.0);
        Identity(format!(
            "0x{}",
            hex::encode(&digest[digest.len() - IDENTITY_LENGTH..])
        ))
    }

    /// Hex form, for handing a generated key to its user
    pub fn expose_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningKey([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "0x1234567890123456789012345678901234567890123456789012345678901234";

    #[test]
    fn test_identity_is_deterministic() {
        let first = SigningKey::parse(KEY).unwrap().identity();
        let second = SigningKey::parse(KEY).unwrap().identity();

        assert_eq!(first, second);
        assert_eq!(first.as_str().len(), 42);
        assert!(first.as_str().starts_with("0x"));
    }

    #[test]
    fn test_distinct_keys_have_distinct_identities() {
        let other = "0x0000000000000000000000000000000000000000000000000000000000000001";

        assert_ne!(
            SigningKey::parse(KEY).unwrap().identity(),
            SigningKey::parse(other).unwrap().identity()
        );
    }

    #[test]
    fn test_key_case_does_not_change_identity() {
        let lower_key = "0xabcdefabcdefabcdefabcdefabcdefabcdefabcdefabcdefabcdefabcdefabcd";
        let upper_key = "0xABCDEFABCDEFABCDEFABCDEFABCDEFABCDEFABCDEFABCDEFABCDEFABCDEFABCD";

        assert_eq!(
            SigningKey::parse(lower_key).unwrap().identity(),
            SigningKey::parse(upper_key).unwrap().identity()
        );
    }

    #[test]
    fn test_invalid_key_rejected() {
        assert!(matches!(
            SigningKey::parse("0x1234"),
            Err(ModelValidationError::InvalidPrivateKey)
        ));
    }

    #[test]
    fn test_debug_is_redacted() {
        let key = SigningKey::parse(KEY).unwrap();
        assert_eq!(format!("{:?}", key), "SigningKey([REDACTED])");
    }

    #[test]
    fn test_generated_key_round_trips() {
        let key = SigningKey::generate();
        let parsed = SigningKey::parse(&key.expose_hex()).unwrap();

        assert_eq!(key.identity(), parsed.identity());
    }

    #[test]
    fn test_identity_parse_normalizes_case() {
        let identity = Identity::parse("0xABCDEF1234567890ABCDEF1234567890ABCDEF12").unwrap();
        assert_eq!(identity.as_str(), "0xabcdef1234567890abcdef1234567890abcdef12");
    }
}
