//! Model field validation utilities

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::FieldError;

/// Maximum length for model names accepted at the API boundary
pub const MAX_NAME_LENGTH: usize = 50;

/// Scheme every metadata URI must start with
pub const METADATA_URI_SCHEME: &str = "ipfs://";

static VERSION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+\.[0-9]+\.[0-9]+$").unwrap());

static PRIVATE_KEY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^0x[a-fA-F0-9]{64}$").unwrap());

static MODEL_ID_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^0x[a-fA-F0-9]{64}$").unwrap());

static IDENTITY_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^0x[a-fA-F0-9]{40}$").unwrap());

/// Model validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ModelValidationError {
    /// Name is empty
    EmptyName,
    /// Name exceeds maximum length
    NameTooLong { length: usize, max: usize },
    /// Version is empty
    EmptyVersion,
    /// Version is not `x.y.z`
    InvalidVersion { version: String },
    /// Metadata URI is empty
    EmptyMetadataUri,
    /// Metadata URI does not use the ipfs scheme
    InvalidMetadataUri { uri: String },
    /// Private key is empty
    EmptyPrivateKey,
    /// Private key is not 32 hex-encoded bytes
    InvalidPrivateKey,
    /// Model ID is not 32 hex-encoded bytes
    InvalidModelId { id: String },
    /// Identity is not 20 hex-encoded bytes
    InvalidIdentity { identity: String },
}

impl ModelValidationError {
    /// Request field the error refers to
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyName | Self::NameTooLong { .. } => "name",
            Self::EmptyVersion | Self::InvalidVersion { .. } => "version",
            Self::EmptyMetadataUri | Self::InvalidMetadataUri { .. } => "metadata_uri",
            Self::EmptyPrivateKey | Self::InvalidPrivateKey => "private_key",
            Self::InvalidModelId { .. } => "model_id",
            Self::InvalidIdentity { .. } => "owner",
        }
    }
}

impl fmt::Display for ModelValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Name is required"),
            Self::NameTooLong { length, max } => {
                write!(
                    f,
                    "Name must be at most {} characters (got {})",
                    max, length
                )
            }
            Self::EmptyVersion => write!(f, "Version is required"),
            Self::InvalidVersion { version } => {
                write!(f, "Version '{}' must be in format x.x.x", version)
            }
            Self::EmptyMetadataUri => write!(f, "Metadata URI is required"),
            Self::InvalidMetadataUri { uri } => {
                write!(
                    f,
                    "URI '{}' must start with '{}'",
                    uri, METADATA_URI_SCHEME
                )
            }
            Self::EmptyPrivateKey => write!(f, "Private key is required"),
            Self::InvalidPrivateKey => write!(f, "Invalid private key format"),
            Self::InvalidModelId { id } => write!(f, "Invalid model ID format '{}'", id),
            Self::InvalidIdentity { identity } => {
                write!(f, "Invalid address format '{}'", identity)
            }
        }
    }
}

impl std::error::Error for ModelValidationError {}

impl From<ModelValidationError> for FieldError {
    fn from(error: ModelValidationError) -> Self {
        FieldError::new(error.field(), error.to_string())
    }
}

/// Validate that a model name is present
pub fn validate_name(name: &str) -> Result<(), ModelValidationError> {
    if name.is_empty() {
        return Err(ModelValidationError::EmptyName);
    }

    Ok(())
}

/// Validate the length limit the API applies to names
pub fn validate_name_length(name: &str) -> Result<(), ModelValidationError> {
    let length = name.chars().count();

    if length > MAX_NAME_LENGTH {
        return Err(ModelValidationError::NameTooLong {
            length,
            max: MAX_NAME_LENGTH,
        });
    }

    Ok(())
}

/// Validate a semantic version string
pub fn validate_version(version: &str) -> Result<(), ModelValidationError> {
    if version.is_empty() {
        return Err(ModelValidationError::EmptyVersion);
    }

    if !VERSION_PATTERN.is_match(version) {
        return Err(ModelValidationError::InvalidVersion {
            version: version.to_string(),
        });
    }

    Ok(())
}

/// Validate a metadata URI
pub fn validate_metadata_uri(uri: &str) -> Result<(), ModelValidationError> {
    if uri.is_empty() {
        return Err(ModelValidationError::EmptyMetadataUri);
    }

    if !uri.starts_with(METADATA_URI_SCHEME) {
        return Err(ModelValidationError::InvalidMetadataUri {
            uri: uri.to_string(),
        });
    }

    Ok(())
}

/// Validate the textual form of a signing key
pub fn validate_private_key(key: &str) -> Result<(), ModelValidationError> {
    if key.is_empty() {
        return Err(ModelValidationError::EmptyPrivateKey);
    }

    if !PRIVATE_KEY_PATTERN.is_match(key) {
        return Err(ModelValidationError::InvalidPrivateKey);
    }

    Ok(())
}

/// Validate the textual form of a model ID
pub fn validate_model_id(id: &str) -> Result<(), ModelValidationError> {
    if !MODEL_ID_PATTERN.is_match(id) {
        return Err(ModelValidationError::InvalidModelId { id: id.to_string() });
    }

    Ok(())
}

/// Validate the textual form of an identity
pub fn validate_identity(identity: &str) -> Result<(), ModelValidationError> {
    if !IDENTITY_PATTERN.is_match(identity) {
        return Err(ModelValidationError::InvalidIdentity {
            identity: identity.to_string(),
        });
    }

    Ok(())
}

/// Run the domain checks for a new registration, collecting every failure
pub fn check_registration(name: &str, version: &str, metadata_uri: &str) -> Vec<FieldError> {
    let mut errors: Vec<FieldError> = Vec::new();

    if let Err(e) = validate_name(name) {
        errors.push(e.into());
    }

    errors.extend(check_release(version, metadata_uri));
    errors
}

/// Run the domain checks for a version/URI pair, collecting every failure
pub fn check_release(version: &str, metadata_uri: &str) -> Vec<FieldError> {
    [validate_version(version), validate_metadata_uri(metadata_uri)]
        .into_iter()
        .filter_map(Result::err)
        .map(FieldError::from)
        .collect()
}
