//! Validation record attached to a model

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::domain::{Identity, ModelId};

/// Immutable attestation from a non-owner reviewer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Validation {
    model_id: ModelId,
    validator: Identity,
    is_valid: bool,
    comments: String,
    /// Submission time in seconds since the Unix epoch
    timestamp: i64,
}

impl Validation {
    pub fn new(
        model_id: ModelId,
        validator: Identity,
        is_valid: bool,
        comments: impl Into<String>,
    ) -> Self {
        Self {
            model_id,
            validator,
            is_valid,
            comments: comments.into(),
            timestamp: Utc::now().timestamp(),
        }
    }

    /// Builder-style method to set the submission time
    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn model_id(&self) -> &ModelId {
        &self.model_id
    }

    pub fn validator(&self) -> &Identity {
        &self.validator
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn comments(&self) -> &str {
        &self.comments
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }
}
