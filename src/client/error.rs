use thiserror::Error;

/// Failures talking to a registry server
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid API URL: {message}")]
    InvalidUrl { message: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API error ({status}): {detail}")]
    Api { status: u16, detail: String },
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
