//! Synthesis error types.

use thiserror::Error;

pub type SynthesisResult<T> = Result<T, SynthesisError>;

#[derive(Debug, Error)]
pub enum SynthesisError {
    /// Parameters fall outside the provider's capability envelope.
    /// Reported before any remote call.
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("Invalid voice: {0}")]
    InvalidVoice(String),

    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The remote response was not the expected asset-locator shape.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("Generation timed out after {0} seconds")]
    Timeout(u64),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SynthesisError {
    pub fn invalid_params(errors: &[String]) -> Self {
        Self::InvalidParams(errors.join(", "))
    }

    pub fn request_failed(message: impl Into<String>) -> Self {
        Self::RequestFailed(message.into())
    }
}
