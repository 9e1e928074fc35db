//! Pipeline error types.

use thiserror::Error;

use crate::content::ContentError;

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Errors that abort a generation run.
///
/// Failures of the optional compositing stages never surface here; they
/// are recorded on the run's metadata instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Parameters rejected before any remote call was issued
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Content generation failed: {0}")]
    Content(#[from] ContentError),

    #[error("Synthesis failed: {0}")]
    Synthesis(#[from] adreel_synthesis::SynthesisError),

    #[error("Media processing failed: {0}")]
    Media(#[from] adreel_media::MediaError),

    #[error("Storage error: {0}")]
    Storage(#[from] adreel_storage::StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    pub fn invalid_request(violations: &[String]) -> Self {
        Self::InvalidRequest(violations.join(", "))
    }
}
