//! Pipeline errors

use narration_core::NarrationError;
use narration_persistence::PersistenceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("speech provider '{provider}' failed: {message}")]
    Provider { provider: String, message: String },

    #[error(transparent)]
    Narration(#[from] NarrationError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error("unit '{0}' has no narratable text")]
    EmptyContent(String),
}

impl PipelineError {
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }
}

impl From<PipelineError> for NarrationError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Narration(inner) => inner,
            PipelineError::EmptyContent(unit_id) => NarrationError::AssetUnavailable { unit_id },
            other => NarrationError::provider(other.to_string()),
        }
    }
}
