//! Narration error taxonomy
//!
//! Every variant except `AssetUnavailable` degrades to "read without
//! narration highlighting" rather than blocking the reader.

use thiserror::Error;

/// Errors surfaced by the narration engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NarrationError {
    /// Ahead-of-time and render-time word sequences disagree
    #[error("normalization mismatch: expected {expected} words, found {actual} (first divergence at {first_divergence:?})")]
    NormalizationMismatch {
        expected: usize,
        actual: usize,
        first_divergence: Option<usize>,
    },

    /// Character alignment covers fewer words than the text it was generated for
    #[error("alignment underrun: aligned {aligned} of {expected} words")]
    AlignmentUnderrun { expected: usize, aligned: usize },

    /// Structurally broken alignment payload
    #[error("invalid alignment: {0}")]
    InvalidAlignment(String),

    /// No pre-generated audio exists for the unit
    #[error("no narration asset for unit '{unit_id}'")]
    AssetUnavailable { unit_id: String },

    /// Stored asset was generated for another content version
    #[error("narration asset for unit '{unit_id}' is stale")]
    StaleAsset { unit_id: String },

    /// Audio primitive reported a failure
    #[error("playback error: {0}")]
    Playback(String),

    /// Speech/alignment provider failure
    #[error("speech provider error: {0}")]
    Provider(String),
}

impl NarrationError {
    pub fn playback(message: impl Into<String>) -> Self {
        Self::Playback(message.into())
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider(message.into())
    }

    pub fn asset_unavailable(unit_id: impl Into<String>) -> Self {
        Self::AssetUnavailable {
            unit_id: unit_id.into(),
        }
    }

    /// True when audio can still play, only without word highlighting
    pub fn is_desync(&self) -> bool {
        matches!(
            self,
            Self::NormalizationMismatch { .. }
                | Self::AlignmentUnderrun { .. }
                | Self::InvalidAlignment(_)
        )
    }

    /// True when the narration control should not be offered at all
    pub fn hides_narration(&self) -> bool {
        matches!(self, Self::AssetUnavailable { .. })
    }
}

pub type Result<T> = std::result::Result<T, NarrationError>;
