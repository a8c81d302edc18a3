//! Narration asset record

use chrono::{DateTime, Utc};
use narration_core::{NarrationError, WordTimestamp};
use serde::{Deserialize, Serialize};

/// Pre-generated narration for one unit of content
///
/// The audio itself lives elsewhere; only its URL is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrationAsset {
    pub unit_id: String,
    pub audio_url: String,
    /// Fingerprint of the normalized text the audio was generated from
    pub content_hash: String,
    pub timestamps: Vec<WordTimestamp>,
    /// False when generation hit an alignment underrun or mismatch
    #[serde(default = "default_true")]
    pub highlighting_complete: bool,
    pub created_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

impl NarrationAsset {
    pub fn new(
        unit_id: impl Into<String>,
        audio_url: impl Into<String>,
        content_hash: impl Into<String>,
        timestamps: Vec<WordTimestamp>,
    ) -> Self {
        Self {
            unit_id: unit_id.into(),
            audio_url: audio_url.into(),
            content_hash: content_hash.into(),
            timestamps,
            highlighting_complete: true,
            created_at: Utc::now(),
        }
    }

    pub fn is_fresh_for(&self, content_hash: &str) -> bool {
        self.content_hash == content_hash
    }
}

/// Result of looking an asset up against the current content version
#[derive(Debug, Clone, PartialEq)]
pub enum AssetLookup {
    Fresh(NarrationAsset),
    /// Generated for another content version
    Stale(NarrationAsset),
    Missing,
}

impl AssetLookup {
    pub fn classify(asset: Option<NarrationAsset>, content_hash: &str) -> Self {
        match asset {
            Some(asset) if asset.is_fresh_for(content_hash) => Self::Fresh(asset),
            Some(asset) => Self::Stale(asset),
            None => Self::Missing,
        }
    }

    pub fn is_fresh(&self) -> bool {
        matches!(self, Self::Fresh(_))
    }

    /// Fresh asset, or the error that keeps narration from being offered
    pub fn into_result(self, unit_id: &str) -> Result<NarrationAsset, NarrationError> {
        match self {
            Self::Fresh(asset) => Ok(asset),
            Self::Stale(_) => Err(NarrationError::StaleAsset {
                unit_id: unit_id.to_string(),
            }),
            Self::Missing => Err(NarrationError::asset_unavailable(unit_id)),
        }
    }
}
