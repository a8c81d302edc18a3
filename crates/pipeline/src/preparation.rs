//! Ahead-of-time narration preparation
//!
//! Content → document → speech → word timestamps → stored asset. An asset
//! already generated for the same content fingerprint is reused, along with
//! any desync it was stored with.

use std::sync::Arc;

use narration_core::NarrationError;
use narration_persistence::{AssetLookup, AssetStore, NarrationAsset};
use narration_text_processing::{ContentRules, NarrationDocument};

use crate::alignment::align_document;
use crate::speech::SpeechProvider;
use crate::PipelineError;

/// Outcome of preparing one unit
#[derive(Debug, Clone)]
pub struct PreparedNarration {
    pub asset: NarrationAsset,
    pub document: NarrationDocument,
    /// True when a fresh stored asset was returned without synthesis
    pub reused: bool,
    /// Underrun or mismatch carried by the asset; audio is still usable
    pub issue: Option<NarrationError>,
}

pub struct NarrationPreparer {
    provider: Arc<dyn SpeechProvider>,
    store: Arc<dyn AssetStore>,
    rules: ContentRules,
}

impl NarrationPreparer {
    pub fn new(
        provider: Arc<dyn SpeechProvider>,
        store: Arc<dyn AssetStore>,
        rules: ContentRules,
    ) -> Self {
        Self {
            provider,
            store,
            rules,
        }
    }

    pub fn rules(&self) -> &ContentRules {
        &self.rules
    }

    pub fn store(&self) -> &Arc<dyn AssetStore> {
        &self.store
    }

    /// Build the narration document for raw content
    pub fn document(&self, raw: &str) -> NarrationDocument {
        NarrationDocument::from_content(raw, &self.rules)
    }

    /// Prepare narration for a unit, regenerating only when content changed
    pub async fn prepare(
        &self,
        unit_id: &str,
        raw: &str,
    ) -> Result<PreparedNarration, PipelineError> {
        let document = self.document(raw);
        if document.is_empty() {
            return Err(PipelineError::EmptyContent(unit_id.to_string()));
        }

        match self.store.lookup(unit_id, &document.fingerprint).await? {
            AssetLookup::Fresh(asset) => {
                let issue = document.stored_issue(&asset.timestamps, asset.highlighting_complete);
                tracing::debug!(unit_id, degraded = issue.is_some(), "Reusing narration asset");
                return Ok(PreparedNarration {
                    asset,
                    document,
                    reused: true,
                    issue,
                });
            }
            AssetLookup::Stale(_) => {
                tracing::info!(unit_id, "Content changed, regenerating narration")
            }
            AssetLookup::Missing => {}
        }

        let synthesis = self.provider.synthesize(&document.text).await?;
        let aggregation = align_document(&document, &synthesis.alignment);

        let issue = match aggregation.underrun {
            Some(underrun) => Some(underrun),
            None => {
                let mismatch = document.check_sync(&aggregation.words).into_result().err();
                if mismatch.is_some() {
                    metrics::counter!("narration_normalization_mismatch_total").increment(1);
                }
                mismatch
            }
        };

        let mut asset = NarrationAsset::new(
            unit_id,
            synthesis.audio_url,
            document.fingerprint.clone(),
            aggregation.words,
        );
        asset.highlighting_complete = issue.is_none();
        self.store.put(asset.clone()).await?;

        metrics::counter!(
            "narration_assets_prepared_total",
            "provider" => self.provider.name().to_string()
        )
        .increment(1);
        tracing::info!(
            unit_id,
            provider = self.provider.name(),
            words = asset.timestamps.len(),
            highlighting_complete = asset.highlighting_complete,
            "Prepared narration asset"
        );

        Ok(PreparedNarration {
            asset,
            document,
            reused: false,
            issue,
        })
    }
}
