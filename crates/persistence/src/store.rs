//! Asset store trait and the in-memory implementation

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::asset::{AssetLookup, NarrationAsset};
use crate::error::PersistenceError;

/// Storage for narration assets, keyed by unit id
#[async_trait]
pub trait AssetStore: Send + Sync {
    async fn get(&self, unit_id: &str) -> Result<Option<NarrationAsset>, PersistenceError>;

    /// Insert or replace the asset for its unit
    async fn put(&self, asset: NarrationAsset) -> Result<(), PersistenceError>;

    /// Returns true if an asset was removed
    async fn remove(&self, unit_id: &str) -> Result<bool, PersistenceError>;

    /// Look up an asset and check it against the current content hash
    async fn lookup(
        &self,
        unit_id: &str,
        content_hash: &str,
    ) -> Result<AssetLookup, PersistenceError> {
        let lookup = AssetLookup::classify(self.get(unit_id).await?, content_hash);
        if let AssetLookup::Stale(asset) = &lookup {
            tracing::info!(
                unit_id,
                stored_hash = %asset.content_hash,
                current_hash = %content_hash,
                "Narration asset is stale"
            );
        }
        Ok(lookup)
    }
}

/// Process-local store
#[derive(Debug, Default)]
pub struct MemoryAssetStore {
    assets: RwLock<HashMap<String, NarrationAsset>>,
}

impl MemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.assets.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.read().is_empty()
    }
}

#[async_trait]
impl AssetStore for MemoryAssetStore {
    async fn get(&self, unit_id: &str) -> Result<Option<NarrationAsset>, PersistenceError> {
        Ok(self.assets.read().get(unit_id).cloned())
    }

    async fn put(&self, asset: NarrationAsset) -> Result<(), PersistenceError> {
        tracing::debug!(unit_id = %asset.unit_id, words = asset.timestamps.len(), "Storing narration asset");
        self.assets.write().insert(asset.unit_id.clone(), asset);
        Ok(())
    }

    async fn remove(&self, unit_id: &str) -> Result<bool, PersistenceError> {
        Ok(self.assets.write().remove(unit_id).is_some())
    }
}
