//! Narration asset persistence
//!
//! Stores, per narratable unit:
//! - The audio URL produced by the speech provider
//! - Word-level timestamps
//! - The content hash they were generated for (stale detection)

pub mod asset;
pub mod error;
pub mod file;
pub mod store;

use std::sync::Arc;

use narration_config::{PersistenceSettings, StorageBackend};

pub use asset::{AssetLookup, NarrationAsset};
pub use error::PersistenceError;
pub use file::FileAssetStore;
pub use store::{AssetStore, MemoryAssetStore};

/// Build the configured asset store
pub async fn init(settings: &PersistenceSettings) -> Result<Arc<dyn AssetStore>, PersistenceError> {
    match settings.backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory narration asset store - assets are lost on restart");
            Ok(Arc::new(MemoryAssetStore::new()))
        }
        StorageBackend::File => Ok(Arc::new(FileAssetStore::open(&settings.data_dir).await?)),
    }
}
