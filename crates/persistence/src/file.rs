//! JSON file store, one file per unit

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::asset::NarrationAsset;
use crate::error::PersistenceError;
use crate::store::AssetStore;

#[derive(Debug, Clone)]
pub struct FileAssetStore {
    root: PathBuf,
}

impl FileAssetStore {
    /// Open a store rooted at `root`, creating the directory if needed
    pub async fn open(root: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let root = root.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|e| PersistenceError::io("creating asset directory", e))?;
        tracing::info!(root = %root.display(), "Opened narration asset store");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, unit_id: &str) -> Result<PathBuf, PersistenceError> {
        Ok(self.root.join(format!("{}.json", file_stem(unit_id)?)))
    }
}

/// Map a unit id onto a safe file stem
fn file_stem(unit_id: &str) -> Result<String, PersistenceError> {
    let trimmed = unit_id.trim();
    if trimmed.is_empty() || trimmed.chars().all(|c| c == '.') {
        return Err(PersistenceError::InvalidUnitId(unit_id.to_string()));
    }
    Ok(trimmed
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect())
}

#[async_trait]
impl AssetStore for FileAssetStore {
    async fn get(&self, unit_id: &str) -> Result<Option<NarrationAsset>, PersistenceError> {
        let path = self.path_for(unit_id)?;
        let data = match tokio::fs::read(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(PersistenceError::io("reading narration asset", e)),
        };
        let asset = serde_json::from_slice(&data)
            .map_err(|e| PersistenceError::serialization("parsing narration asset", e))?;
        Ok(Some(asset))
    }

    async fn put(&self, asset: NarrationAsset) -> Result<(), PersistenceError> {
        let path = self.path_for(&asset.unit_id)?;
        let data = serde_json::to_vec_pretty(&asset)
            .map_err(|e| PersistenceError::serialization("encoding narration asset", e))?;

        // write-then-rename so readers never see a partial file
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, data)
            .await
            .map_err(|e| PersistenceError::io("writing narration asset", e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| PersistenceError::io("replacing narration asset", e))?;

        tracing::debug!(
            unit_id = %asset.unit_id,
            path = %path.display(),
            words = asset.timestamps.len(),
            "Stored narration asset"
        );
        Ok(())
    }

    async fn remove(&self, unit_id: &str) -> Result<bool, PersistenceError> {
        let path = self.path_for(unit_id)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(PersistenceError::io("removing narration asset", e)),
        }
    }
}
