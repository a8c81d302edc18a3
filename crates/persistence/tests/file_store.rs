//! File-backed asset store tests

use narration_config::{PersistenceSettings, StorageBackend};
use narration_core::WordTimestamp;
use narration_persistence::{init, AssetLookup, AssetStore, FileAssetStore, NarrationAsset};

fn timestamps() -> Vec<WordTimestamp> {
    vec![
        WordTimestamp {
            word: "Hello".to_string(),
            start: 0.0,
            end: 0.4,
            index: 0,
        },
        WordTimestamp {
            word: "world".to_string(),
            start: 0.5,
            end: 0.9,
            index: 1,
        },
    ]
}

#[tokio::test]
async fn test_put_get_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let asset = NarrationAsset::new("course/intro", "https://cdn/intro.mp3", "hash-a", timestamps());

    {
        let store = FileAssetStore::open(dir.path()).await.unwrap();
        store.put(asset.clone()).await.unwrap();
    }

    let reopened = FileAssetStore::open(dir.path()).await.unwrap();
    let loaded = reopened.get("course/intro").await.unwrap().unwrap();
    assert_eq!(loaded, asset);
    assert!(dir.path().join("course_intro.json").exists());
}

#[tokio::test]
async fn test_put_replaces_previous_version() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileAssetStore::open(dir.path()).await.unwrap();

    store
        .put(NarrationAsset::new("u1", "v1.mp3", "hash-1", timestamps()))
        .await
        .unwrap();
    store
        .put(NarrationAsset::new("u1", "v2.mp3", "hash-2", Vec::new()))
        .await
        .unwrap();

    match store.lookup("u1", "hash-2").await.unwrap() {
        AssetLookup::Fresh(asset) => assert_eq!(asset.audio_url, "v2.mp3"),
        other => panic!("expected fresh asset, got {other:?}"),
    }
    assert!(matches!(
        store.lookup("u1", "hash-1").await.unwrap(),
        AssetLookup::Stale(_)
    ));
}

#[tokio::test]
async fn test_missing_and_remove() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileAssetStore::open(dir.path().join("nested/assets")).await.unwrap();

    assert!(store.get("absent").await.unwrap().is_none());
    assert!(!store.remove("absent").await.unwrap());

    store
        .put(NarrationAsset::new("present", "a.mp3", "h", Vec::new()))
        .await
        .unwrap();
    assert!(store.remove("present").await.unwrap());
    assert_eq!(
        store.lookup("present", "h").await.unwrap(),
        AssetLookup::Missing
    );
}

#[tokio::test]
async fn test_corrupt_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileAssetStore::open(dir.path()).await.unwrap();
    std::fs::write(dir.path().join("broken.json"), b"{not json").unwrap();

    assert!(store.get("broken").await.is_err());
}

#[tokio::test]
async fn test_init_from_settings() {
    let dir = tempfile::tempdir().unwrap();
    let settings = PersistenceSettings {
        backend: StorageBackend::File,
        data_dir: dir.path().join("store").to_string_lossy().into_owned(),
    };
    let store = init(&settings).await.unwrap();
    store
        .put(NarrationAsset::new("u", "a.mp3", "h", Vec::new()))
        .await
        .unwrap();
    assert!(dir.path().join("store/u.json").exists());

    let memory = init(&PersistenceSettings {
        backend: StorageBackend::Memory,
        data_dir: String::new(),
    })
    .await
    .unwrap();
    assert!(memory.get("u").await.unwrap().is_none());
}
