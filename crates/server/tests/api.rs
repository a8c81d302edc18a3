//! HTTP API tests

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use narration_config::{NarrationSettings, PersistenceSettings, StorageBackend};
use narration_persistence::MemoryAssetStore;
use narration_pipeline::StubSpeechProvider;
use narration_server::{create_router, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

const LESSON: &str = "<h2>In this lesson</h2><p>• Variables</p>\
                      <h2>Variables</h2><p>A <em>variable</em> stores a value.</p>";

fn app() -> Router {
    let state = AppState::new(
        &NarrationSettings::default(),
        Arc::new(MemoryAssetStore::new()),
        Arc::new(StubSpeechProvider::new(0.05)),
        None,
    );
    create_router(state)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(&app(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_metrics_without_recorder() {
    let (status, body) = send(&app(), get("/metrics")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "METRICS_DISABLED");
}

#[tokio::test]
async fn test_document_endpoint() {
    let (status, body) = send(
        &app(),
        post("/api/narration/document", json!({ "content": LESSON })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "Variables Variables A variable stores a value.");
    assert_eq!(body["words"].as_array().unwrap().len(), 7);
    assert_eq!(body["headers"], json!([{ "wordIndex": 1, "level": 2, "elementOrdinal": 1 }]));
    assert_eq!(body["fingerprint"].as_str().unwrap().len(), 64);
}

#[tokio::test]
async fn test_timestamps_endpoint() {
    let body = json!({
        "content": "<p>Hi</p><p>there</p>",
        "alignment": {
            "characters": ["H", "i", " ", "t", "h", "e", "r", "e"],
            "character_start_times_seconds": [0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7],
            "character_end_times_seconds": [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8]
        }
    });
    let (status, body) = send(&app(), post("/api/narration/timestamps", body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["highlighting_complete"], true);
    assert_eq!(body["timestamps"][0]["word"], "Hi");
    assert_eq!(body["timestamps"][0]["end"], 0.2);
    assert_eq!(body["timestamps"][1]["start"], 0.3);
    assert!(body["issue"].is_null());
}

#[tokio::test]
async fn test_timestamps_endpoint_reports_underrun() {
    let body = json!({
        "content": "Hi there friend",
        "alignment": {
            "characters": ["H", "i"],
            "startTimes": [0.0, 0.1],
            "endTimes": [0.1, 0.2]
        }
    });
    let (status, body) = send(&app(), post("/api/narration/timestamps", body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["highlighting_complete"], false);
    assert_eq!(body["timestamps"].as_array().unwrap().len(), 1);
    assert!(body["issue"].as_str().unwrap().contains("underrun"));
}

#[tokio::test]
async fn test_prepare_then_fetch_asset() {
    let app = app();
    let (status, prepared) = send(
        &app,
        post(
            "/api/narration/prepare",
            json!({ "unit_id": "lesson-1", "content": LESSON }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(prepared["reused"], false);
    assert_eq!(prepared["asset"]["timestamps"].as_array().unwrap().len(), 7);
    let hash = prepared["asset"]["content_hash"].as_str().unwrap().to_string();

    let (status, again) = send(
        &app,
        post(
            "/api/narration/prepare",
            json!({ "unit_id": "lesson-1", "content": LESSON }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(again["reused"], true);

    let (status, asset) = send(
        &app,
        get(&format!("/api/narration/assets/lesson-1?content_hash={hash}")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(asset["audio_url"], prepared["asset"]["audio_url"]);

    let (status, body) = send(&app, get("/api/narration/assets/lesson-1?content_hash=other")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "STALE_ASSET");

    let (status, _) = send(&app, get("/api/narration/assets/lesson-1")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_missing_asset_is_not_found() {
    let (status, body) = send(&app(), get("/api/narration/assets/nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "ASSET_UNAVAILABLE");
}

#[tokio::test]
async fn test_prepare_rejects_empty_content() {
    let app = app();
    let (status, body) = send(
        &app,
        post(
            "/api/narration/prepare",
            json!({ "unit_id": "blank", "content": "<p> </p>" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "EMPTY_CONTENT");

    let (status, _) = send(
        &app,
        post("/api/narration/prepare", json!({ "unit_id": " ", "content": LESSON })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_file_backed_state() {
    let dir = tempfile::tempdir().unwrap();
    let store = narration_persistence::init(&PersistenceSettings {
        backend: StorageBackend::File,
        data_dir: dir.path().to_string_lossy().into_owned(),
    })
    .await
    .unwrap();
    let state = AppState::new(
        &NarrationSettings::default(),
        store,
        Arc::new(StubSpeechProvider::default()),
        None,
    );
    let app = create_router(state);

    let (status, _) = send(
        &app,
        post(
            "/api/narration/prepare",
            json!({ "unit_id": "unit/7", "content": "Hello world." }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(dir.path().join("unit_7.json").exists());
}
