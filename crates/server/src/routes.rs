//! HTTP routes
//!
//! - `GET  /health`
//! - `GET  /metrics` (Prometheus text format)
//! - `POST /api/narration/document`: normalized text, words and header markers
//! - `POST /api/narration/timestamps`: word timestamps from a character alignment
//! - `POST /api/narration/prepare`: synthesize and store a unit's narration
//! - `GET  /api/narration/assets/:unit_id?content_hash=`: stored asset lookup

use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Json};
use axum::routing::{get, post};
use axum::Router;
use narration_core::{CharacterAlignment, NarrationError, WordTimestamp};
use narration_persistence::{AssetStore, NarrationAsset};
use narration_pipeline::align_document;
use narration_text_processing::{NarrationDocument, SyncReport};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::error::ServerError;
use crate::state::AppState;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route("/api/narration/document", post(document_handler))
        .route("/api/narration/timestamps", post(timestamps_handler))
        .route("/api/narration/prepare", post(prepare_handler))
        .route("/api/narration/assets/:unit_id", get(asset_handler))
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn metrics_handler(State(state): State<AppState>) -> Result<String, ServerError> {
    let handle = state.metrics.as_ref().ok_or(ServerError::MetricsDisabled)?;
    Ok(handle.render())
}

#[derive(Debug, Deserialize)]
pub struct DocumentRequest {
    pub content: String,
}

async fn document_handler(
    State(state): State<AppState>,
    Json(req): Json<DocumentRequest>,
) -> Json<NarrationDocument> {
    Json(NarrationDocument::from_content(&req.content, &state.rules))
}

#[derive(Debug, Deserialize)]
pub struct TimestampsRequest {
    pub content: String,
    pub alignment: CharacterAlignment,
}

#[derive(Debug, Serialize)]
pub struct TimestampsResponse {
    pub timestamps: Vec<WordTimestamp>,
    pub content_hash: String,
    pub highlighting_complete: bool,
    pub sync: SyncReport,
    pub issue: Option<String>,
}

async fn timestamps_handler(
    State(state): State<AppState>,
    Json(req): Json<TimestampsRequest>,
) -> Json<TimestampsResponse> {
    let document = NarrationDocument::from_content(&req.content, &state.rules);
    let aggregation = align_document(&document, &req.alignment);
    let sync = document.check_sync(&aggregation.words);

    let issue = aggregation
        .underrun
        .or_else(|| sync.into_result().err())
        .map(|e| e.to_string());

    Json(TimestampsResponse {
        highlighting_complete: issue.is_none(),
        timestamps: aggregation.words,
        content_hash: document.fingerprint,
        sync,
        issue,
    })
}

#[derive(Debug, Deserialize)]
pub struct PrepareRequest {
    pub unit_id: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct PrepareResponse {
    pub asset: NarrationAsset,
    pub reused: bool,
    pub issue: Option<String>,
}

async fn prepare_handler(
    State(state): State<AppState>,
    Json(req): Json<PrepareRequest>,
) -> Result<Json<PrepareResponse>, ServerError> {
    if req.unit_id.trim().is_empty() {
        return Err(ServerError::BadRequest("unit_id must not be empty".to_string()));
    }
    let prepared = state.preparer.prepare(&req.unit_id, &req.content).await?;
    Ok(Json(PrepareResponse {
        asset: prepared.asset,
        reused: prepared.reused,
        issue: prepared.issue.map(|e| e.to_string()),
    }))
}

#[derive(Debug, Deserialize)]
pub struct AssetQuery {
    pub content_hash: Option<String>,
}

async fn asset_handler(
    State(state): State<AppState>,
    Path(unit_id): Path<String>,
    Query(query): Query<AssetQuery>,
) -> Result<Json<NarrationAsset>, ServerError> {
    let asset = match query.content_hash {
        Some(hash) => state.store.lookup(&unit_id, &hash).await?.into_result(&unit_id)?,
        None => state
            .store
            .get(&unit_id)
            .await?
            .ok_or_else(|| NarrationError::asset_unavailable(&unit_id))?,
    };
    Ok(Json(asset))
}
