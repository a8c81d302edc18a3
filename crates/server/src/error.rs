//! HTTP error mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use narration_core::NarrationError;
use narration_persistence::PersistenceError;
use narration_pipeline::PipelineError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Narration(#[from] NarrationError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("metrics exporter is not installed")]
    MetricsDisabled,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

fn narration_status(err: &NarrationError) -> (StatusCode, &'static str) {
    match err {
        NarrationError::AssetUnavailable { .. } => (StatusCode::NOT_FOUND, "ASSET_UNAVAILABLE"),
        NarrationError::StaleAsset { .. } => (StatusCode::CONFLICT, "STALE_ASSET"),
        NarrationError::NormalizationMismatch { .. } => {
            (StatusCode::UNPROCESSABLE_ENTITY, "NORMALIZATION_MISMATCH")
        }
        NarrationError::AlignmentUnderrun { .. } => {
            (StatusCode::UNPROCESSABLE_ENTITY, "ALIGNMENT_UNDERRUN")
        }
        NarrationError::InvalidAlignment(_) => {
            (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_ALIGNMENT")
        }
        NarrationError::Provider(_) => (StatusCode::BAD_GATEWAY, "PROVIDER_ERROR"),
        NarrationError::Playback(_) => (StatusCode::INTERNAL_SERVER_ERROR, "PLAYBACK_ERROR"),
    }
}

impl ServerError {
    pub fn status(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Narration(err) | Self::Pipeline(PipelineError::Narration(err)) => {
                narration_status(err)
            }
            Self::Pipeline(PipelineError::EmptyContent(_)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "EMPTY_CONTENT")
            }
            Self::Pipeline(PipelineError::Provider { .. }) => {
                (StatusCode::BAD_GATEWAY, "PROVIDER_ERROR")
            }
            Self::Persistence(PersistenceError::InvalidUnitId(_))
            | Self::Pipeline(PipelineError::Persistence(PersistenceError::InvalidUnitId(_))) => {
                (StatusCode::BAD_REQUEST, "INVALID_UNIT_ID")
            }
            Self::Persistence(_) | Self::Pipeline(PipelineError::Persistence(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR")
            }
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::MetricsDisabled => (StatusCode::NOT_FOUND, "METRICS_DISABLED"),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, code) = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, code, "Request failed");
        } else {
            tracing::debug!(error = %self, code, "Request rejected");
        }
        let body = ErrorBody {
            error: self.to_string(),
            code,
        };
        (status, Json(body)).into_response()
    }
}
