//! HTTP routes and handlers

use crate::server::page::INDEX_HTML;
use crate::state::AppState;
use crate::telemetry::{MISSING_ASSETS_TOTAL, PREDICTIONS_TOTAL, PREDICTION_LATENCY_US};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use lyricgenre_classifiers::{image_path, GenreLabel, GenrePresentation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, error, warn};

/// URL prefix under which genre images are served
pub const STATIC_PREFIX: &str = "/static/";

// ============================================================================
// Page and health endpoints
// ============================================================================

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    match &state.metrics_handle {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed").into_response(),
    }
}

// ============================================================================
// Classification
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    pub lyrics: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenreScore {
    pub label: String,
    pub score: f32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClassifyResponse {
    /// Raw genre label
    pub label: String,
    pub display_name: String,
    pub message: String,
    /// Public URL of the genre image, `None` when the asset is missing
    pub image: Option<String>,
    pub score: f32,
    pub scores: Vec<GenreScore>,
    pub latency_us: u64,
}

pub async fn classify(
    State(state): State<AppState>,
    payload: Result<Json<ClassifyRequest>, JsonRejection>,
) -> Result<Json<ClassifyResponse>, AppError> {
    let Json(req) = payload.map_err(|e| AppError::InvalidRequest(e.body_text()))?;

    // Lyrics are passed to the model untouched and never logged
    debug!("Classifying {} bytes of lyrics", req.lyrics.len());

    let result = state.model.classifier().classify(&req.lyrics).await?;

    metrics::counter!(PREDICTIONS_TOTAL, "label" => result.label.to_string()).increment(1);
    metrics::histogram!(PREDICTION_LATENCY_US).record(result.latency_us as f64);

    let presentation = GenrePresentation::new(result.label.clone(), state.image_dir());
    let image = resolve_image(&presentation).await;

    let scores = result
        .metadata
        .all_scores
        .unwrap_or_default()
        .into_iter()
        .map(|(label, score)| GenreScore {
            label: label.to_string(),
            score,
        })
        .collect();

    Ok(Json(ClassifyResponse {
        label: presentation.label.to_string(),
        display_name: presentation.display_name,
        message: presentation.message,
        image,
        score: result.score,
        scores,
        latency_us: result.latency_us,
    }))
}

/// Public image URL if the image file exists on disk
async fn resolve_image(presentation: &GenrePresentation) -> Option<String> {
    match tokio::fs::try_exists(&presentation.image_path).await {
        Ok(true) => Some(public_image_url(&presentation.label)),
        Ok(false) => {
            let err = lyricgenre_core::Error::asset_missing(
                presentation.label.as_str(),
                presentation.image_path.as_str(),
            );
            warn!("{}", err);
            metrics::counter!(MISSING_ASSETS_TOTAL).increment(1);
            None
        }
        Err(e) => {
            warn!("Failed to check image {}: {}", presentation.image_path, e);
            metrics::counter!(MISSING_ASSETS_TOTAL).increment(1);
            None
        }
    }
}

fn public_image_url(label: &GenreLabel) -> String {
    image_path(STATIC_PREFIX, label)
}

// ============================================================================
// Model introspection
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct GenreInfo {
    pub label: String,
    pub display_name: String,
    pub image: String,
}

pub async fn list_genres(State(state): State<AppState>) -> impl IntoResponse {
    let genres: Vec<GenreInfo> = state
        .model
        .metadata()
        .labels
        .iter()
        .map(|label| GenreInfo {
            label: label.to_string(),
            display_name: label.display_name().to_string(),
            image: public_image_url(label),
        })
        .collect();

    Json(genres)
}

pub async fn model_info(State(state): State<AppState>) -> impl IntoResponse {
    let metadata = state.model.metadata();
    Json(json!({
        "name": metadata.name,
        "version": metadata.version,
        "labels": metadata.labels,
        "source": metadata.source,
        "sha256": metadata.sha256,
        "size_bytes": metadata.size_bytes,
    }))
}

pub async fn fallback() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": { "message": "Not found", "type": "not_found" } })),
    )
}

// ============================================================================
// Error handling
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("{0}")]
    Internal(String),
}

impl From<lyricgenre_core::Error> for AppError {
    fn from(err: lyricgenre_core::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind) = match &self {
            AppError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request_error"),
            AppError::Internal(msg) => {
                error!("Request failed: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        };

        let body = json!({
            "error": {
                "message": self.to_string(),
                "type": kind,
            }
        });

        (status, Json(body)).into_response()
    }
}
