use crate::server::AppState;
use articast_core::ArticastError;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Body of `POST /api/generate`.
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    /// Article URL to convert.
    pub url: Option<String>,
}

/// Success payload of `POST /api/generate`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    /// Always true on the success path.
    pub success: bool,
    /// Artifact id assigned by the store.
    pub id: Uuid,
    /// Extracted article title.
    pub title: String,
    /// Narratable summary.
    pub summary: String,
    /// Ordered key points.
    pub key_points: Vec<String>,
    /// Ordered image references, up to three entries.
    pub image_urls: Vec<String>,
    /// The progress session id, for the stream endpoint.
    pub session_id: String,
}

/// Runs the generation pipeline for one URL and returns synchronously.
///
/// The client may pin the progress session id via the `x-session-id` header
/// (so it can open the stream before this call returns); otherwise one is
/// generated. The requesting principal comes from `x-client-id`.
pub async fn generate_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<GenerateRequest>,
) -> Response {
    let url = req.url.as_deref().map(str::trim).unwrap_or_default();
    if url.is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Missing URL",
            "the request body must include a non-empty 'url' field".to_string(),
            true,
        );
    }

    let session_id = header_value(&headers, "x-session-id")
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let owner_id =
        header_value(&headers, "x-client-id").unwrap_or_else(|| "anonymous".to_string());

    info!(session_id = %session_id, owner_id = %owner_id, "Generation requested");

    match state.generator.generate(&session_id, &owner_id, url).await {
        Ok(artifact) => Json(GenerateResponse {
            success: true,
            id: artifact.id,
            title: artifact.title,
            summary: artifact.summary,
            key_points: artifact.key_points,
            image_urls: artifact.image_urls,
            session_id,
        })
        .into_response(),
        Err(e @ ArticastError::Session(_)) => {
            warn!(session_id = %session_id, error = %e, "Duplicate session id");
            error_response(
                StatusCode::CONFLICT,
                "Session already in progress",
                e.to_string(),
                true,
            )
        }
        Err(e) => {
            warn!(session_id = %session_id, error = %e, "Generation failed");
            error_response(
                StatusCode::BAD_GATEWAY,
                "Generation failed",
                e.to_string(),
                !state.production,
            )
        }
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

fn error_response(
    status: StatusCode,
    error: &str,
    details: String,
    show_details: bool,
) -> Response {
    let details = if show_details {
        details
    } else {
        "see server logs".to_string()
    };
    (
        status,
        Json(serde_json::json!({ "error": error, "details": details })),
    )
        .into_response()
}
