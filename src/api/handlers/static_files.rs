use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use crate::api::response::ApiError;
use crate::object_store::ObjectStoreError;
use crate::AppState;

/// Serve a stored audio blob.
/// Route: GET /uploads/:key
pub async fn serve_upload(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<Response, ApiError> {
    let data = state.object_store.get(&key).await.map_err(|e| match e {
        ObjectStoreError::NotFound(_) | ObjectStoreError::InvalidKey(_) => {
            ApiError::not_found("not_found")
        }
        _ => ApiError::internal(format!("Failed to retrieve audio: {e}")),
    })?;

    let byte_size = data.len() as u64;
    let mut response = (StatusCode::OK, data).into_response();
    let headers = response.headers_mut();

    let mime_type = audio_mime_type(&key);
    headers.insert(
        header::CONTENT_TYPE,
        mime_type
            .parse()
            .unwrap_or(header::HeaderValue::from_static("application/octet-stream")),
    );

    headers.insert(header::CONTENT_LENGTH, header::HeaderValue::from(byte_size));

    // Blob keys are never reused, so the bytes behind a key never change
    headers.insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("public, max-age=31536000, immutable"),
    );

    Ok(response)
}

/// Guess a content type for an audio blob. Containers that double as video
/// (`.webm`, `.mp4`) are reported with the `audio/` top-level type.
fn audio_mime_type(key: &str) -> String {
    match mime_guess::from_path(key).first() {
        Some(m) if m.type_() == "video" => format!("audio/{}", m.subtype()),
        Some(m) => m.to_string(),
        None => "application/octet-stream".to_string(),
    }
}
