use axum::extract::State;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

use super::admin_error;
use crate::api::response::{AdminKey, ApiError, AppJson, Envelope};
use crate::content::{ContentDocument, ContentUpdate};
use crate::AppState;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct AuthResponse {}

#[derive(Debug, Serialize)]
pub struct SaveContentResponse {
    pub content: ContentDocument,
}

// ============================================================================
// Handlers
// ============================================================================

/// Public read of the page copy and styling. Not wrapped in the envelope.
pub async fn get_content(State(state): State<Arc<AppState>>) -> Json<ContentDocument> {
    Json(state.content.load().await)
}

pub async fn authenticate(
    State(state): State<Arc<AppState>>,
    key: AdminKey,
) -> Result<Json<Envelope<AuthResponse>>, ApiError> {
    state.admin.verify(key.as_deref()).map_err(admin_error)?;
    Ok(Envelope::success(AuthResponse {}))
}

pub async fn save_content(
    State(state): State<Arc<AppState>>,
    key: AdminKey,
    body: Result<AppJson<ContentUpdate>, ApiError>,
) -> Result<Json<Envelope<SaveContentResponse>>, ApiError> {
    // A bad key is reported as 401 even when the body is unreadable
    state.admin.verify(key.as_deref()).map_err(admin_error)?;
    let AppJson(update) = body?;

    let content = state
        .admin
        .save_content(key.as_deref(), &state.content, &update)
        .await
        .map_err(admin_error)?;

    Ok(Envelope::success(SaveContentResponse { content }))
}
