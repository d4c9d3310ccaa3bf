use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{admin_error, ingest_error};
use crate::api::response::{AdminKey, ApiError, AppQuery, Envelope};
use crate::gallery::{assemble, WordGroup};
use crate::ingest::{self, Submission};
use crate::storage::models::{clamp_page_size, DEFAULT_PAGE_SIZE};
use crate::storage::{Entry, WordSummary};
use crate::AppState;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct EntryResponse {
    pub audio_path: String,
    pub category: Option<String>,
    pub created_at: String,
    pub description: String,
    pub id: String,
    pub word: String,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub audio_path: String,
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct ListEntriesResponse {
    pub items: Vec<EntryResponse>,
}

#[derive(Debug, Serialize)]
pub struct WordResponse {
    pub count: u64,
    pub latest: String,
    pub word: String,
}

#[derive(Debug, Serialize)]
pub struct ListWordsResponse {
    pub words: Vec<WordResponse>,
}

#[derive(Debug, Serialize)]
pub struct GroupResponse {
    pub items: Vec<EntryResponse>,
    pub word: String,
}

#[derive(Debug, Serialize)]
pub struct GalleryResponse {
    pub groups: Vec<GroupResponse>,
}

#[derive(Debug, Serialize)]
pub struct DeleteEntryResponse {
    pub id: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListEntriesParams {
    #[serde(default)]
    pub word: Option<String>,
    #[serde(default, rename = "pageSize")]
    pub page_size: Option<u32>,
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn submit_entry(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Envelope<SubmitResponse>>, ApiError> {
    let mut multipart =
        multipart.map_err(|e| ApiError::bad_request(format!("Invalid multipart request: {e}")))?;
    let mut submission = Submission::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "audio" => {
                submission.file_name = field.file_name().map(|s| s.to_string());
                submission.audio = Some(field.bytes().await.map_err(multipart_error)?);
            }
            "word" => {
                submission.word = field.text().await.map_err(multipart_error)?;
            }
            "description" => {
                submission.description = field.text().await.map_err(multipart_error)?;
            }
            "category" => {
                submission.category = Some(field.text().await.map_err(multipart_error)?);
            }
            _ => {
                // Ignore unknown fields
            }
        }
    }

    let entry = ingest::ingest(
        &state.db,
        state.object_store.as_ref(),
        state.config.max_upload_size,
        submission,
    )
    .await
    .map_err(ingest_error)?;

    Ok(Envelope::success(SubmitResponse {
        audio_path: entry.audio_path(),
        id: entry.id,
    }))
}

pub async fn list_entries(
    State(state): State<Arc<AppState>>,
    AppQuery(params): AppQuery<ListEntriesParams>,
) -> Result<Json<Envelope<ListEntriesResponse>>, ApiError> {
    let word = params
        .word
        .as_deref()
        .map(str::trim)
        .filter(|w| !w.is_empty());
    let limit = clamp_page_size(params.page_size);

    let entries = state
        .db
        .list_entries(word, limit)
        .map_err(ApiError::internal)?;

    Ok(Envelope::success(ListEntriesResponse {
        items: entries.iter().map(entry_to_response).collect(),
    }))
}

pub async fn list_words(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Envelope<ListWordsResponse>>, ApiError> {
    let summaries = state.db.word_summaries().map_err(ApiError::internal)?;

    Ok(Envelope::success(ListWordsResponse {
        words: summaries.iter().map(word_to_response).collect(),
    }))
}

/// Entries grouped by word in a fresh random order on every request.
pub async fn gallery(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Envelope<GalleryResponse>>, ApiError> {
    let entries = state
        .db
        .list_entries(None, DEFAULT_PAGE_SIZE)
        .map_err(ApiError::internal)?;

    let groups = shuffled_groups(entries);

    Ok(Envelope::success(GalleryResponse {
        groups: groups.iter().map(group_to_response).collect(),
    }))
}

pub async fn delete_entry(
    State(state): State<Arc<AppState>>,
    key: AdminKey,
    Path(id): Path<String>,
) -> Result<Json<Envelope<DeleteEntryResponse>>, ApiError> {
    let entry = state
        .admin
        .delete_entry(key.as_deref(), &state.db, state.object_store.as_ref(), &id)
        .await
        .map_err(admin_error)?;

    Ok(Envelope::success(DeleteEntryResponse { id: entry.id }))
}

// ============================================================================
// Helpers
// ============================================================================

fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::payload_too_large("audio exceeds maximum upload size")
    } else {
        ApiError::bad_request(format!("Invalid multipart data: {}", e.body_text()))
    }
}

/// Kept out of async code: the thread-local RNG must not live across an await.
fn shuffled_groups(entries: Vec<Entry>) -> Vec<WordGroup> {
    let mut rng = rand::rng();
    assemble(entries, &mut rng)
}

fn entry_to_response(entry: &Entry) -> EntryResponse {
    EntryResponse {
        audio_path: entry.audio_path(),
        category: entry.category.clone(),
        created_at: entry.created_at.to_rfc3339(),
        description: entry.description.clone(),
        id: entry.id.clone(),
        word: entry.word.clone(),
    }
}

fn word_to_response(summary: &WordSummary) -> WordResponse {
    WordResponse {
        count: summary.count,
        latest: summary.latest.to_rfc3339(),
        word: summary.word.clone(),
    }
}

fn group_to_response(group: &WordGroup) -> GroupResponse {
    GroupResponse {
        items: group.items.iter().map(entry_to_response).collect(),
        word: group.word.clone(),
    }
}
