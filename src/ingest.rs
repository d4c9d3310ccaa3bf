//! Submission intake: validate a recording, store its audio, record the entry.

use bytes::Bytes;
use chrono::Utc;
use thiserror::Error;

use crate::object_store::{ObjectStore, ObjectStoreError};
use crate::storage::models::{Entry, DEFAULT_CATEGORY};
use crate::storage::{Database, DatabaseError};

pub const MAX_WORD_CHARS: usize = 50;
pub const MAX_DESCRIPTION_CHARS: usize = 1000;
pub const MAX_CATEGORY_CHARS: usize = 50;

/// Extension used when the uploaded file name has none (browser recordings are webm).
pub const DEFAULT_AUDIO_EXTENSION: &str = ".webm";

const MAX_EXTENSION_CHARS: usize = 10;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("{0}")]
    Validation(String),
    #[error("audio exceeds maximum upload size of {0} bytes")]
    PayloadTooLarge(u64),
    #[error("failed to store audio: {0}")]
    Blob(#[from] ObjectStoreError),
    #[error("failed to record entry: {0}")]
    Database(#[from] DatabaseError),
}

/// Raw fields of one submission as received from the client.
#[derive(Debug, Clone, Default)]
pub struct Submission {
    pub word: String,
    pub description: String,
    pub category: Option<String>,
    pub audio: Option<Bytes>,
    /// File name the client declared for the audio part
    pub file_name: Option<String>,
}

/// Validate and persist a submission.
///
/// The blob is written before the entry. If the entry insert then fails the blob
/// stays behind unreferenced; it is logged and not cleaned up.
pub async fn ingest(
    db: &Database,
    store: &dyn ObjectStore,
    max_upload_size: u64,
    submission: Submission,
) -> Result<Entry, IngestError> {
    let word = sanitize_word(&submission.word);
    let description = truncate_chars(submission.description.trim(), MAX_DESCRIPTION_CHARS);

    if submission.word.trim().is_empty() {
        return Err(IngestError::Validation("word is required".into()));
    }
    if word.is_empty() {
        return Err(IngestError::Validation(
            "word has no usable characters".into(),
        ));
    }
    if description.is_empty() {
        return Err(IngestError::Validation("description is required".into()));
    }
    let audio = match submission.audio {
        Some(data) if !data.is_empty() => data,
        _ => return Err(IngestError::Validation("audio file is required".into())),
    };
    if audio.len() as u64 > max_upload_size {
        return Err(IngestError::PayloadTooLarge(max_upload_size));
    }

    let category = submission
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(|c| truncate_chars(c, MAX_CATEGORY_CHARS))
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

    let id = uuid::Uuid::new_v4().to_string();
    let blob_key = format!(
        "{}{}",
        uuid::Uuid::new_v4(),
        audio_extension(submission.file_name.as_deref())
    );

    // Phase 1: audio bytes
    store.put(&blob_key, audio).await?;

    // Phase 2: entry record
    let entry = Entry {
        id,
        word,
        description,
        category: Some(category),
        blob_key,
        created_at: Utc::now(),
    };
    if let Err(e) = db.put_entry(&entry) {
        tracing::error!(blob_key = %entry.blob_key, error = %e, "Entry insert failed, audio blob left orphaned");
        return Err(e.into());
    }

    tracing::debug!(entry_id = %entry.id, word = %entry.word, "Recorded submission");
    Ok(entry)
}

/// Strip characters that are unsafe in file names, then trim and cap the length.
pub fn sanitize_word(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(*c, '/' | '\\' | '?' | '<' | '>' | ':' | '*' | '|' | '"'))
        .filter(|c| !c.is_control())
        .collect();

    let cleaned = cleaned.trim_end_matches(&['.', ' '][..]);
    if cleaned.chars().all(|c| c == '.') || is_reserved_device_name(cleaned) {
        return String::new();
    }

    truncate_chars(cleaned.trim(), MAX_WORD_CHARS)
        .trim_end()
        .to_string()
}

/// Windows device names (`con`, `nul`, `com1`, ...) with or without an extension.
fn is_reserved_device_name(name: &str) -> bool {
    let stem = name.split('.').next().unwrap_or(name).to_ascii_lowercase();
    match stem.as_str() {
        "con" | "prn" | "aux" | "nul" => true,
        s if s.len() == 4 && (s.starts_with("com") || s.starts_with("lpt")) => {
            s.as_bytes()[3].is_ascii_digit()
        }
        _ => false,
    }
}

/// Keep at most `max` characters (not bytes).
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Extension (with leading dot) from a declared file name, or the webm default.
pub fn audio_extension(file_name: Option<&str>) -> String {
    file_name
        .and_then(|n| std::path::Path::new(n).extension())
        .and_then(|e| e.to_str())
        .filter(|e| {
            !e.is_empty()
                && e.len() <= MAX_EXTENSION_CHARS
                && e.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .map(|e| format!(".{}", e.to_ascii_lowercase()))
        .unwrap_or_else(|| DEFAULT_AUDIO_EXTENSION.to_string())
}
