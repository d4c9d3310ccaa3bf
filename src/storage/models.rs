use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Public URL prefix under which audio blobs are served.
pub const UPLOADS_PREFIX: &str = "/uploads/";

/// Page size used by listings when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// Upper bound on a single listing.
pub const MAX_PAGE_SIZE: usize = 2000;

/// Category recorded when a submission does not name one.
pub const DEFAULT_CATEGORY: &str = "기타";

/// Clamp a requested page size into `1..=MAX_PAGE_SIZE`.
pub fn clamp_page_size(requested: Option<u32>) -> usize {
    requested
        .map(|n| n as usize)
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE)
}

/// One submission stored in redb. Entries are never updated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    pub word: String,
    pub description: String,
    #[serde(default)]
    pub category: Option<String>,
    /// Object store key of the audio blob (`<uuid><ext>`)
    pub blob_key: String,
    pub created_at: DateTime<Utc>,
}

impl Entry {
    /// Public path the browser fetches the audio from.
    pub fn audio_path(&self) -> String {
        format!("{UPLOADS_PREFIX}{}", self.blob_key)
    }
}

/// Aggregate over all entries sharing one stored word.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordSummary {
    pub word: String,
    pub count: u64,
    pub latest: DateTime<Utc>,
}
