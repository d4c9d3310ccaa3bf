mod content;
mod entries;
mod health;
mod static_files;

use crate::admin::AdminError;
use crate::api::response::ApiError;
use crate::ingest::IngestError;

pub use content::{authenticate, get_content, save_content};
pub use entries::{delete_entry, gallery, list_entries, list_words, submit_entry};
pub use health::health;
pub use static_files::serve_upload;

/// Map an AdminError to an ApiError
fn admin_error(e: AdminError) -> ApiError {
    match e {
        AdminError::Unauthorized => ApiError::unauthorized(),
        AdminError::NotFound => ApiError::not_found("not_found"),
        _ => ApiError::internal(e),
    }
}

/// Map an IngestError to an ApiError
fn ingest_error(e: IngestError) -> ApiError {
    match e {
        IngestError::Validation(msg) => ApiError::bad_request(msg),
        IngestError::PayloadTooLarge(_) => ApiError::payload_too_large(e.to_string()),
        _ => ApiError::internal(e),
    }
}
