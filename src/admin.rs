//! Shared-secret gate in front of every mutating admin operation.
//!
//! The credential is passed explicitly on each call; nothing is remembered between calls.

use ring::hmac;
use thiserror::Error;

use crate::content::{ContentDocument, ContentError, ContentStore, ContentUpdate};
use crate::object_store::ObjectStore;
use crate::storage::{Database, DatabaseError, Entry};

/// Request header carrying the admin key.
pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

/// Message signed with the admin key; only the resulting tag is kept in memory.
const KEY_CHECK_MESSAGE: &[u8] = b"sori-archive admin key";

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("entry not found")]
    NotFound,
    #[error("Content error: {0}")]
    Content(#[from] ContentError),
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

pub struct AdminGateway {
    key_tag: hmac::Tag,
}

impl AdminGateway {
    pub fn new(admin_key: &str) -> Self {
        Self {
            key_tag: hmac::sign(&signing_key(admin_key), KEY_CHECK_MESSAGE),
        }
    }

    /// Check a credential without side effects.
    pub fn verify(&self, credential: Option<&str>) -> Result<(), AdminError> {
        let supplied = credential.ok_or(AdminError::Unauthorized)?;
        hmac::verify(
            &signing_key(supplied),
            KEY_CHECK_MESSAGE,
            self.key_tag.as_ref(),
        )
        .map_err(|_| AdminError::Unauthorized)
    }

    pub async fn save_content(
        &self,
        credential: Option<&str>,
        content: &ContentStore,
        update: &ContentUpdate,
    ) -> Result<ContentDocument, AdminError> {
        self.verify(credential)?;
        let saved = content.save(update).await?;
        tracing::info!("Content document updated");
        Ok(saved)
    }

    /// Delete the entry record, then remove its audio blob on a best-effort basis.
    pub async fn delete_entry(
        &self,
        credential: Option<&str>,
        db: &Database,
        store: &dyn ObjectStore,
        id: &str,
    ) -> Result<Entry, AdminError> {
        self.verify(credential)?;

        let entry = db.delete_entry(id)?.ok_or(AdminError::NotFound)?;

        if let Err(e) = store.delete(&entry.blob_key).await {
            tracing::warn!(entry_id = %id, blob_key = %entry.blob_key, error = %e, "Failed to delete audio blob");
        }

        tracing::info!(entry_id = %id, word = %entry.word, "Deleted entry");
        Ok(entry)
    }
}

fn signing_key(key: &str) -> hmac::Key {
    hmac::Key::new(hmac::HMAC_SHA256, key.as_bytes())
}
