//! sori-archive - a community exhibit of recorded sound words
//!
//! Visitors submit a short recording of an onomatopoeic word with a description;
//! the gallery groups submissions by word for playback. This crate provides:
//! - Multipart submission intake with audio stored on the local filesystem
//! - redb embedded database for entries (ACID, MVCC, crash-safe)
//! - A JSON content document for page copy and styling
//! - Shared-secret admin operations (content edits, entry deletion)

pub mod admin;
pub mod api;
pub mod config;
pub mod content;
pub mod gallery;
pub mod ingest;
pub mod object_store;
pub mod storage;
#[cfg(test)]
pub mod testutil;

use std::sync::Arc;

use thiserror::Error;

use admin::AdminGateway;
use config::Config;
use content::{ContentError, ContentStore};
use storage::{Database, DatabaseError};

#[derive(Debug, Error)]
pub enum InitError {
    #[error("Failed to open database: {0}")]
    Database(#[from] DatabaseError),
    #[error("Failed to open content document: {0}")]
    Content(#[from] ContentError),
    #[error("Failed to prepare upload directory: {0}")]
    Uploads(#[from] std::io::Error),
}

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub content: ContentStore,
    pub object_store: Arc<dyn object_store::ObjectStore>,
    pub admin: AdminGateway,
}

impl AppState {
    /// Open every store named by the configuration, creating directories as needed.
    pub async fn open(config: Config) -> Result<Self, InitError> {
        let db = Database::open(&config.storage.data_dir)?;
        let content = ContentStore::open(&config.storage.data_dir).await?;
        let object_store = object_store::LocalStore::new(&config.storage.upload_dir)?;
        let admin = AdminGateway::new(&config.admin_key);

        Ok(Self {
            config,
            db,
            content,
            object_store: Arc::new(object_store),
            admin,
        })
    }
}
