//! Shared test helpers for handler unit tests.

use std::sync::Arc;

use crate::config::{Config, ServerConfig, StorageConfig};
use crate::AppState;

pub const TEST_ADMIN_KEY: &str = "test-admin-key";

/// Create a test AppState with a temporary database, content document and upload dir.
pub async fn test_state(temp_dir: &tempfile::TempDir) -> Arc<AppState> {
    let config = Config {
        server: ServerConfig {
            bind_address: "127.0.0.1:0".to_string(),
            public_dir: temp_dir.path().join("public").to_string_lossy().to_string(),
        },
        storage: StorageConfig {
            data_dir: temp_dir.path().join("data").to_string_lossy().to_string(),
            upload_dir: temp_dir.path().join("uploads").to_string_lossy().to_string(),
        },
        admin_key: TEST_ADMIN_KEY.to_string(),
        max_upload_size: 1024 * 1024, // 1MB for tests
    };

    let state = AppState::open(config)
        .await
        .expect("Failed to open test state");
    Arc::new(state)
}
