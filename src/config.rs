use thiserror::Error;

/// Admin key used when `CONTENT_ADMIN_KEY` is unset. Only suitable for local runs.
pub const DEFAULT_ADMIN_KEY: &str = "changeme";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    /// Shared secret expected in the `x-admin-key` header
    pub admin_key: String,
    /// Maximum audio upload size in bytes
    pub max_upload_size: u64,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_address: String,
    /// Directory of static pages served at `/`
    pub public_dir: String,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Holds the redb database and `content.json`
    pub data_dir: String,
    /// Directory of audio blobs served at `/uploads`
    pub upload_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            public_dir: "./public".to_string(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "./data".to_string(),
            upload_dir: "./uploads".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let bind_address = std::env::var("BIND_ADDRESS").unwrap_or_else(|_| {
            match std::env::var("PORT").ok().filter(|p| !p.trim().is_empty()) {
                Some(port) => format!("0.0.0.0:{}", port.trim()),
                None => ServerConfig::default().bind_address,
            }
        });

        let public_dir = std::env::var("PUBLIC_DIR").unwrap_or_else(|_| "./public".to_string());
        let data_dir = std::env::var("DATA_DIR").unwrap_or_else(|_| "./data".to_string());
        let upload_dir = std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "./uploads".to_string());

        let admin_key =
            std::env::var("CONTENT_ADMIN_KEY").unwrap_or_else(|_| DEFAULT_ADMIN_KEY.to_string());

        let max_upload_size = std::env::var("MAX_UPLOAD_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10 * 1024 * 1024); // 10MB

        let config = Config {
            server: ServerConfig {
                bind_address,
                public_dir,
            },
            storage: StorageConfig {
                data_dir,
                upload_dir,
            },
            admin_key,
            max_upload_size,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.admin_key.is_empty() {
            return Err(ConfigError::ValidationError(
                "CONTENT_ADMIN_KEY cannot be empty".to_string(),
            ));
        }

        if self.max_upload_size == 0 {
            return Err(ConfigError::ValidationError(
                "MAX_UPLOAD_SIZE must be greater than 0".to_string(),
            ));
        }

        if self.admin_key == DEFAULT_ADMIN_KEY {
            tracing::warn!("Admin key is the built-in default. Set CONTENT_ADMIN_KEY in production.");
        }

        Ok(())
    }
}
