//! Configuration management
//!
//! Loads configuration from:
//! 1. Default values
//! 2. Configuration files (config/default.toml, config/local.toml)
//! 3. Environment variables (override)

use serde::Deserialize;
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0")
    pub host: String,
    /// Port number (e.g., 8080)
    pub port: u16,
}

/// Database configuration (SQLite only)
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to SQLite database file
    pub path: PathBuf,
}

/// Object storage configuration (S3-compatible, e.g. Cloudflare R2)
///
/// Used only for signing image upload URLs; the service never reads
/// object contents back.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Bucket name for post images
    pub bucket: String,
    /// Public URL base for uploaded objects (Custom Domain)
    /// e.g., "https://media.example.com"
    pub public_url: String,
    /// S3-compatible endpoint URL
    /// e.g., "https://{account_id}.r2.cloudflarestorage.com"
    pub endpoint: String,
    /// Access key ID
    pub access_key_id: String,
    /// Secret access key
    pub secret_access_key: String,
    /// Lifetime of issued upload URLs in seconds (default: 900)
    #[serde(default = "default_upload_url_ttl_seconds")]
    pub upload_url_ttl_seconds: u64,
}

fn default_upload_url_ttl_seconds() -> u64 {
    900
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    pub level: String,
    /// Log format: "pretty" or "json"
    pub format: String,
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// # Loading Order
    /// 1. Default values
    /// 2. config/default.toml (if exists)
    /// 3. config/local.toml (if exists)
    /// 4. Environment variables (WARBLER_*)
    ///
    /// # Errors
    /// Returns error if configuration is invalid
    pub fn load() -> Result<Self, crate::error::AppError> {
        use config::{Config, Environment, File};

        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("storage.upload_url_ttl_seconds", 900)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            // Load from config/default.toml if it exists
            .add_source(File::with_name("config/default").required(false))
            // Load from config/local.toml if it exists (overrides default)
            .add_source(File::with_name("config/local").required(false))
            // Load from environment variables (WARBLER_*)
            .add_source(
                Environment::with_prefix("WARBLER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| crate::error::AppError::Config(e.to_string()))?;

        let app_config: Self = config
            .try_deserialize()
            .map_err(|e| crate::error::AppError::Config(e.to_string()))?;
        app_config.validate()?;
        Ok(app_config)
    }

    fn validate(&self) -> Result<(), crate::error::AppError> {
        if self.storage.upload_url_ttl_seconds == 0 {
            return Err(crate::error::AppError::Config(
                "storage.upload_url_ttl_seconds must be greater than 0".to_string(),
            ));
        }

        if self.storage.public_url.trim_end_matches('/').is_empty() {
            return Err(crate::error::AppError::Config(
                "storage.public_url must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> AppConfig {
        AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                path: PathBuf::from("/tmp/warbler-test.db"),
            },
            storage: StorageConfig {
                bucket: "media".to_string(),
                public_url: "https://media.example.com".to_string(),
                endpoint: "https://account.r2.cloudflarestorage.com".to_string(),
                access_key_id: "access-key".to_string(),
                secret_access_key: "secret-key".to_string(),
                upload_url_ttl_seconds: 900,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        }
    }

    #[test]
    fn validate_accepts_defaults() {
        let config = valid_config();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_upload_ttl() {
        let mut config = valid_config();
        config.storage.upload_url_ttl_seconds = 0;

        let error = config
            .validate()
            .expect_err("zero upload URL lifetime must fail");
        assert!(matches!(
            error,
            crate::error::AppError::Config(message)
                if message.contains("upload_url_ttl_seconds")
        ));
    }

    #[test]
    fn validate_rejects_empty_public_url() {
        let mut config = valid_config();
        config.storage.public_url = "/".to_string();

        let error = config
            .validate()
            .expect_err("empty public URL must fail");
        assert!(matches!(
            error,
            crate::error::AppError::Config(message)
                if message.contains("storage.public_url")
        ));
    }
}
