//! Image storage using an S3-compatible bucket (e.g. Cloudflare R2)
//!
//! The service never handles image bytes itself: it signs a
//! time-limited PUT URL, the client uploads directly, and the returned
//! object key is stored on the post as an opaque reference.

use std::time::Duration;

use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::presigning::PresigningConfig;

use crate::data::EntityId;
use crate::error::AppError;

/// An issued upload grant.
#[derive(Debug, Clone)]
pub struct UploadGrant {
    /// Presigned PUT URL, valid until the configured TTL elapses
    pub upload_url: String,
    /// Object key to store as the post's image reference
    pub key: String,
    /// Public URL the object will be served from once uploaded
    pub public_url: String,
}

/// Media storage service
///
/// Issues presigned upload URLs against the configured bucket and
/// composes public URLs for stored keys.
pub struct MediaStorage {
    client: S3Client,
    bucket: String,
    /// Public URL base (Custom Domain)
    /// e.g., "https://media.example.com"
    public_url: String,
    upload_url_ttl: Duration,
}

fn image_file_extension(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

impl MediaStorage {
    /// Create new media storage client
    ///
    /// # Errors
    /// Returns error if S3 client initialization fails
    pub async fn new(config: &crate::config::StorageConfig) -> Result<Self, AppError> {
        use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};

        let credentials = Credentials::new(
            &config.access_key_id,
            &config.secret_access_key,
            None,
            None,
            "warbler-storage",
        );

        let s3_config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("auto"))
            .endpoint_url(&config.endpoint)
            .credentials_provider(credentials)
            .build();

        let client = S3Client::from_conf(s3_config);

        Ok(Self {
            client,
            bucket: config.bucket.clone(),
            public_url: config.public_url.clone(),
            upload_url_ttl: Duration::from_secs(config.upload_url_ttl_seconds),
        })
    }

    /// Issue a presigned PUT URL for a new image object.
    ///
    /// # Arguments
    /// * `userid` - Uploading user, used as a key prefix
    /// * `content_type` - MIME type the client will upload
    ///
    /// # Errors
    /// `Validation` for unsupported content types, `Storage` if
    /// signing fails.
    pub async fn create_upload_url(
        &self,
        userid: &str,
        content_type: &str,
    ) -> Result<UploadGrant, AppError> {
        let extension = image_file_extension(content_type).ok_or_else(|| {
            AppError::Validation(format!("Unsupported image content type: {content_type}"))
        })?;

        let key = format!("uploads/{}/{}.{}", userid, EntityId::new().0, extension);

        let presigning = PresigningConfig::expires_in(self.upload_url_ttl)
            .map_err(|e| AppError::Storage(format!("Invalid presigning lifetime: {e}")))?;

        let presigned = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type(content_type)
            .presigned(presigning)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to presign upload URL: {e}")))?;

        Ok(UploadGrant {
            upload_url: presigned.uri().to_string(),
            public_url: self.get_public_url(&key),
            key,
        })
    }

    /// Public URL for a stored object key.
    pub fn get_public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_url.trim_end_matches('/'), key)
    }
}
