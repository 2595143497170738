//! Storage layer
//!
//! S3-compatible object storage, used only to sign image upload URLs.

mod media;

pub use media::{MediaStorage, UploadGrant};
