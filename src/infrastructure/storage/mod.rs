use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;

pub mod classification;
mod filesystem;
mod media_store;
pub mod presigned_urls;
mod s3;

pub use classification::*;
pub use filesystem::FilesystemBlobStore;
pub use media_store::MediaStore;
pub use presigned_urls::{PresignedUrlError, PresignedUrlService};
pub use s3::S3BlobStore;

use crate::domain::value_objects::ObjectKey;

/// Error types for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Object not found: {key}")]
    NotFound { key: String },

    #[error("File size {size} exceeds maximum allowed size of {max_size} bytes")]
    TooLarge { size: u64, max_size: u64 },

    #[error("IO error: {message}")]
    Io { message: String },

    #[error("Storage backend error: {message}")]
    Backend { message: String },
}

impl From<std::io::Error> for StorageError {
    fn from(error: std::io::Error) -> Self {
        StorageError::Io { message: error.to_string() }
    }
}

/// Object storage holding the raw bytes of uploads
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Write `data` under `key`, replacing anything already there
    async fn put(
        &self,
        key: &ObjectKey,
        data: Bytes,
        content_type: &str,
    ) -> Result<(), StorageError>;

    async fn get(&self, key: &ObjectKey) -> Result<Bytes, StorageError>;

    /// Remove `key`; `Ok(false)` when there was nothing to remove
    async fn delete(&self, key: &ObjectKey) -> Result<bool, StorageError>;

    /// Time-limited URL granting read access to `key`
    async fn presigned_url(&self, key: &ObjectKey, ttl: Duration) -> Result<String, StorageError>;

    async fn health_check(&self) -> Result<(), StorageError> {
        Ok(())
    }
}
