use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;

use super::{BlobStore, Classification, ClassificationError, StorageError, UploadPolicy};
use crate::domain::value_objects::{choose_extension, ObjectKey};
use crate::infrastructure::config::StorageConfig;

/// Classification and blob handling for uploaded media
///
/// Wraps a `BlobStore` with the upload policy and the lifetime of generated
/// read URLs.
#[derive(Clone)]
pub struct MediaStore {
    blobs: Arc<dyn BlobStore>,
    policy: UploadPolicy,
    url_ttl: Duration,
}

impl MediaStore {
    pub fn new(blobs: Arc<dyn BlobStore>, policy: UploadPolicy, url_ttl: Duration) -> Self {
        Self { blobs, policy, url_ttl }
    }

    pub fn from_config(blobs: Arc<dyn BlobStore>, config: &StorageConfig) -> Self {
        Self::new(
            blobs,
            UploadPolicy::from_config(config),
            Duration::from_secs(config.presigned_url_ttl_seconds),
        )
    }

    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    pub fn blobs(&self) -> &Arc<dyn BlobStore> {
        &self.blobs
    }

    pub fn classify(&self, data: &[u8]) -> Result<Classification, ClassificationError> {
        self.policy.classify(data)
    }

    /// Write an upload to the blob store under a fresh key
    ///
    /// The size limit is enforced before anything is written.
    pub async fn store(
        &self,
        data: Bytes,
        classification: &Classification,
        owner_username: &str,
        original_filename: &str,
    ) -> Result<ObjectKey, StorageError> {
        self.policy.check_size(data.len() as u64)?;

        let extension = choose_extension(original_filename, classification.extension());
        let key = ObjectKey::generate(owner_username, classification.media_type, &extension);

        self.blobs.put(&key, data, classification.mime_type).await?;
        Ok(key)
    }

    pub async fn presigned_url(&self, key: &ObjectKey) -> Result<String, StorageError> {
        self.blobs.presigned_url(key, self.url_ttl).await
    }

    pub async fn delete(&self, key: &ObjectKey) -> Result<bool, StorageError> {
        self.blobs.delete(key).await
    }
}
