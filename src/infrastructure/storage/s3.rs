use async_trait::async_trait;
use bytes::Bytes;
use s3::creds::Credentials;
use s3::{Bucket, Region};
use std::time::Duration;

use super::{BlobStore, StorageError};
use crate::domain::value_objects::ObjectKey;
use crate::infrastructure::config::StorageConfig;

/// Blob store backed by an S3-compatible bucket
pub struct S3BlobStore {
    bucket: Box<Bucket>,
}

fn backend_error(err: impl std::fmt::Display) -> StorageError {
    StorageError::Backend { message: err.to_string() }
}

fn non_empty(value: &str) -> Option<&str> {
    (!value.is_empty()).then_some(value)
}

impl S3BlobStore {
    /// Connect to the configured bucket
    ///
    /// With a custom `endpoint` (MinIO, localstack) path-style addressing is
    /// used. Empty credentials fall back to the environment/instance profile.
    pub fn from_config(config: &StorageConfig) -> Result<Self, StorageError> {
        let region = match &config.endpoint {
            Some(endpoint) => {
                Region::Custom { region: config.region.clone(), endpoint: endpoint.clone() }
            }
            None => config.region.parse::<Region>().map_err(backend_error)?,
        };

        let credentials = Credentials::new(
            non_empty(&config.access_key_id),
            non_empty(&config.secret_access_key),
            None,
            None,
            None,
        )
        .map_err(backend_error)?;

        let bucket = Bucket::new(&config.bucket, region, credentials).map_err(backend_error)?;
        let bucket = if config.endpoint.is_some() { bucket.with_path_style() } else { bucket };

        Ok(Self { bucket })
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn put(
        &self,
        key: &ObjectKey,
        data: Bytes,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let response = self
            .bucket
            .put_object_with_content_type(key.as_str(), &data, content_type)
            .await
            .map_err(backend_error)?;

        match response.status_code() {
            200..=299 => {
                tracing::debug!(key = %key, "Stored object in bucket");
                Ok(())
            }
            status => Err(StorageError::Backend {
                message: format!("PUT {key} returned status {status}"),
            }),
        }
    }

    async fn get(&self, key: &ObjectKey) -> Result<Bytes, StorageError> {
        let response = self.bucket.get_object(key.as_str()).await.map_err(backend_error)?;

        match response.status_code() {
            200..=299 => Ok(response.bytes().clone()),
            404 => Err(StorageError::NotFound { key: key.to_string() }),
            status => Err(StorageError::Backend {
                message: format!("GET {key} returned status {status}"),
            }),
        }
    }

    async fn delete(&self, key: &ObjectKey) -> Result<bool, StorageError> {
        let response = self.bucket.delete_object(key.as_str()).await.map_err(backend_error)?;

        match response.status_code() {
            200..=299 => Ok(true),
            404 => Ok(false),
            status => Err(StorageError::Backend {
                message: format!("DELETE {key} returned status {status}"),
            }),
        }
    }

    async fn presigned_url(&self, key: &ObjectKey, ttl: Duration) -> Result<String, StorageError> {
        let expiry_secs = u32::try_from(ttl.as_secs()).map_err(backend_error)?;
        self.bucket.presign_get(key.as_str(), expiry_secs, None).await.map_err(backend_error)
    }

    /// List at most one key, which needs the bucket to exist and the credentials to work
    async fn health_check(&self) -> Result<(), StorageError> {
        let (_, status) = self
            .bucket
            .list_page(String::new(), None, None, None, Some(1))
            .await
            .map_err(backend_error)?;

        match status {
            200..=299 => Ok(()),
            status => Err(StorageError::Backend {
                message: format!("Listing bucket {} returned status {status}", self.bucket.name()),
            }),
        }
    }
}
