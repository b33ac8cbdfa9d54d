use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::{BlobStore, PresignedUrlService, StorageError};
use crate::domain::value_objects::ObjectKey;

/// Blob store keeping objects as files below a base directory
///
/// Read URLs point at the service's own `/files` endpoint and are signed
/// with the configured `PresignedUrlService`.
#[derive(Clone)]
pub struct FilesystemBlobStore {
    base_path: PathBuf,
    signer: PresignedUrlService,
}

impl FilesystemBlobStore {
    pub fn new(base_path: impl Into<PathBuf>, signer: PresignedUrlService) -> Self {
        Self { base_path: base_path.into(), signer }
    }

    fn full_path(&self, key: &ObjectKey) -> PathBuf {
        self.base_path.join(key.as_str())
    }

    /// Clean up empty directories (best effort, ignore errors)
    async fn cleanup_empty_directories(&self, mut dir_path: &Path) {
        while dir_path != self.base_path && dir_path.starts_with(&self.base_path) {
            let Ok(mut entries) = fs::read_dir(dir_path).await else {
                break;
            };
            if entries.next_entry().await.unwrap_or(None).is_some() {
                break;
            }
            if fs::remove_dir(dir_path).await.is_err() {
                break;
            }

            tracing::debug!("Cleaned up empty directory: {}", dir_path.display());

            match dir_path.parent() {
                Some(parent) => dir_path = parent,
                None => break,
            }
        }
    }
}

/// Create `path` and its missing parent directories
///
/// A concurrent delete may prune the freshly created directories before the
/// file lands in them, so creation is retried once after recreating them.
async fn create_with_parents(path: &Path) -> std::io::Result<fs::File> {
    let Some(parent) = path.parent() else {
        return fs::File::create(path).await;
    };
    fs::create_dir_all(parent).await?;
    match fs::File::create(path).await {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            fs::create_dir_all(parent).await?;
            fs::File::create(path).await
        }
        result => result,
    }
}

#[async_trait]
impl BlobStore for FilesystemBlobStore {
    async fn put(
        &self,
        key: &ObjectKey,
        data: Bytes,
        _content_type: &str,
    ) -> Result<(), StorageError> {
        let file_path = self.full_path(key);

        // Write to a temporary file first, then rename into place
        let temp_path = file_path.with_extension("tmp");
        {
            let mut file = create_with_parents(&temp_path).await?;
            file.write_all(&data).await?;
            file.flush().await?;
        }
        if let Err(e) = fs::rename(&temp_path, &file_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        tracing::debug!("Stored object at path: {}", file_path.display());
        Ok(())
    }

    async fn get(&self, key: &ObjectKey) -> Result<Bytes, StorageError> {
        match fs::read(self.full_path(key)).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound { key: key.to_string() })
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, key: &ObjectKey) -> Result<bool, StorageError> {
        let file_path = self.full_path(key);

        match fs::remove_file(&file_path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e.into()),
        }

        if let Some(parent) = file_path.parent() {
            self.cleanup_empty_directories(parent).await;
        }

        tracing::debug!("Deleted object at path: {}", file_path.display());
        Ok(true)
    }

    async fn presigned_url(&self, key: &ObjectKey, ttl: Duration) -> Result<String, StorageError> {
        self.signer
            .download_url(key, ttl)
            .map_err(|e| StorageError::Backend { message: e.to_string() })
    }

    async fn health_check(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.base_path).await?;
        Ok(())
    }
}
