use std::sync::Arc;

use crate::{
    application::dto::UploadFile,
    domain::{
        entities::{Media, User},
        repositories::MediaRepository,
    },
    infrastructure::storage::MediaStore,
    presentation::middleware::error::AppError,
};

/// Use case for submitting a file for moderation
pub struct UploadMediaUseCase<R>
where
    R: MediaRepository + ?Sized,
{
    repository: Arc<R>,
    store: Arc<MediaStore>,
}

impl<R> UploadMediaUseCase<R>
where
    R: MediaRepository + ?Sized,
{
    pub fn new(repository: Arc<R>, store: Arc<MediaStore>) -> Self {
        Self { repository, store }
    }

    /// Classify by content, store the blob, then record a pending submission
    ///
    /// No record exists unless the blob was written; if the record cannot be
    /// saved the blob is removed again.
    pub async fn execute(&self, owner: &User, file: UploadFile) -> Result<Media, AppError> {
        tracing::info!(user_id = %owner.id, filename = %file.filename, "Starting media upload");

        let classification = self.store.classify(&file.data)?;
        let file_size = file.data.len() as u64;

        let storage_key = self
            .store
            .store(file.data, &classification, &owner.username, &file.filename)
            .await?;

        let media = Media::new(
            file.filename,
            classification.media_type,
            file_size,
            classification.mime_type.to_string(),
            storage_key,
            file.description,
            owner.id,
        );

        if let Err(e) = self.repository.insert(&media).await {
            tracing::warn!(
                key = %media.storage_key,
                error = %e,
                "Failed to save media record, removing blob"
            );
            if let Err(cleanup) = self.store.delete(&media.storage_key).await {
                tracing::error!(
                    key = %media.storage_key,
                    error = %cleanup,
                    "Failed to remove orphaned blob"
                );
            }
            return Err(e.into());
        }

        tracing::info!(
            media_id = %media.id,
            media_type = %media.media_type,
            file_size = media.file_size,
            "Media upload completed"
        );
        Ok(media)
    }
}
