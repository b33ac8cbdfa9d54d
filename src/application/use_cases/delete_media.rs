use std::sync::Arc;

use crate::{
    domain::{
        entities::{MediaId, User},
        repositories::MediaRepository,
    },
    infrastructure::storage::MediaStore,
    presentation::middleware::error::AppError,
};

/// Use case for removing one of the caller's submissions
pub struct DeleteMediaUseCase<R>
where
    R: MediaRepository + ?Sized,
{
    repository: Arc<R>,
    store: Arc<MediaStore>,
}

impl<R> DeleteMediaUseCase<R>
where
    R: MediaRepository + ?Sized,
{
    pub fn new(repository: Arc<R>, store: Arc<MediaStore>) -> Self {
        Self { repository, store }
    }

    /// The blob goes first; if that fails the record stays so the delete can be retried
    pub async fn execute(&self, owner: &User, media_id: MediaId) -> Result<(), AppError> {
        let media = self
            .repository
            .find_owned(media_id, owner.id)
            .await?
            .ok_or_else(|| AppError::not_found("Media"))?;

        if !self.store.delete(&media.storage_key).await? {
            tracing::warn!(
                media_id = %media.id,
                key = %media.storage_key,
                "Blob was already missing"
            );
        }

        if !self.repository.delete_owned(media.id, owner.id).await? {
            return Err(AppError::not_found("Media"));
        }

        tracing::info!(media_id = %media.id, user_id = %owner.id, "Deleted media");
        Ok(())
    }
}
