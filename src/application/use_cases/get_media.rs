use std::sync::Arc;

use crate::{
    application::dto::MediaDto,
    domain::{
        entities::{MediaId, User},
        repositories::MediaRepository,
    },
    infrastructure::storage::MediaStore,
    presentation::middleware::error::AppError,
};

/// Use case for fetching one of the caller's submissions with a read URL
pub struct GetMediaUseCase<R>
where
    R: MediaRepository + ?Sized,
{
    repository: Arc<R>,
    store: Arc<MediaStore>,
}

impl<R> GetMediaUseCase<R>
where
    R: MediaRepository + ?Sized,
{
    pub fn new(repository: Arc<R>, store: Arc<MediaStore>) -> Self {
        Self { repository, store }
    }

    /// Media owned by someone else is reported exactly like missing media
    pub async fn execute(&self, owner: &User, media_id: MediaId) -> Result<MediaDto, AppError> {
        let media = self
            .repository
            .find_owned(media_id, owner.id)
            .await?
            .ok_or_else(|| AppError::not_found("Media"))?;

        let url = self.store.presigned_url(&media.storage_key).await?;

        Ok(MediaDto::from(&media).with_url(url))
    }
}
