use std::sync::Arc;

use crate::{
    domain::{entities::Media, repositories::MediaRepository, value_objects::ReviewStatus},
    presentation::middleware::error::AppError,
};

/// Use case for the admin review queue, oldest submission first
pub struct ListPendingMediaUseCase<R>
where
    R: MediaRepository + ?Sized,
{
    repository: Arc<R>,
}

impl<R> ListPendingMediaUseCase<R>
where
    R: MediaRepository + ?Sized,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self) -> Result<Vec<Media>, AppError> {
        Ok(self.repository.find_by_status(ReviewStatus::Pending).await?)
    }
}
