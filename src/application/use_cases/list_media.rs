use std::sync::Arc;

use crate::{
    domain::{
        entities::{Media, User},
        repositories::MediaRepository,
    },
    presentation::middleware::error::AppError,
};

/// Use case for listing the caller's own submissions, newest first
pub struct ListMediaUseCase<R>
where
    R: MediaRepository + ?Sized,
{
    repository: Arc<R>,
}

impl<R> ListMediaUseCase<R>
where
    R: MediaRepository + ?Sized,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, owner: &User) -> Result<Vec<Media>, AppError> {
        Ok(self.repository.find_by_owner(owner.id).await?)
    }
}
