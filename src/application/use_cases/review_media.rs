use std::sync::Arc;

use crate::{
    application::dto::ReviewMediaRequest,
    domain::{
        entities::{Media, MediaId, ReviewDecision, User},
        repositories::MediaRepository,
    },
    presentation::middleware::error::AppError,
};

/// Use case for an admin approving or rejecting a submission
pub struct ReviewMediaUseCase<R>
where
    R: MediaRepository + ?Sized,
{
    repository: Arc<R>,
}

impl<R> ReviewMediaUseCase<R>
where
    R: MediaRepository + ?Sized,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Already-reviewed media may be reviewed again; the latest decision wins
    pub async fn execute(
        &self,
        admin: &User,
        media_id: MediaId,
        request: ReviewMediaRequest,
    ) -> Result<Media, AppError> {
        if !request.status.is_terminal() {
            return Err(AppError::bad_request("Review status must be 'approved' or 'rejected'"));
        }

        let decision = ReviewDecision::new(request.status, request.review_notes, admin.id);
        let media = self
            .repository
            .apply_review(media_id, &decision)
            .await?
            .ok_or_else(|| AppError::not_found("Media"))?;

        tracing::info!(
            media_id = %media.id,
            admin_id = %admin.id,
            status = %media.status,
            "Reviewed media"
        );
        Ok(media)
    }
}
