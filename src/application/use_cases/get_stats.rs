use std::sync::Arc;

use crate::{
    application::dto::{MediaStatsDto, StatsDto},
    domain::{
        repositories::{MediaRepository, UserRepository},
        value_objects::ReviewStatus,
    },
    presentation::middleware::error::AppError,
};

/// Use case for the admin dashboard counters
pub struct GetStatsUseCase<U, M>
where
    U: UserRepository + ?Sized,
    M: MediaRepository + ?Sized,
{
    users: Arc<U>,
    media: Arc<M>,
}

impl<U, M> GetStatsUseCase<U, M>
where
    U: UserRepository + ?Sized,
    M: MediaRepository + ?Sized,
{
    pub fn new(users: Arc<U>, media: Arc<M>) -> Self {
        Self { users, media }
    }

    /// Independent counts; they are not read from a single snapshot
    pub async fn execute(&self) -> Result<StatsDto, AppError> {
        let (total_users, total_media, pending, approved, rejected) = tokio::try_join!(
            self.users.count(),
            self.media.count(),
            self.media.count_by_status(ReviewStatus::Pending),
            self.media.count_by_status(ReviewStatus::Approved),
            self.media.count_by_status(ReviewStatus::Rejected),
        )?;

        Ok(StatsDto {
            total_users,
            total_media,
            media_stats: MediaStatsDto { pending, approved, rejected },
        })
    }
}
