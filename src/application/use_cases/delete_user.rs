use std::sync::Arc;

use crate::{
    domain::{
        entities::User,
        repositories::{MediaRepository, UserRepository},
    },
    infrastructure::storage::MediaStore,
    presentation::middleware::error::AppError,
};

/// Use case for a user deleting their own account
///
/// The user's blobs are removed best-effort, then their media records, then
/// the account itself.
pub struct DeleteUserUseCase<U, M>
where
    U: UserRepository + ?Sized,
    M: MediaRepository + ?Sized,
{
    users: Arc<U>,
    media: Arc<M>,
    store: Arc<MediaStore>,
}

impl<U, M> DeleteUserUseCase<U, M>
where
    U: UserRepository + ?Sized,
    M: MediaRepository + ?Sized,
{
    pub fn new(users: Arc<U>, media: Arc<M>, store: Arc<MediaStore>) -> Self {
        Self { users, media, store }
    }

    pub async fn execute(&self, user: &User) -> Result<(), AppError> {
        let owned = self.media.find_by_owner(user.id).await?;
        for item in &owned {
            if let Err(e) = self.store.delete(&item.storage_key).await {
                tracing::warn!(
                    media_id = %item.id,
                    error = %e,
                    "Failed to delete blob during account removal"
                );
            }
        }

        let removed = self.media.delete_by_owner(user.id).await?;

        if !self.users.delete(user.id).await? {
            return Err(AppError::not_found("User"));
        }

        tracing::info!(user_id = %user.id, media_removed = removed, "Deleted user account");
        Ok(())
    }
}
