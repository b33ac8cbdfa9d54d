use crate::domain::entities::{Media, MediaId, ReviewDecision, User, UserId};
use crate::domain::value_objects::{ReviewStatus, UserRole};
use async_trait::async_trait;

/// Errors surfaced by any repository implementation
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// A uniqueness rule was violated; `field` names the colliding attribute
    #[error("{field} already registered")]
    Conflict { field: String },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database {
            message: err.to_string(),
        }
    }
}

/// Persistence for user accounts
///
/// Implementations must enforce email and username uniqueness atomically with
/// the write, reporting collisions as `RepositoryError::Conflict`.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: &User) -> Result<(), RepositoryError>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;

    /// All users, oldest account first
    async fn list(&self) -> Result<Vec<User>, RepositoryError>;

    /// Persist email, username and password hash; `false` if the user is gone
    async fn update(&self, user: &User) -> Result<bool, RepositoryError>;

    async fn update_role(
        &self,
        id: UserId,
        role: UserRole,
    ) -> Result<Option<User>, RepositoryError>;

    async fn delete(&self, id: UserId) -> Result<bool, RepositoryError>;

    async fn count(&self) -> Result<u64, RepositoryError>;

    async fn health_check(&self) -> Result<(), RepositoryError>;
}

/// Persistence for media submissions
#[async_trait]
pub trait MediaRepository: Send + Sync {
    async fn insert(&self, media: &Media) -> Result<(), RepositoryError>;

    async fn find_by_id(&self, id: MediaId) -> Result<Option<Media>, RepositoryError>;

    /// Lookup that only matches when `owner` owns the record
    async fn find_owned(&self, id: MediaId, owner: UserId)
        -> Result<Option<Media>, RepositoryError>;

    /// Newest upload first
    async fn find_by_owner(&self, owner: UserId) -> Result<Vec<Media>, RepositoryError>;

    /// Oldest upload first
    async fn find_by_status(&self, status: ReviewStatus) -> Result<Vec<Media>, RepositoryError>;

    /// Apply a review decision; `None` if the record does not exist
    async fn apply_review(
        &self,
        id: MediaId,
        decision: &ReviewDecision,
    ) -> Result<Option<Media>, RepositoryError>;

    async fn delete_owned(&self, id: MediaId, owner: UserId) -> Result<bool, RepositoryError>;

    /// Remove every record owned by `owner`, returning how many went away
    async fn delete_by_owner(&self, owner: UserId) -> Result<u64, RepositoryError>;

    async fn count(&self) -> Result<u64, RepositoryError>;

    async fn count_by_status(&self, status: ReviewStatus) -> Result<u64, RepositoryError>;
}
