use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::entities::{Media, MediaId, ReviewDecision, User, UserId};
use crate::domain::repositories::{MediaRepository, RepositoryError, UserRepository};
use crate::domain::value_objects::{ReviewStatus, UserRole};

/// In-memory user store for local development and tests
///
/// Uniqueness checks and the write happen under one lock, so concurrent
/// registrations of the same username cannot both succeed.
#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<Mutex<HashMap<UserId, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn find_collision(users: &HashMap<UserId, User>, candidate: &User) -> Option<RepositoryError> {
    let others = users.values().filter(|u| u.id != candidate.id);
    for other in others {
        if other.username == candidate.username {
            return Some(RepositoryError::Conflict { field: "Username".to_string() });
        }
        if other.email == candidate.email {
            return Some(RepositoryError::Conflict { field: "Email".to_string() });
        }
    }
    None
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<(), RepositoryError> {
        let mut users = self.users.lock().await;
        if let Some(conflict) = find_collision(&users, user) {
            return Err(conflict);
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.users.lock().await.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self.users.lock().await.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self.users.lock().await.values().find(|u| u.email == email).cloned())
    }

    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let mut users: Vec<User> = self.users.lock().await.values().cloned().collect();
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }

    async fn update(&self, user: &User) -> Result<bool, RepositoryError> {
        let mut users = self.users.lock().await;
        if let Some(conflict) = find_collision(&users, user) {
            return Err(conflict);
        }
        match users.get_mut(&user.id) {
            Some(existing) => {
                existing.email.clone_from(&user.email);
                existing.username.clone_from(&user.username);
                existing.password_hash.clone_from(&user.password_hash);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn update_role(
        &self,
        id: UserId,
        role: UserRole,
    ) -> Result<Option<User>, RepositoryError> {
        let mut users = self.users.lock().await;
        Ok(users.get_mut(&id).map(|user| {
            user.role = role;
            user.clone()
        }))
    }

    async fn delete(&self, id: UserId) -> Result<bool, RepositoryError> {
        Ok(self.users.lock().await.remove(&id).is_some())
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        Ok(self.users.lock().await.len() as u64)
    }

    async fn health_check(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

/// In-memory media store for local development and tests
#[derive(Clone, Default)]
pub struct InMemoryMediaRepository {
    media: Arc<Mutex<HashMap<MediaId, Media>>>,
}

impl InMemoryMediaRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MediaRepository for InMemoryMediaRepository {
    async fn insert(&self, media: &Media) -> Result<(), RepositoryError> {
        let mut stored = self.media.lock().await;
        if stored.contains_key(&media.id) {
            return Err(RepositoryError::Conflict { field: "Media id".to_string() });
        }
        stored.insert(media.id, media.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: MediaId) -> Result<Option<Media>, RepositoryError> {
        Ok(self.media.lock().await.get(&id).cloned())
    }

    async fn find_owned(
        &self,
        id: MediaId,
        owner: UserId,
    ) -> Result<Option<Media>, RepositoryError> {
        Ok(self.media.lock().await.get(&id).filter(|m| m.is_owned_by(owner)).cloned())
    }

    async fn find_by_owner(&self, owner: UserId) -> Result<Vec<Media>, RepositoryError> {
        let mut owned: Vec<Media> =
            self.media.lock().await.values().filter(|m| m.is_owned_by(owner)).cloned().collect();
        owned.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        Ok(owned)
    }

    async fn find_by_status(&self, status: ReviewStatus) -> Result<Vec<Media>, RepositoryError> {
        let mut matching: Vec<Media> =
            self.media.lock().await.values().filter(|m| m.status == status).cloned().collect();
        matching.sort_by_key(|m| m.uploaded_at);
        Ok(matching)
    }

    async fn apply_review(
        &self,
        id: MediaId,
        decision: &ReviewDecision,
    ) -> Result<Option<Media>, RepositoryError> {
        let mut stored = self.media.lock().await;
        Ok(stored.get_mut(&id).map(|media| {
            media.apply_review(decision);
            media.clone()
        }))
    }

    async fn delete_owned(&self, id: MediaId, owner: UserId) -> Result<bool, RepositoryError> {
        let mut stored = self.media.lock().await;
        if stored.get(&id).is_some_and(|m| m.is_owned_by(owner)) {
            stored.remove(&id);
            return Ok(true);
        }
        Ok(false)
    }

    async fn delete_by_owner(&self, owner: UserId) -> Result<u64, RepositoryError> {
        let mut stored = self.media.lock().await;
        let before = stored.len();
        stored.retain(|_, m| !m.is_owned_by(owner));
        Ok((before - stored.len()) as u64)
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        Ok(self.media.lock().await.len() as u64)
    }

    async fn count_by_status(&self, status: ReviewStatus) -> Result<u64, RepositoryError> {
        Ok(self.media.lock().await.values().filter(|m| m.status == status).count() as u64)
    }
}
