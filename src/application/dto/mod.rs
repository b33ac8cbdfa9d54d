use crate::domain::{
    entities::{Media, MediaId, User, UserId},
    value_objects::{MediaType, ReviewStatus, UserRole},
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request DTO for creating an account
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterUserRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

/// Request DTO for a partial profile update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl UpdateUserRequest {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.username.is_none() && self.password.is_none()
    }
}

/// Form body of `POST /auth/token`
#[derive(Debug, Clone, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Response DTO for a successful login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub user_id: UserId,
    pub username: String,
    pub role: UserRole,
}

/// Public view of a user; never includes the password hash
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDto {
    pub id: UserId,
    pub email: String,
    pub username: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
            role: user.role,
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

/// Data Transfer Object for media information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaDto {
    pub id: MediaId,
    pub filename: String,
    pub file_type: MediaType,
    pub file_size: u64,
    pub mime_type: String,
    pub description: Option<String>,
    pub user_id: UserId,
    pub status: ReviewStatus,
    pub uploaded_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub reviewed_by: Option<UserId>,
    pub review_notes: Option<String>,
    /// Short-lived read URL, only present on single-item lookups
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl MediaDto {
    #[must_use]
    pub fn with_url(mut self, url: String) -> Self {
        self.url = Some(url);
        self
    }
}

impl From<&Media> for MediaDto {
    fn from(media: &Media) -> Self {
        Self {
            id: media.id,
            filename: media.filename.clone(),
            file_type: media.media_type,
            file_size: media.file_size,
            mime_type: media.mime_type.clone(),
            description: media.description.clone(),
            user_id: media.owner_id,
            status: media.status,
            uploaded_at: media.uploaded_at,
            reviewed_at: media.reviewed_at,
            reviewed_by: media.reviewed_by,
            review_notes: media.review_notes.clone(),
            url: None,
        }
    }
}

impl From<Media> for MediaDto {
    fn from(media: Media) -> Self {
        Self::from(&media)
    }
}

/// A file received from a multipart upload
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub filename: String,
    pub data: Bytes,
    pub description: Option<String>,
}

/// Request DTO for an admin review
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewMediaRequest {
    pub status: ReviewStatus,
    pub review_notes: Option<String>,
}

/// Query parameters for a role change
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRoleQuery {
    pub role: UserRole,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaStatsDto {
    pub pending: u64,
    pub approved: u64,
    pub rejected: u64,
}

/// Response DTO for `GET /admin/stats`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsDto {
    pub total_users: u64,
    pub total_media: u64,
    pub media_stats: MediaStatsDto,
}
