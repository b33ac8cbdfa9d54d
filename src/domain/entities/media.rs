use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::UserId;
use crate::domain::value_objects::{MediaType, ObjectKey, ReviewStatus};

/// A submitted file and its moderation state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Media {
    pub id: MediaId,
    pub filename: String,
    pub media_type: MediaType,
    pub file_size: u64,
    pub mime_type: String,
    pub storage_key: ObjectKey,
    pub description: Option<String>,
    pub owner_id: UserId,
    pub status: ReviewStatus,
    pub uploaded_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub reviewed_by: Option<UserId>,
    pub review_notes: Option<String>,
}

/// Unique identifier for media submissions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaId(uuid::Uuid);

impl MediaId {
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    #[must_use]
    pub fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    #[must_use]
    pub fn as_uuid(&self) -> uuid::Uuid {
        self.0
    }
}

impl Default for MediaId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MediaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome of an admin review, applied to a `Media` as one unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewDecision {
    pub status: ReviewStatus,
    pub notes: Option<String>,
    pub reviewed_by: UserId,
    pub reviewed_at: DateTime<Utc>,
}

impl ReviewDecision {
    #[must_use]
    pub fn new(status: ReviewStatus, notes: Option<String>, reviewed_by: UserId) -> Self {
        Self {
            status,
            notes,
            reviewed_by,
            reviewed_at: Utc::now(),
        }
    }
}

impl Media {
    /// A freshly stored submission awaiting review
    #[must_use]
    pub fn new(
        filename: String,
        media_type: MediaType,
        file_size: u64,
        mime_type: String,
        storage_key: ObjectKey,
        description: Option<String>,
        owner_id: UserId,
    ) -> Self {
        Self {
            id: MediaId::new(),
            filename,
            media_type,
            file_size,
            mime_type,
            storage_key,
            description,
            owner_id,
            status: ReviewStatus::Pending,
            uploaded_at: Utc::now(),
            reviewed_at: None,
            reviewed_by: None,
            review_notes: None,
        }
    }

    #[must_use]
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id == user_id
    }

    /// Record a review decision; status, reviewer, time and notes change together
    pub fn apply_review(&mut self, decision: &ReviewDecision) {
        self.status = decision.status;
        self.reviewed_by = Some(decision.reviewed_by);
        self.reviewed_at = Some(decision.reviewed_at);
        self.review_notes.clone_from(&decision.notes);
    }
}
