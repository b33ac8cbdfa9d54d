use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use super::{map_write_error, parse_column};
use crate::domain::entities::{Media, MediaId, ReviewDecision, UserId};
use crate::domain::repositories::{MediaRepository, RepositoryError};
use crate::domain::value_objects::{MediaType, ObjectKey, ReviewStatus};

const MEDIA_COLUMNS: &str = "id, filename, file_type, file_size, mime_type, storage_key, \
     description, user_id, status, uploaded_at, reviewed_at, reviewed_by, review_notes";

/// `PostgreSQL` implementation of `MediaRepository`
#[derive(Clone)]
pub struct PostgreSqlMediaRepository {
    pool: PgPool,
}

impl PostgreSqlMediaRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MediaRepository for PostgreSqlMediaRepository {
    async fn insert(&self, media: &Media) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO media
            (id, filename, file_type, file_size, mime_type, storage_key, description,
             user_id, status, uploaded_at, reviewed_at, reviewed_by, review_notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ",
        )
        .bind(media.id.as_uuid())
        .bind(&media.filename)
        .bind(media.media_type.as_str())
        .bind(media.file_size as i64)
        .bind(&media.mime_type)
        .bind(media.storage_key.as_str())
        .bind(&media.description)
        .bind(media.owner_id.as_uuid())
        .bind(media.status.as_str())
        .bind(media.uploaded_at)
        .bind(media.reviewed_at)
        .bind(media.reviewed_by.map(|id| id.as_uuid()))
        .bind(&media.review_notes)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(())
    }

    async fn find_by_id(&self, id: MediaId) -> Result<Option<Media>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {MEDIA_COLUMNS} FROM media WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(map_row_to_media).transpose()
    }

    async fn find_owned(
        &self,
        id: MediaId,
        owner: UserId,
    ) -> Result<Option<Media>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {MEDIA_COLUMNS} FROM media WHERE id = $1 AND user_id = $2"
        ))
        .bind(id.as_uuid())
        .bind(owner.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_media).transpose()
    }

    async fn find_by_owner(&self, owner: UserId) -> Result<Vec<Media>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {MEDIA_COLUMNS} FROM media WHERE user_id = $1 ORDER BY uploaded_at DESC"
        ))
        .bind(owner.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_media).collect()
    }

    async fn find_by_status(&self, status: ReviewStatus) -> Result<Vec<Media>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {MEDIA_COLUMNS} FROM media WHERE status = $1 ORDER BY uploaded_at ASC"
        ))
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_media).collect()
    }

    async fn apply_review(
        &self,
        id: MediaId,
        decision: &ReviewDecision,
    ) -> Result<Option<Media>, RepositoryError> {
        let row = sqlx::query(&format!(
            r"
            UPDATE media
            SET status = $2, reviewed_at = $3, reviewed_by = $4, review_notes = $5
            WHERE id = $1
            RETURNING {MEDIA_COLUMNS}
            "
        ))
        .bind(id.as_uuid())
        .bind(decision.status.as_str())
        .bind(decision.reviewed_at)
        .bind(decision.reviewed_by.as_uuid())
        .bind(&decision.notes)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_media).transpose()
    }

    async fn delete_owned(&self, id: MediaId, owner: UserId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM media WHERE id = $1 AND user_id = $2")
            .bind(id.as_uuid())
            .bind(owner.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_owner(&self, owner: UserId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM media WHERE user_id = $1")
            .bind(owner.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        let count: i64 = sqlx::query("SELECT COUNT(*) AS count FROM media")
            .fetch_one(&self.pool)
            .await?
            .try_get("count")?;

        Ok(count as u64)
    }

    async fn count_by_status(&self, status: ReviewStatus) -> Result<u64, RepositoryError> {
        let count: i64 = sqlx::query("SELECT COUNT(*) AS count FROM media WHERE status = $1")
            .bind(status.as_str())
            .fetch_one(&self.pool)
            .await?
            .try_get("count")?;

        Ok(count as u64)
    }
}

fn map_row_to_media(row: &PgRow) -> Result<Media, RepositoryError> {
    let file_type: String = row.try_get("file_type")?;
    let status: String = row.try_get("status")?;
    let storage_key: String = row.try_get("storage_key")?;
    let file_size: i64 = row.try_get("file_size")?;
    let reviewed_by: Option<uuid::Uuid> = row.try_get("reviewed_by")?;

    Ok(Media {
        id: MediaId::from_uuid(row.try_get("id")?),
        filename: row.try_get("filename")?,
        media_type: parse_column::<MediaType>(&file_type, "file_type")?,
        file_size: file_size as u64,
        mime_type: row.try_get("mime_type")?,
        storage_key: ObjectKey::parse(&storage_key)
            .map_err(|message| RepositoryError::Database { message })?,
        description: row.try_get("description")?,
        owner_id: UserId::from_uuid(row.try_get("user_id")?),
        status: parse_column::<ReviewStatus>(&status, "status")?,
        uploaded_at: row.try_get("uploaded_at")?,
        reviewed_at: row.try_get("reviewed_at")?,
        reviewed_by: reviewed_by.map(UserId::from_uuid),
        review_notes: row.try_get("review_notes")?,
    })
}
