use axum::{
    extract::{
        multipart::{Field, MultipartError},
        Multipart, Path, State,
    },
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use bytes::{Bytes, BytesMut};

use crate::{
    application::{
        dto::{MediaDto, UploadFile},
        use_cases::{DeleteMediaUseCase, GetMediaUseCase, ListMediaUseCase, UploadMediaUseCase},
    },
    domain::entities::MediaId,
    presentation::{
        middleware::{AppError, CurrentUser},
        AppState,
    },
};

const DEFAULT_FILENAME: &str = "upload";

/// `POST /api/media/upload`: multipart form with a `file` part and optional `description`
pub async fn upload_media(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    mut multipart: Multipart,
) -> Result<Json<MediaDto>, AppError> {
    let max_size = state.media_store.policy().max_file_size;
    let mut file: Option<(String, Bytes)> = None;
    let mut description = None;

    while let Some(field) =
        multipart.next_field().await.map_err(|err| body_error(err, max_size, 0))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file") => {
                let filename = field.file_name().unwrap_or(DEFAULT_FILENAME).to_string();
                let data = read_capped(field, max_size).await?;
                file = Some((filename, data));
            }
            Some("description") => {
                let text = field.text().await.map_err(|err| body_error(err, max_size, 0))?;
                if !text.trim().is_empty() {
                    description = Some(text);
                }
            }
            _ => {}
        }
    }

    let (filename, data) = file.ok_or_else(|| AppError::bad_request("Missing 'file' field"))?;

    let media = UploadMediaUseCase::new(state.media.clone(), state.media_store.clone())
        .execute(&user, UploadFile { filename, data, description })
        .await?;
    Ok(Json(media.into()))
}

/// Buffer a multipart field, giving up as soon as it grows past `max_size`
async fn read_capped(mut field: Field<'_>, max_size: u64) -> Result<Bytes, AppError> {
    let mut buffer = BytesMut::new();
    while let Some(chunk) =
        field.chunk().await.map_err(|err| body_error(err, max_size, buffer.len() as u64))?
    {
        buffer.extend_from_slice(&chunk);
        let size = buffer.len() as u64;
        if size > max_size {
            return Err(AppError::FileTooLarge { size, max_size });
        }
    }
    Ok(buffer.freeze())
}

/// A body that trips the request limit is an oversized upload, whatever part it was in
fn body_error(err: MultipartError, max_size: u64, received: u64) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::FileTooLarge { size: received.max(max_size.saturating_add(1)), max_size }
    } else {
        err.into()
    }
}

/// `GET /api/media/me`
pub async fn list_my_media(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<MediaDto>>, AppError> {
    let media = ListMediaUseCase::new(state.media.clone()).execute(&user).await?;
    Ok(Json(media.into_iter().map(MediaDto::from).collect()))
}

/// `GET /api/media/{id}`
pub async fn get_media(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    WithRejection(Path(id), _): WithRejection<Path<MediaId>, AppError>,
) -> Result<Json<MediaDto>, AppError> {
    let media = GetMediaUseCase::new(state.media.clone(), state.media_store.clone())
        .execute(&user, id)
        .await?;
    Ok(Json(media))
}

/// `DELETE /api/media/{id}`
pub async fn delete_media(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    WithRejection(Path(id), _): WithRejection<Path<MediaId>, AppError>,
) -> Result<StatusCode, AppError> {
    DeleteMediaUseCase::new(state.media.clone(), state.media_store.clone())
        .execute(&user, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
