use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;

use crate::{
    domain::value_objects::ObjectKey,
    infrastructure::storage::detect_content_type,
    presentation::{middleware::AppError, AppState},
};

#[derive(Debug, Deserialize)]
pub struct SignedUrlQuery {
    pub expires: i64,
    pub signature: String,
}

/// `GET /files/{*key}`: serve a blob through a signed, expiring URL
///
/// Answers 404 unless blobs live on the local filesystem; S3 URLs point at the bucket.
pub async fn download_file(
    State(state): State<AppState>,
    Path(key): Path<String>,
    WithRejection(Query(query), _): WithRejection<Query<SignedUrlQuery>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    let signer = state.url_signer.as_ref().ok_or_else(|| AppError::not_found("File"))?;
    let key = ObjectKey::parse(&key).map_err(|_| AppError::not_found("File"))?;

    signer.verify(&key, query.expires, &query.signature)?;

    let data = state.media_store.blobs().get(&key).await?;
    let content_type = detect_content_type(&data);

    Ok(([(header::CONTENT_TYPE, content_type)], data))
}
