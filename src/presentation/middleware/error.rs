use axum::{
    extract::{
        multipart::MultipartError,
        rejection::{FormRejection, JsonRejection, PathRejection, QueryRejection},
    },
    http::{header::WWW_AUTHENTICATE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{error, warn};
use uuid::Uuid;

use crate::domain::repositories::RepositoryError;
use crate::infrastructure::auth::{PasswordError, TokenError};
use crate::infrastructure::storage::{ClassificationError, PresignedUrlError, StorageError};

/// Application error types that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    #[error("Authorization failed: {message}")]
    Authorization { message: String },

    #[error("Validation failed: {errors:?}")]
    Validation { errors: HashMap<String, String> },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("{message}")]
    Conflict { message: String },

    #[error("Invalid request: {message}")]
    BadRequest { message: String },

    #[error("File size {size} bytes exceeds maximum allowed size of {max_size} bytes")]
    FileTooLarge { size: u64, max_size: u64 },

    #[error("Unsupported file type: {content_type}")]
    UnsupportedMediaType { content_type: String },

    #[error("Database error: {message}")]
    Database { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Internal server error: {message}")]
    Internal { message: String },
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Authentication { .. } => StatusCode::UNAUTHORIZED,
            AppError::Authorization { .. } => StatusCode::FORBIDDEN,
            AppError::Validation { .. }
            | AppError::BadRequest { .. }
            | AppError::Conflict { .. }
            | AppError::FileTooLarge { .. }
            | AppError::UnsupportedMediaType { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Database { .. } | AppError::Storage { .. } | AppError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the error type for logging
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::Authentication { .. } => "authentication",
            AppError::Authorization { .. } => "authorization",
            AppError::Validation { .. } => "validation",
            AppError::NotFound { .. } => "not_found",
            AppError::Conflict { .. } => "conflict",
            AppError::BadRequest { .. } => "bad_request",
            AppError::FileTooLarge { .. } => "file_too_large",
            AppError::UnsupportedMediaType { .. } => "unsupported_media_type",
            AppError::Database { .. } => "database",
            AppError::Storage { .. } => "storage",
            AppError::Internal { .. } => "internal",
        }
    }

    /// Check if this error should be logged as an error (vs warning)
    pub fn should_log_as_error(&self) -> bool {
        matches!(
            self,
            AppError::Database { .. } | AppError::Storage { .. } | AppError::Internal { .. }
        )
    }

    /// Create error response with proper structure
    pub fn to_error_response(&self, request_id: Option<&str>) -> ErrorResponse {
        ErrorResponse {
            error: ErrorDetail {
                id: Uuid::new_v4().to_string(),
                error_type: self.error_type().to_string(),
                message: self.to_string(),
                details: self.get_details(),
                request_id: request_id.map(String::from),
                timestamp: chrono::Utc::now().to_rfc3339(),
            },
        }
    }

    fn get_details(&self) -> Option<Value> {
        match self {
            AppError::Validation { errors } => Some(json!({ "validation_errors": errors })),
            AppError::NotFound { resource } => Some(json!({ "resource": resource })),
            AppError::UnsupportedMediaType { content_type } => {
                Some(json!({ "content_type": content_type }))
            }
            AppError::FileTooLarge { max_size, .. } => Some(json!({ "max_size": max_size })),
            _ => None,
        }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        AppError::NotFound { resource: resource.into() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::BadRequest { message: message.into() }
    }
}

/// Structured error response
#[derive(serde::Serialize, Debug)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(serde::Serialize, Debug)]
pub struct ErrorDetail {
    pub id: String,
    #[serde(rename = "type")]
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub timestamp: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_response = self.to_error_response(None);

        if self.should_log_as_error() {
            error!(
                error_type = self.error_type(),
                error_id = error_response.error.id,
                "Application error: {}",
                self
            );
        } else {
            warn!(
                error_type = self.error_type(),
                error_id = error_response.error.id,
                "Application warning: {}",
                self
            );
        }

        let mut response = (status, Json(error_response)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Conflict { .. } => AppError::Conflict { message: err.to_string() },
            RepositoryError::Database { message } => AppError::Database { message },
        }
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::TooLarge { size, max_size } => AppError::FileTooLarge { size, max_size },
            StorageError::NotFound { key } => AppError::NotFound { resource: key },
            StorageError::Io { .. } | StorageError::Backend { .. } => {
                AppError::Storage { message: err.to_string() }
            }
        }
    }
}

impl From<ClassificationError> for AppError {
    fn from(err: ClassificationError) -> Self {
        match err {
            ClassificationError::UnsupportedType { mime_type } => {
                AppError::UnsupportedMediaType { content_type: mime_type }
            }
        }
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => {
                AppError::Authentication { message: "Token has expired".to_string() }
            }
            TokenError::Invalid => {
                AppError::Authentication { message: "Could not validate credentials".to_string() }
            }
            TokenError::UnsupportedAlgorithm(_) | TokenError::EncodingError(_) => {
                AppError::Internal { message: err.to_string() }
            }
        }
    }
}

impl From<PasswordError> for AppError {
    fn from(err: PasswordError) -> Self {
        AppError::Internal { message: err.to_string() }
    }
}

impl From<PresignedUrlError> for AppError {
    fn from(err: PresignedUrlError) -> Self {
        match err {
            PresignedUrlError::Expired { .. }
            | PresignedUrlError::InvalidSignature
            | PresignedUrlError::InvalidExpiration => {
                AppError::Authentication { message: err.to_string() }
            }
            PresignedUrlError::SigningError => AppError::Internal { message: err.to_string() },
        }
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::BadRequest { message: err.body_text() }
    }
}

// Extractor rejections, so malformed input gets the same error body as everything else

impl From<JsonRejection> for AppError {
    fn from(err: JsonRejection) -> Self {
        AppError::BadRequest { message: err.body_text() }
    }
}

impl From<FormRejection> for AppError {
    fn from(err: FormRejection) -> Self {
        AppError::BadRequest { message: err.body_text() }
    }
}

impl From<QueryRejection> for AppError {
    fn from(err: QueryRejection) -> Self {
        AppError::BadRequest { message: err.body_text() }
    }
}

impl From<PathRejection> for AppError {
    fn from(err: PathRejection) -> Self {
        AppError::BadRequest { message: err.body_text() }
    }
}
