use crate::domain::value_objects::{extension_for_mime, MediaType};
use crate::infrastructure::config::StorageConfig;

/// How many leading bytes of an upload are inspected for classification
pub const CLASSIFICATION_SAMPLE_SIZE: usize = 2048;

pub const OCTET_STREAM: &str = "application/octet-stream";

/// Detect MIME type from the leading bytes of a file
///
/// Only the content is consulted; filenames and client-declared types are
/// never trusted.
pub fn detect_content_type(data: &[u8]) -> &'static str {
    let sample = &data[..data.len().min(CLASSIFICATION_SAMPLE_SIZE)];

    match sample {
        [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
        [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, ..] => "image/png",
        [b'G', b'I', b'F', b'8', b'7' | b'9', b'a', ..] => "image/gif",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "image/webp",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'A', b'V', b'E', ..] => "audio/wav",
        [b'O', b'g', b'g', b'S', ..] => "audio/ogg",
        [b'f', b'L', b'a', b'C', ..] => "audio/flac",
        [b'I', b'D', b'3', ..] => "audio/mpeg",
        [0xFF, second, ..] if is_mpeg_frame_sync(*second) => "audio/mpeg",
        [b'%', b'P', b'D', b'F', ..] => "application/pdf",
        [b'P', b'K', 0x03, 0x04, ..] => "application/zip",
        [_, _, _, _, b'f', b't', b'y', b'p', ..] => "video/mp4",
        _ => OCTET_STREAM,
    }
}

/// MPEG audio frame header: 11 sync bits set and a valid layer
fn is_mpeg_frame_sync(second: u8) -> bool {
    second & 0xE0 == 0xE0 && (second >> 1) & 0x03 != 0
}

/// Result of classifying an upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub media_type: MediaType,
    pub mime_type: &'static str,
}

impl Classification {
    /// Canonical extension for the detected type
    pub fn extension(&self) -> &'static str {
        extension_for_mime(self.mime_type).unwrap_or("bin")
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClassificationError {
    #[error("Unsupported file type: {mime_type}")]
    UnsupportedType { mime_type: String },
}

/// Which detected types are accepted, and how big an upload may be
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    pub max_file_size: u64,
    pub allowed_image_types: Vec<String>,
    pub allowed_audio_types: Vec<String>,
}

impl UploadPolicy {
    pub fn from_config(config: &StorageConfig) -> Self {
        Self {
            max_file_size: config.max_file_size,
            allowed_image_types: config.allowed_image_types.clone(),
            allowed_audio_types: config.allowed_audio_types.clone(),
        }
    }

    /// Classify the upload by content against the allow-lists
    pub fn classify(&self, data: &[u8]) -> Result<Classification, ClassificationError> {
        let mime_type = detect_content_type(data);

        let media_type = if self.allowed_image_types.iter().any(|t| t == mime_type) {
            MediaType::Image
        } else if self.allowed_audio_types.iter().any(|t| t == mime_type) {
            MediaType::Audio
        } else {
            return Err(ClassificationError::UnsupportedType { mime_type: mime_type.to_string() });
        };

        Ok(Classification { media_type, mime_type })
    }

    /// Validate file size limits
    pub fn check_size(&self, size: u64) -> Result<(), super::StorageError> {
        if size > self.max_file_size {
            return Err(super::StorageError::TooLarge { size, max_size: self.max_file_size });
        }
        Ok(())
    }
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_file_size: 10 * 1024 * 1024,
            allowed_image_types: vec![
                "image/jpeg".to_string(),
                "image/png".to_string(),
                "image/gif".to_string(),
            ],
            allowed_audio_types: vec![
                "audio/mpeg".to_string(),
                "audio/wav".to_string(),
                "audio/ogg".to_string(),
            ],
        }
    }
}
