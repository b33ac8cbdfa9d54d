use serde::{Deserialize, Serialize};
use std::fmt;

use super::MediaType;

/// Location of a stored blob, `users/{username}/{media_type}/{uuid}.{ext}`
///
/// Keys are always relative, `/`-separated and free of `.`/`..` segments so
/// they can be used verbatim as S3 object names or filesystem paths below a
/// storage root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectKey(String);

impl ObjectKey {
    /// Build a fresh, unique key for an upload owned by `username`
    #[must_use]
    pub fn generate(username: &str, media_type: MediaType, extension: &str) -> Self {
        Self(format!(
            "users/{username}/{media_type}/{}.{extension}",
            uuid::Uuid::new_v4()
        ))
    }

    /// Accept a key coming from outside (URL path, database row)
    pub fn parse(raw: &str) -> Result<Self, String> {
        if raw.is_empty() || raw.starts_with('/') || raw.contains('\\') {
            return Err(format!("Invalid object key: {raw}"));
        }
        if raw
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..")
        {
            return Err(format!("Invalid object key: {raw}"));
        }
        Ok(Self(raw.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pick the extension for a stored file
///
/// The original filename's extension wins when it is short and alphanumeric;
/// otherwise the detected type's canonical extension is used.
#[must_use]
pub fn choose_extension(original_filename: &str, fallback: &str) -> String {
    original_filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .filter(|ext| {
            !ext.is_empty() && ext.len() <= 10 && ext.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .unwrap_or_else(|| fallback.to_string())
}
