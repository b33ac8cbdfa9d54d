use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::time::Duration;

use crate::domain::value_objects::ObjectKey;

type HmacSha256 = Hmac<Sha256>;

/// Signs and verifies download URLs served by the `/files` endpoint
#[derive(Clone)]
pub struct PresignedUrlService {
    secret_key: String,
    base_url: String,
}

impl PresignedUrlService {
    pub fn new(secret_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Build a download URL for `key` that stops working after `ttl`
    pub fn download_url(
        &self,
        key: &ObjectKey,
        ttl: Duration,
    ) -> Result<String, PresignedUrlError> {
        let expires_at = Utc::now()
            + chrono::Duration::from_std(ttl).map_err(|_| PresignedUrlError::InvalidExpiration)?;
        let expires = expires_at.timestamp();
        let signature = self.sign_payload(&Self::create_signature_payload(key, expires))?;

        let path = key.as_str().split('/').map(urlencoding::encode).collect::<Vec<_>>().join("/");

        Ok(format!("{}/files/{path}?expires={expires}&signature={signature}", self.base_url))
    }

    /// Check the signature and expiry presented with a download request
    pub fn verify(
        &self,
        key: &ObjectKey,
        expires_timestamp: i64,
        signature: &str,
    ) -> Result<(), PresignedUrlError> {
        let expires_at = DateTime::from_timestamp(expires_timestamp, 0)
            .ok_or(PresignedUrlError::InvalidExpiration)?;

        let provided = hex::decode(signature).map_err(|_| PresignedUrlError::InvalidSignature)?;
        let mut mac = self.mac()?;
        mac.update(Self::create_signature_payload(key, expires_timestamp).as_bytes());
        mac.verify_slice(&provided).map_err(|_| PresignedUrlError::InvalidSignature)?;

        if Utc::now() > expires_at {
            return Err(PresignedUrlError::Expired { expired_at: expires_at });
        }

        Ok(())
    }

    /// Create the payload to be signed
    fn create_signature_payload(key: &ObjectKey, expires: i64) -> String {
        format!("GET|{}|{expires}", key.as_str())
    }

    fn mac(&self) -> Result<HmacSha256, PresignedUrlError> {
        HmacSha256::new_from_slice(self.secret_key.as_bytes())
            .map_err(|_| PresignedUrlError::SigningError)
    }

    /// Generate HMAC signature for the payload
    fn sign_payload(&self, payload: &str) -> Result<String, PresignedUrlError> {
        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

/// Errors that can occur during presigned URL operations
#[derive(Debug, thiserror::Error)]
pub enum PresignedUrlError {
    #[error("Download URL has expired at {expired_at}")]
    Expired { expired_at: DateTime<Utc> },

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Invalid expiration time")]
    InvalidExpiration,

    #[error("Failed to sign payload")]
    SigningError,
}
