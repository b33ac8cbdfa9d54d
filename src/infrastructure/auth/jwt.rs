use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, error};

use crate::domain::entities::UserId;
use crate::infrastructure::config::AuthConfig;

/// Access token claims; `sub` carries the username and `uid` pins it to one account
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub uid: UserId,
    pub exp: u64,
    pub iat: u64,
    pub jti: String,
}

impl Claims {
    fn new(subject: &str, uid: UserId, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: subject.to_string(),
            uid,
            exp: (now + ttl).timestamp().max(0) as u64,
            iat: now.timestamp().max(0) as u64,
            jti: uuid::Uuid::new_v4().to_string(),
        }
    }
}

/// JWT-related errors
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Token has expired")]
    Expired,

    #[error("Invalid token")]
    Invalid,

    #[error("Unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Token encoding error: {0}")]
    EncodingError(String),
}

/// Issues and validates HMAC-signed access tokens
#[derive(Clone)]
pub struct JwtService {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    default_ttl: Duration,
}

impl JwtService {
    pub fn new(secret: &str, algorithm: Algorithm, default_ttl: Duration) -> Self {
        let mut validation = Validation::new(algorithm);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            algorithm,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            default_ttl,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Result<Self, TokenError> {
        let algorithm = Algorithm::from_str(&config.algorithm)
            .map_err(|_| TokenError::UnsupportedAlgorithm(config.algorithm.clone()))?;
        if !matches!(algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            return Err(TokenError::UnsupportedAlgorithm(config.algorithm.clone()));
        }

        Ok(Self::new(
            &config.jwt_secret,
            algorithm,
            Duration::minutes(config.access_token_expire_minutes),
        ))
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Sign a token for `subject` (account `uid`) that expires after `ttl`
    pub fn issue_token(
        &self,
        subject: &str,
        uid: UserId,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        let claims = Claims::new(subject, uid, ttl);
        encode(&Header::new(self.algorithm), &claims, &self.encoding_key).map_err(|e| {
            error!("Failed to encode JWT: {}", e);
            TokenError::EncodingError(e.to_string())
        })
    }

    /// Return the claims of a token that is well-signed and not yet expired
    pub fn validate_token(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| {
                debug!("Failed to decode JWT: {}", e);
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                    _ => TokenError::Invalid,
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claims::assert_ok;

    fn create_service(secret: &str) -> JwtService {
        JwtService::new(secret, Algorithm::HS256, Duration::minutes(30))
    }

    #[test]
    fn test_issue_and_validate_round_trip() {
        let service = create_service("secret");
        let uid = UserId::new();
        let token = service.issue_token("alice", uid, service.default_ttl()).unwrap();

        let claims = assert_ok!(service.validate_token(&token));
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.uid, uid);
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = create_service("secret");
        let token = service.issue_token("alice", UserId::new(), Duration::seconds(-30)).unwrap();

        assert!(matches!(service.validate_token(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn test_token_signed_with_other_secret_rejected() {
        let token = create_service("secret-a")
            .issue_token("alice", UserId::new(), Duration::minutes(5))
            .unwrap();

        let result = create_service("secret-b").validate_token(&token);
        assert!(matches!(result, Err(TokenError::Invalid)));
    }

    #[test]
    fn test_token_without_account_id_rejected() {
        #[derive(Serialize)]
        struct LegacyClaims {
            sub: String,
            exp: u64,
        }
        let exp = (Utc::now() + Duration::minutes(5)).timestamp() as u64;
        let token = encode(
            &Header::new(Algorithm::HS256),
            &LegacyClaims { sub: "alice".to_string(), exp },
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();

        let result = create_service("secret").validate_token(&token);
        assert!(matches!(result, Err(TokenError::Invalid)));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let service = create_service("secret");
        let token = service.issue_token("alice", UserId::new(), Duration::minutes(5)).unwrap();
        let mut tampered = token.clone();
        tampered.push('x');

        assert!(matches!(service.validate_token(&tampered), Err(TokenError::Invalid)));
        assert!(matches!(service.validate_token("not.a.jwt"), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_from_config_rejects_asymmetric_algorithms() {
        let config = AuthConfig {
            jwt_secret: "secret".to_string(),
            algorithm: "RS256".to_string(),
            access_token_expire_minutes: 30,
        };
        assert!(matches!(
            JwtService::from_config(&config),
            Err(TokenError::UnsupportedAlgorithm(_))
        ));

        let config = AuthConfig { algorithm: "HS512".to_string(), ..config };
        assert!(JwtService::from_config(&config).is_ok());
    }
}
