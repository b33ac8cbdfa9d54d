use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Secret used when none is configured; accepted only in local mode
pub const DEFAULT_JWT_SECRET: &str = "local-development-secret";

const DEFAULT_IMAGE_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/gif"];
const DEFAULT_AUDIO_TYPES: [&str; 3] = ["audio/mpeg", "audio/wav", "audio/ogg"];

/// Room left in a request body for multipart boundaries, part headers and the description
pub const MULTIPART_ALLOWANCE: u64 = 64 * 1024;

/// Runtime mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeMode {
    Local,
    Production,
}

impl std::fmt::Display for RuntimeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Production => write!(f, "production"),
        }
    }
}

impl std::str::FromStr for RuntimeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(format!("Invalid runtime mode: {s}. Valid values: local, production")),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub mode: RuntimeMode,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Database configuration; an empty `url` selects in-memory repositories (local only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_seconds: u64,
}

/// Token signing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub algorithm: String,
    pub access_token_expire_minutes: i64,
}

/// Which blob store backs uploaded media
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Filesystem,
    S3,
}

/// Blob storage and upload policy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,

    // filesystem backend
    pub base_path: String,
    pub public_base_url: String,
    pub url_signing_secret: String,

    // s3 backend
    pub bucket: String,
    pub region: String,
    pub endpoint: Option<String>,
    pub access_key_id: String,
    pub secret_access_key: String,

    pub presigned_url_ttl_seconds: u64,
    pub max_file_size: u64, // bytes
    pub allowed_image_types: Vec<String>,
    pub allowed_audio_types: Vec<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
    Compact,
}

impl AppConfig {
    /// Load configuration based on runtime mode
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or invalid
    pub fn load() -> Result<Self, config::ConfigError> {
        // Detect runtime mode from environment (default: local)
        let mode = std::env::var("RUN_MODE")
            .unwrap_or_else(|_| "local".to_string())
            .parse::<RuntimeMode>()
            .map_err(config::ConfigError::Message)?;

        Self::load_for_mode(mode)
    }

    /// Load configuration for a specific runtime mode
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing, invalid,
    /// or unsafe for the selected mode
    pub fn load_for_mode(mode: RuntimeMode) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        // For local mode only, load .env.local file (if it exists)
        if mode == RuntimeMode::Local {
            builder = builder.add_source(config::File::with_name(".env.local").required(false));
        }

        // Environment variables override file values, e.g. MEDIA_SERVICE__AUTH__JWT_SECRET
        builder = builder.add_source(
            config::Environment::with_prefix("MEDIA_SERVICE")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("storage.allowed_image_types")
                .with_list_parse_key("storage.allowed_audio_types"),
        );

        let (storage_backend, log_format) = match mode {
            RuntimeMode::Local => ("filesystem", "pretty"),
            RuntimeMode::Production => ("s3", "json"),
        };

        let settings = builder
            .set_default("mode", mode.to_string())?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("database.url", "")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 1)?
            .set_default("database.acquire_timeout_seconds", 30)?
            .set_default("auth.jwt_secret", DEFAULT_JWT_SECRET)?
            .set_default("auth.algorithm", "HS256")?
            .set_default("auth.access_token_expire_minutes", 30)?
            .set_default("storage.backend", storage_backend)?
            .set_default("storage.base_path", "./media")?
            .set_default("storage.public_base_url", "http://localhost:8000")?
            .set_default("storage.url_signing_secret", DEFAULT_JWT_SECRET)?
            .set_default("storage.bucket", "media-uploads")?
            .set_default("storage.region", "us-east-1")?
            .set_default("storage.endpoint", None::<String>)?
            .set_default("storage.access_key_id", "")?
            .set_default("storage.secret_access_key", "")?
            .set_default("storage.presigned_url_ttl_seconds", 3600)?
            .set_default("storage.max_file_size", 10 * 1024 * 1024)?
            .set_default("storage.allowed_image_types", DEFAULT_IMAGE_TYPES.to_vec())?
            .set_default("storage.allowed_audio_types", DEFAULT_AUDIO_TYPES.to_vec())?
            .set_default("logging.level", "info")?
            .set_default("logging.format", log_format)?
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that are only acceptable for local development
    ///
    /// # Errors
    /// Returns a `ConfigError::Message` describing the first problem found
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.auth.access_token_expire_minutes <= 0 {
            return Err(config::ConfigError::Message(
                "auth.access_token_expire_minutes must be positive".to_string(),
            ));
        }
        if self.storage.max_file_size == 0 {
            return Err(config::ConfigError::Message(
                "storage.max_file_size must be positive".to_string(),
            ));
        }

        if self.mode == RuntimeMode::Production {
            if self.auth.jwt_secret.is_empty() || self.auth.jwt_secret == DEFAULT_JWT_SECRET {
                return Err(config::ConfigError::Message(
                    "auth.jwt_secret must be set in production".to_string(),
                ));
            }
            if self.database.url.is_empty() {
                return Err(config::ConfigError::Message(
                    "database.url must be set in production".to_string(),
                ));
            }
            if self.storage.backend == StorageBackend::Filesystem
                && self.storage.url_signing_secret == DEFAULT_JWT_SECRET
            {
                return Err(config::ConfigError::Message(
                    "storage.url_signing_secret must be set in production".to_string(),
                ));
            }
        }

        Ok(())
    }
}

impl StorageConfig {
    /// Largest request body accepted on the upload route
    pub fn request_body_limit(&self) -> u64 {
        self.max_file_size.saturating_add(MULTIPART_ALLOWANCE)
    }
}

impl ServerConfig {
    /// Get the socket address for binding
    ///
    /// # Errors
    /// Returns an error if the host/port pair is not a valid socket address
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config(mode: RuntimeMode) -> AppConfig {
        AppConfig {
            mode,
            server: ServerConfig { host: "127.0.0.1".to_string(), port: 8080 },
            database: DatabaseConfig {
                url: String::new(),
                max_connections: 10,
                min_connections: 1,
                acquire_timeout_seconds: 30,
            },
            auth: AuthConfig {
                jwt_secret: DEFAULT_JWT_SECRET.to_string(),
                algorithm: "HS256".to_string(),
                access_token_expire_minutes: 30,
            },
            storage: StorageConfig {
                backend: StorageBackend::Filesystem,
                base_path: "/tmp/media".to_string(),
                public_base_url: "http://localhost:8080".to_string(),
                url_signing_secret: DEFAULT_JWT_SECRET.to_string(),
                bucket: "bucket".to_string(),
                region: "us-east-1".to_string(),
                endpoint: None,
                access_key_id: String::new(),
                secret_access_key: String::new(),
                presigned_url_ttl_seconds: 3600,
                max_file_size: 10 * 1024 * 1024,
                allowed_image_types: vec!["image/jpeg".to_string()],
                allowed_audio_types: vec!["audio/mpeg".to_string()],
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Pretty },
        }
    }

    #[test]
    fn test_runtime_mode_parse() {
        assert_eq!("prod".parse::<RuntimeMode>().unwrap(), RuntimeMode::Production);
        assert_eq!("LOCAL".parse::<RuntimeMode>().unwrap(), RuntimeMode::Local);
        assert!("staging".parse::<RuntimeMode>().is_err());
    }

    #[test]
    fn test_server_config_socket_addr() {
        let config = create_test_config(RuntimeMode::Local);
        let addr = config.server.socket_addr().unwrap();

        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 8080);
    }

    #[test]
    fn test_server_config_invalid_socket_addr() {
        let server = ServerConfig {
            host: "invalid-host-name-that-cannot-be-resolved-by-dns".to_string(),
            port: 8080,
        };
        assert!(server.socket_addr().is_err());
    }

    #[test]
    fn test_request_body_limit_follows_max_file_size() {
        let mut config = create_test_config(RuntimeMode::Local);
        config.storage.max_file_size = 20 * 1024 * 1024;
        assert_eq!(config.storage.request_body_limit(), 20 * 1024 * 1024 + MULTIPART_ALLOWANCE);

        config.storage.max_file_size = u64::MAX;
        assert_eq!(config.storage.request_body_limit(), u64::MAX);
    }

    #[test]
    fn test_local_config_accepts_defaults() {
        assert!(create_test_config(RuntimeMode::Local).validate().is_ok());
    }

    #[test]
    fn test_production_rejects_default_secret() {
        let mut config = create_test_config(RuntimeMode::Production);
        config.database.url = "postgres://db/media".to_string();
        assert!(config.validate().is_err());

        config.auth.jwt_secret = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_production_requires_database() {
        let mut config = create_test_config(RuntimeMode::Production);
        config.auth.jwt_secret = "a-real-secret".to_string();
        config.storage.backend = StorageBackend::S3;
        assert!(config.validate().is_err());

        config.database.url = "postgres://db/media".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_non_positive_token_lifetime_rejected() {
        let mut config = create_test_config(RuntimeMode::Local);
        config.auth.access_token_expire_minutes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_app_config_serialization() {
        let config = create_test_config(RuntimeMode::Local);

        let json = serde_json::to_string(&config).unwrap();
        let deserialized: AppConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(config.server.host, deserialized.server.host);
        assert_eq!(config.storage.backend, deserialized.storage.backend);
        assert_eq!(config.storage.allowed_image_types, deserialized.storage.allowed_image_types);
        assert_eq!(config.logging.format, deserialized.logging.format);
    }

    #[test]
    fn test_storage_backend_deserializes_lowercase() {
        let backend: StorageBackend = serde_json::from_str("\"s3\"").unwrap();
        assert_eq!(backend, StorageBackend::S3);
    }
}
