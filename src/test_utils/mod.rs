use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

use crate::application::dto::UploadFile;
use crate::domain::entities::User;
use crate::domain::repositories::UserRepository;
use crate::domain::value_objects::UserRole;
use crate::infrastructure::auth::{hash_password, JwtService};
use crate::infrastructure::config::{
    AppConfig, AuthConfig, DatabaseConfig, LogFormat, LoggingConfig, RuntimeMode, ServerConfig,
    StorageBackend, StorageConfig,
};
use crate::infrastructure::persistence::{InMemoryMediaRepository, InMemoryUserRepository};
use crate::infrastructure::storage::{
    FilesystemBlobStore, MediaStore, PresignedUrlService, UploadPolicy,
};
use crate::presentation::AppState;

pub const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00];
pub const MP3_BYTES: &[u8] = b"ID3\x03\x00\x00\x00\x00\x00\x0Ffake-frames";
pub const PDF_BYTES: &[u8] = b"%PDF-1.4\n%fake";

pub const TEST_PASSWORD: &str = "password123";

/// Everything a use case needs, backed by memory and a temp directory
pub struct TestContext {
    pub users: Arc<InMemoryUserRepository>,
    pub media: Arc<InMemoryMediaRepository>,
    pub store: Arc<MediaStore>,
    pub jwt: Arc<JwtService>,
    pub temp_dir: TempDir,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_max_file_size(1024 * 1024)
    }

    pub fn with_max_file_size(max_file_size: u64) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let blobs = FilesystemBlobStore::new(
            temp_dir.path(),
            PresignedUrlService::new("test-signing-secret", "http://localhost:8000"),
        );
        let store = MediaStore::new(
            Arc::new(blobs),
            UploadPolicy { max_file_size, ..UploadPolicy::default() },
            Duration::from_secs(3600),
        );

        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            media: Arc::new(InMemoryMediaRepository::new()),
            store: Arc::new(store),
            jwt: Arc::new(JwtService::new(
                "test-jwt-secret",
                jsonwebtoken::Algorithm::HS256,
                chrono::Duration::minutes(30),
            )),
            temp_dir,
        }
    }

    /// Insert an active user whose password is `TEST_PASSWORD`
    pub async fn create_user(&self, username: &str, role: UserRole) -> User {
        let user = User::new(
            format!("{username}@example.com"),
            username.to_string(),
            hash_password(TEST_PASSWORD).unwrap(),
        )
        .with_role(role);
        self.users.insert(&user).await.unwrap();
        user
    }

    /// Handler state sharing this context's repositories and store
    pub fn app_state(&self) -> AppState {
        AppState {
            config: Arc::new(test_config(self.temp_dir.path().to_string_lossy().as_ref())),
            users: self.users.clone(),
            media: self.media.clone(),
            media_store: self.store.clone(),
            jwt: self.jwt.clone(),
            url_signer: None,
        }
    }

    /// Count files currently under the blob root
    pub fn stored_file_count(&self) -> usize {
        fn walk(dir: &std::path::Path) -> usize {
            std::fs::read_dir(dir)
                .map(|entries| {
                    entries
                        .flatten()
                        .map(|entry| {
                            let path = entry.path();
                            if path.is_dir() { walk(&path) } else { 1 }
                        })
                        .sum()
                })
                .unwrap_or(0)
        }
        walk(self.temp_dir.path())
    }
}

pub fn upload(filename: &str, data: &'static [u8]) -> UploadFile {
    UploadFile { filename: filename.to_string(), data: Bytes::from_static(data), description: None }
}

/// Local-mode configuration that never touches the environment
pub fn test_config(base_path: &str) -> AppConfig {
    AppConfig {
        mode: RuntimeMode::Local,
        server: ServerConfig { host: "127.0.0.1".to_string(), port: 0 },
        database: DatabaseConfig {
            url: String::new(),
            max_connections: 1,
            min_connections: 1,
            acquire_timeout_seconds: 1,
        },
        auth: AuthConfig {
            jwt_secret: "test-jwt-secret".to_string(),
            algorithm: "HS256".to_string(),
            access_token_expire_minutes: 30,
        },
        storage: StorageConfig {
            backend: StorageBackend::Filesystem,
            base_path: base_path.to_string(),
            public_base_url: "http://localhost:8000".to_string(),
            url_signing_secret: "test-signing-secret".to_string(),
            bucket: String::new(),
            region: "us-east-1".to_string(),
            endpoint: None,
            access_key_id: String::new(),
            secret_access_key: String::new(),
            presigned_url_ttl_seconds: 3600,
            max_file_size: 1024 * 1024,
            allowed_image_types: vec!["image/jpeg".into(), "image/png".into(), "image/gif".into()],
            allowed_audio_types: vec!["audio/mpeg".into(), "audio/wav".into(), "audio/ogg".into()],
        },
        logging: LoggingConfig { level: "debug".to_string(), format: LogFormat::Compact },
    }
}
