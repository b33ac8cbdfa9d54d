#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, request::Builder as RequestBuilder, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use media_moderation_service::{
    domain::{entities::UserId, repositories::UserRepository, value_objects::UserRole},
    infrastructure::{
        auth::JwtService,
        config::{
            AppConfig, AuthConfig, DatabaseConfig, LogFormat, LoggingConfig, RuntimeMode,
            ServerConfig, StorageBackend, StorageConfig,
        },
        http::create_app,
        persistence::{InMemoryMediaRepository, InMemoryUserRepository},
        storage::{FilesystemBlobStore, MediaStore, PresignedUrlService},
    },
    presentation::AppState,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

pub const PASSWORD: &str = "password123";
pub const BASE_URL: &str = "http://localhost:8000";
const BOUNDARY: &str = "----media-test-boundary";

/// A JPEG header followed by `len - 4` zero bytes
pub fn jpeg(len: usize) -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8, 0xFF, 0xE0];
    data.resize(len.max(4), 0);
    data
}

pub fn pdf() -> Vec<u8> {
    b"%PDF-1.4\n%fake document".to_vec()
}

/// Full router over in-memory repositories and a temp-dir blob store
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub temp_dir: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_max_file_size(1024 * 1024)
    }

    pub fn with_max_file_size(max_file_size: u64) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(temp_dir.path().to_str().unwrap(), max_file_size);

        let signer = PresignedUrlService::new(config.storage.url_signing_secret.clone(), BASE_URL);
        let blobs = Arc::new(FilesystemBlobStore::new(temp_dir.path(), signer.clone()));
        let media_store = MediaStore::from_config(blobs, &config.storage);
        let jwt = JwtService::from_config(&config.auth).unwrap();

        let state = AppState {
            config: Arc::new(config),
            users: Arc::new(InMemoryUserRepository::new()),
            media: Arc::new(InMemoryMediaRepository::new()),
            media_store: Arc::new(media_store),
            jwt: Arc::new(jwt),
            url_signer: Some(Arc::new(signer)),
        };

        Self { router: create_app(state.clone()), state, temp_dir }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        TestResponse::new(response).await
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> TestResponse {
        self.send(with_auth(Request::get(path), token).body(Body::empty()).unwrap()).await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> TestResponse {
        self.send(with_auth(Request::delete(path), token).body(Body::empty()).unwrap()).await
    }

    pub async fn post_json(&self, path: &str, body: &Value, token: Option<&str>) -> TestResponse {
        self.send(
            with_auth(Request::post(path), token)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn put_json(&self, path: &str, body: &Value, token: Option<&str>) -> TestResponse {
        self.send(
            with_auth(Request::put(path), token)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn put(&self, path: &str, token: Option<&str>) -> TestResponse {
        self.send(with_auth(Request::put(path), token).body(Body::empty()).unwrap()).await
    }

    pub async fn register(&self, username: &str) -> TestResponse {
        self.post_json(
            "/api/users",
            &json!({
                "email": format!("{username}@example.com"),
                "username": username,
                "password": PASSWORD,
            }),
            None,
        )
        .await
    }

    pub async fn login(&self, username: &str, password: &str) -> TestResponse {
        self.send(
            Request::post("/auth/token")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(format!("username={username}&password={password}")))
                .unwrap(),
        )
        .await
    }

    /// Register and log in, returning the user id and a bearer token
    pub async fn signup(&self, username: &str) -> (String, String) {
        let registered = self.register(username).await;
        registered.assert_status(StatusCode::CREATED);
        let login = self.login(username, PASSWORD).await;
        login.assert_status(StatusCode::OK);
        let body = login.json();
        (
            registered.json()["id"].as_str().unwrap().to_string(),
            body["access_token"].as_str().unwrap().to_string(),
        )
    }

    /// Same as `signup`, then promote the user directly in the repository
    pub async fn signup_admin(&self, username: &str) -> (String, String) {
        let (id, token) = self.signup(username).await;
        let user_id: UserId = id.parse().unwrap();
        self.state.users.update_role(user_id, UserRole::Admin).await.unwrap().unwrap();
        (id, token)
    }

    pub async fn upload(
        &self,
        token: &str,
        filename: &str,
        data: &[u8],
        description: Option<&str>,
    ) -> TestResponse {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\n\
                 Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
        if let Some(text) = description {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\n\
                     Content-Disposition: form-data; name=\"description\"\r\n\r\n{text}\r\n"
                )
                .as_bytes(),
            );
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        self.send(
            with_auth(Request::post("/api/media/upload"), Some(token))
                .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
                .body(Body::from(body))
                .unwrap(),
        )
        .await
    }

    /// Number of blobs currently on disk
    pub fn stored_file_count(&self) -> usize {
        fn walk(dir: &std::path::Path) -> usize {
            std::fs::read_dir(dir)
                .map(|entries| {
                    entries
                        .flatten()
                        .map(|entry| if entry.path().is_dir() { walk(&entry.path()) } else { 1 })
                        .sum()
                })
                .unwrap_or(0)
        }
        walk(self.temp_dir.path())
    }
}

fn with_auth(builder: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => builder.header(header::AUTHORIZATION, format!("Bearer {token}")),
        None => builder,
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    async fn new(response: axum::response::Response) -> Self {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.into_body().collect().await.unwrap().to_bytes().to_vec();
        Self { status, headers, body }
    }

    pub fn assert_status(&self, expected: StatusCode) {
        assert_eq!(self.status, expected, "Response body: {}", String::from_utf8_lossy(&self.body));
    }

    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    /// The `id` field of a JSON body
    pub fn id(&self) -> String {
        self.json()["id"].as_str().unwrap().to_string()
    }

    pub fn error_message(&self) -> String {
        self.json()["error"]["message"].as_str().unwrap_or_default().to_string()
    }
}

pub fn test_config(base_path: &str, max_file_size: u64) -> AppConfig {
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
            jwt_secret: "integration-test-secret".to_string(),
            algorithm: "HS256".to_string(),
            access_token_expire_minutes: 30,
        },
        storage: StorageConfig {
            backend: StorageBackend::Filesystem,
            base_path: base_path.to_string(),
            public_base_url: BASE_URL.to_string(),
            url_signing_secret: "integration-signing-secret".to_string(),
            bucket: String::new(),
            region: "us-east-1".to_string(),
            endpoint: None,
            access_key_id: String::new(),
            secret_access_key: String::new(),
            presigned_url_ttl_seconds: 3600,
            max_file_size,
            allowed_image_types: vec!["image/jpeg".into(), "image/png".into(), "image/gif".into()],
            allowed_audio_types: vec!["audio/mpeg".into(), "audio/wav".into(), "audio/ogg".into()],
        },
        logging: LoggingConfig { level: "debug".to_string(), format: LogFormat::Compact },
    }
}
