use anyhow::Context;
use axum::{
    extract::{DefaultBodyLimit, State},
    http::{header, Method, StatusCode},
    response::Json,
    Router,
};
use serde_json::{json, Value};
use std::{sync::Arc, time::Duration};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{error, info, warn};

use crate::{
    domain::repositories::{MediaRepository, UserRepository},
    infrastructure::{
        auth::JwtService,
        config::{AppConfig, StorageBackend},
        persistence::{
            Database, InMemoryMediaRepository, InMemoryUserRepository, PostgreSqlMediaRepository,
            PostgreSqlUserRepository,
        },
        storage::{BlobStore, FilesystemBlobStore, MediaStore, PresignedUrlService, S3BlobStore},
    },
    presentation::{middleware::AppError, routes, AppState},
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Create the main application router
pub fn create_app(state: AppState) -> Router {
    let body_limit =
        usize::try_from(state.config.storage.request_body_limit()).unwrap_or(usize::MAX);

    let middleware_stack = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(create_cors_layer())
        .layer(DefaultBodyLimit::max(body_limit));

    routes::create_routes(state).fallback(not_found_handler).layer(middleware_stack)
}

/// Wire repositories, blob store and token service from configuration
///
/// # Errors
/// Returns an error if the database, the blob store or the token service
/// cannot be initialized
pub async fn build_state(config: AppConfig) -> anyhow::Result<AppState> {
    let (users, media): (Arc<dyn UserRepository>, Arc<dyn MediaRepository>) =
        if config.database.url.is_empty() {
            warn!("No database URL configured, using in-memory repositories");
            (Arc::new(InMemoryUserRepository::new()), Arc::new(InMemoryMediaRepository::new()))
        } else {
            let database = Database::new(&config.database).await?;
            (
                Arc::new(PostgreSqlUserRepository::new(database.pool().clone())),
                Arc::new(PostgreSqlMediaRepository::new(database.pool().clone())),
            )
        };

    let (blobs, url_signer): (Arc<dyn BlobStore>, Option<Arc<PresignedUrlService>>) =
        match config.storage.backend {
            StorageBackend::Filesystem => {
                let signer = PresignedUrlService::new(
                    config.storage.url_signing_secret.clone(),
                    config.storage.public_base_url.clone(),
                );
                info!(base_path = %config.storage.base_path, "Using filesystem blob store");
                (
                    Arc::new(FilesystemBlobStore::new(&config.storage.base_path, signer.clone())),
                    Some(Arc::new(signer)),
                )
            }
            StorageBackend::S3 => {
                info!(bucket = %config.storage.bucket, "Using S3 blob store");
                let store = S3BlobStore::from_config(&config.storage)
                    .context("Failed to configure S3 blob store")?;
                (Arc::new(store), None)
            }
        };

    let jwt = JwtService::from_config(&config.auth).context("Failed to configure token service")?;
    let media_store = MediaStore::from_config(blobs, &config.storage);

    Ok(AppState {
        config: Arc::new(config),
        users,
        media,
        media_store: Arc::new(media_store),
        jwt: Arc::new(jwt),
        url_signer,
    })
}

/// Welcome message
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Media moderation service",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Liveness probe
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "service": "media-moderation-service"
    }))
}

/// Readiness probe: the user repository and the blob store must both answer
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let database = state.users.health_check().await;
    let storage = state.media_store.blobs().health_check().await;

    if let Err(e) = &database {
        warn!(error = %e, "Readiness: repository check failed");
    }
    if let Err(e) = &storage {
        warn!(error = %e, "Readiness: blob store check failed");
    }

    let ready = database.is_ok() && storage.is_ok();
    let status = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };

    (
        status,
        Json(json!({
            "status": if ready { "ready" } else { "not_ready" },
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "checks": {
                "database": if database.is_ok() { "ok" } else { "unavailable" },
                "storage": if storage.is_ok() { "ok" } else { "unavailable" },
            }
        })),
    )
}

async fn not_found_handler() -> AppError {
    AppError::not_found("Route")
}

/// Permissive CORS: any origin, the four verbs the API uses
fn create_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    info!("Shutdown signal received");
}

/// Start the HTTP server
///
/// # Errors
/// Returns an error if the state cannot be built or the server fails to bind
pub async fn start_server(config: AppConfig) -> anyhow::Result<()> {
    let addr = config.server.socket_addr().context("Invalid server host/port")?;
    let state = build_state(config).await?;
    let app = create_app(state);

    info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    Ok(())
}
