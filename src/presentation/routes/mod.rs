use axum::{
    routing::{get, post, put},
    Router,
};

use crate::{
    infrastructure::http::{health_check, readiness_check, root},
    presentation::{handlers, AppState},
};

/// Create all application routes with application state
pub fn create_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/auth/token", post(handlers::auth::login))
        .route("/files/{*key}", get(handlers::files::download_file))
        .merge(user_routes())
        .merge(media_routes())
        .merge(admin_routes())
        .with_state(app_state)
}

fn user_routes() -> Router<AppState> {
    Router::new().route("/api/users", post(handlers::users::register)).route(
        "/api/users/me",
        get(handlers::users::get_me)
            .put(handlers::users::update_me)
            .delete(handlers::users::delete_me),
    )
}

fn media_routes() -> Router<AppState> {
    Router::new()
        .route("/api/media/upload", post(handlers::media::upload_media))
        .route("/api/media/me", get(handlers::media::list_my_media))
        .route(
            "/api/media/{id}",
            get(handlers::media::get_media).delete(handlers::media::delete_media),
        )
}

/// Every handler here takes `AdminUser`, so non-admins get 403
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/users", get(handlers::admin::list_users))
        .route("/admin/users/{id}/role", put(handlers::admin::change_user_role))
        .route("/admin/media/pending", get(handlers::admin::list_pending_media))
        .route("/admin/media/{id}/review", put(handlers::admin::review_media))
        .route("/admin/stats", get(handlers::admin::get_stats))
}
