use axum::{
    extract::{Path, Query, State},
    Json,
};
use axum_extra::extract::WithRejection;

use crate::{
    application::{
        dto::{MediaDto, ReviewMediaRequest, StatsDto, UpdateRoleQuery, UserDto},
        use_cases::{
            ChangeUserRoleUseCase, GetStatsUseCase, ListPendingMediaUseCase, ListUsersUseCase,
            ReviewMediaUseCase,
        },
    },
    domain::entities::{MediaId, UserId},
    presentation::{
        middleware::{AdminUser, AppError},
        AppState,
    },
};

/// `GET /admin/users`
pub async fn list_users(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<Vec<UserDto>>, AppError> {
    let users = ListUsersUseCase::new(state.users.clone()).execute().await?;
    Ok(Json(users.into_iter().map(UserDto::from).collect()))
}

/// `PUT /admin/users/{id}/role?role=admin|user`
pub async fn change_user_role(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    WithRejection(Path(user_id), _): WithRejection<Path<UserId>, AppError>,
    WithRejection(Query(query), _): WithRejection<Query<UpdateRoleQuery>, AppError>,
) -> Result<Json<UserDto>, AppError> {
    let user = ChangeUserRoleUseCase::new(state.users.clone())
        .execute(&admin, user_id, query.role)
        .await?;
    Ok(Json(user.into()))
}

/// `GET /admin/media/pending`
pub async fn list_pending_media(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<Vec<MediaDto>>, AppError> {
    let media = ListPendingMediaUseCase::new(state.media.clone()).execute().await?;
    Ok(Json(media.into_iter().map(MediaDto::from).collect()))
}

/// `PUT /admin/media/{id}/review`
pub async fn review_media(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    WithRejection(Path(media_id), _): WithRejection<Path<MediaId>, AppError>,
    WithRejection(Json(request), _): WithRejection<Json<ReviewMediaRequest>, AppError>,
) -> Result<Json<MediaDto>, AppError> {
    let media =
        ReviewMediaUseCase::new(state.media.clone()).execute(&admin, media_id, request).await?;
    Ok(Json(media.into()))
}

/// `GET /admin/stats`
pub async fn get_stats(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<StatsDto>, AppError> {
    let stats = GetStatsUseCase::new(state.users.clone(), state.media.clone()).execute().await?;
    Ok(Json(stats))
}
