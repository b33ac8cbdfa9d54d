use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::WithRejection;

use crate::{
    application::{
        dto::{RegisterUserRequest, UpdateUserRequest, UserDto},
        use_cases::{DeleteUserUseCase, RegisterUserUseCase, UpdateUserUseCase},
    },
    presentation::{
        middleware::{AppError, CurrentUser},
        AppState,
    },
};

/// `POST /api/users`
pub async fn register(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<RegisterUserRequest>, AppError>,
) -> Result<(StatusCode, Json<UserDto>), AppError> {
    let user = RegisterUserUseCase::new(state.users.clone()).execute(request).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// `GET /api/users/me`
pub async fn get_me(CurrentUser(user): CurrentUser) -> Json<UserDto> {
    Json(user.into())
}

/// `PUT /api/users/me`
pub async fn update_me(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    WithRejection(Json(request), _): WithRejection<Json<UpdateUserRequest>, AppError>,
) -> Result<Json<UserDto>, AppError> {
    let updated = UpdateUserUseCase::new(state.users.clone()).execute(user.id, request).await?;
    Ok(Json(updated.into()))
}

/// `DELETE /api/users/me`: removes the account together with all of its media
pub async fn delete_me(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<StatusCode, AppError> {
    DeleteUserUseCase::new(state.users.clone(), state.media.clone(), state.media_store.clone())
        .execute(&user)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
