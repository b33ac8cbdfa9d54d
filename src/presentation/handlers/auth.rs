use axum::{extract::State, Form, Json};
use axum_extra::extract::WithRejection;

use crate::{
    application::{
        dto::{LoginForm, TokenResponse},
        use_cases::AuthenticateUserUseCase,
    },
    presentation::{middleware::AppError, AppState},
};

/// `POST /auth/token`: exchange username and password for a bearer token
pub async fn login(
    State(state): State<AppState>,
    WithRejection(Form(form), _): WithRejection<Form<LoginForm>, AppError>,
) -> Result<Json<TokenResponse>, AppError> {
    let use_case = AuthenticateUserUseCase::new(state.users.clone(), state.jwt.clone());
    let response = use_case.execute(&form.username, &form.password).await?;
    Ok(Json(response))
}
