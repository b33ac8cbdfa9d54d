use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use tracing::debug;

use super::error::AppError;
use crate::{
    application::use_cases::{require_role, ResolveCallerUseCase},
    domain::{entities::User, value_objects::UserRole},
    presentation::state::AppState,
};

/// The authenticated caller, resolved from `Authorization: Bearer <token>`
///
/// The user record is re-read on every request so role and active-flag
/// changes take effect without waiting for the token to expire.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// An authenticated caller holding the admin role
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

async fn bearer_token(parts: &mut Parts, state: &AppState) -> Result<String, AppError> {
    let TypedHeader(Authorization(bearer)) =
        TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                debug!(error = %e, "Missing or malformed Authorization header");
                AppError::Authentication { message: "Not authenticated".to_string() }
            })?;
    Ok(bearer.token().to_string())
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts, state).await?;
        let user = ResolveCallerUseCase::new(state.users.clone(), state.jwt.clone())
            .execute(&token)
            .await?;
        Ok(CurrentUser(user))
    }
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        Ok(AdminUser(require_role(user, UserRole::Admin)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestContext;
    use axum::http::{header::AUTHORIZATION, Request};
    use claims::{assert_err, assert_ok};

    fn parts(authorization: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = authorization {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    fn bearer_for(ctx: &TestContext, user: &User) -> String {
        let token = ctx.jwt.issue_token(&user.username, user.id, ctx.jwt.default_ttl()).unwrap();
        format!("Bearer {token}")
    }

    async fn current_user(
        ctx: &TestContext,
        header: Option<&str>,
    ) -> Result<CurrentUser, AppError> {
        CurrentUser::from_request_parts(&mut parts(header), &ctx.app_state()).await
    }

    async fn admin_user(ctx: &TestContext, header: Option<&str>) -> Result<AdminUser, AppError> {
        AdminUser::from_request_parts(&mut parts(header), &ctx.app_state()).await
    }

    #[tokio::test]
    async fn test_missing_header_is_unauthenticated() {
        let ctx = TestContext::new();
        let err = assert_err!(current_user(&ctx, None).await);
        assert!(matches!(err, AppError::Authentication { .. }));

        let err = assert_err!(current_user(&ctx, Some("Basic abc")).await);
        assert!(matches!(err, AppError::Authentication { .. }));
    }

    #[tokio::test]
    async fn test_valid_token_resolves_user() {
        let ctx = TestContext::new();
        let alice = ctx.create_user("alice", UserRole::User).await;
        let header = bearer_for(&ctx, &alice);

        let CurrentUser(user) = assert_ok!(current_user(&ctx, Some(&header)).await);
        assert_eq!(user.id, alice.id);
    }

    #[tokio::test]
    async fn test_admin_guard() {
        let ctx = TestContext::new();
        let alice = ctx.create_user("alice", UserRole::User).await;
        let root = ctx.create_user("root", UserRole::Admin).await;

        let err = assert_err!(admin_user(&ctx, Some(&bearer_for(&ctx, &alice))).await);
        assert!(matches!(err, AppError::Authorization { .. }));

        assert_ok!(admin_user(&ctx, Some(&bearer_for(&ctx, &root))).await);
    }
}
