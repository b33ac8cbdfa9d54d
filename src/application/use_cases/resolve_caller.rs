use std::sync::Arc;

use crate::{
    domain::{entities::User, repositories::UserRepository, value_objects::UserRole},
    infrastructure::auth::JwtService,
    presentation::middleware::error::AppError,
};

/// Use case turning a bearer token into the calling user
pub struct ResolveCallerUseCase<U>
where
    U: UserRepository + ?Sized,
{
    users: Arc<U>,
    jwt: Arc<JwtService>,
}

impl<U> ResolveCallerUseCase<U>
where
    U: UserRepository + ?Sized,
{
    pub fn new(users: Arc<U>, jwt: Arc<JwtService>) -> Self {
        Self { users, jwt }
    }

    /// Validate the token and load its subject, which must still exist and be active
    ///
    /// The username must still belong to the account the token was issued
    /// for, so a name freed by a rename does not carry old tokens with it.
    pub async fn execute(&self, token: &str) -> Result<User, AppError> {
        let claims = self.jwt.validate_token(token)?;

        let user = self
            .users
            .find_by_username(&claims.sub)
            .await?
            .filter(|user| user.id == claims.uid)
            .ok_or_else(|| AppError::Authentication {
                message: "Could not validate credentials".to_string(),
            })?;

        if !user.is_active {
            return Err(AppError::Authorization { message: "Inactive user".to_string() });
        }

        Ok(user)
    }

    /// Resolve the caller and require `role`
    pub async fn execute_with_role(&self, token: &str, role: UserRole) -> Result<User, AppError> {
        let user = self.execute(token).await?;
        require_role(user, role)
    }
}

/// Pass the user through when their role satisfies `required`
pub fn require_role(user: User, required: UserRole) -> Result<User, AppError> {
    if user.role.satisfies(required) {
        Ok(user)
    } else {
        Err(AppError::Authorization { message: "Not enough permissions".to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dto::UpdateUserRequest;
    use crate::application::use_cases::UpdateUserUseCase;
    use crate::domain::entities::UserId;
    use crate::domain::repositories::UserRepository;
    use crate::infrastructure::persistence::InMemoryUserRepository;
    use crate::test_utils::TestContext;
    use chrono::Duration;
    use claims::{assert_err, assert_ok};

    fn token_for(ctx: &TestContext, user: &User, ttl: Duration) -> String {
        ctx.jwt.issue_token(&user.username, user.id, ttl).unwrap()
    }

    fn use_case(ctx: &TestContext) -> ResolveCallerUseCase<InMemoryUserRepository> {
        ResolveCallerUseCase::new(ctx.users.clone(), ctx.jwt.clone())
    }

    #[tokio::test]
    async fn test_valid_token_resolves_user() {
        let ctx = TestContext::new();
        let alice = ctx.create_user("alice", UserRole::User).await;
        let token = token_for(&ctx, &alice, Duration::minutes(5));

        let caller = assert_ok!(use_case(&ctx).execute(&token).await);
        assert_eq!(caller.id, alice.id);
    }

    #[tokio::test]
    async fn test_token_for_deleted_user_rejected() {
        let ctx = TestContext::new();
        let token = ctx.jwt.issue_token("ghost", UserId::new(), Duration::minutes(5)).unwrap();

        let err = assert_err!(use_case(&ctx).execute(&token).await);
        assert!(matches!(err, AppError::Authentication { .. }));
    }

    #[tokio::test]
    async fn test_token_does_not_follow_a_reused_username() {
        let ctx = TestContext::new();
        let alice = ctx.create_user("alice", UserRole::User).await;
        let old_token = token_for(&ctx, &alice, Duration::minutes(5));

        let rename = UpdateUserRequest {
            username: Some("alicia".to_string()),
            ..UpdateUserRequest::default()
        };
        UpdateUserUseCase::new(ctx.users.clone()).execute(alice.id, rename).await.unwrap();
        let newcomer = ctx.create_user("alice", UserRole::User).await;

        let err = assert_err!(use_case(&ctx).execute(&old_token).await);
        assert!(matches!(err, AppError::Authentication { .. }));

        let fresh = token_for(&ctx, &newcomer, Duration::minutes(5));
        assert_eq!(assert_ok!(use_case(&ctx).execute(&fresh).await).id, newcomer.id);
    }

    #[tokio::test]
    async fn test_expired_token_rejected() {
        let ctx = TestContext::new();
        let alice = ctx.create_user("alice", UserRole::User).await;
        let token = token_for(&ctx, &alice, Duration::seconds(-5));

        let err = assert_err!(use_case(&ctx).execute(&token).await);
        assert!(matches!(err, AppError::Authentication { .. }));
    }

    #[tokio::test]
    async fn test_inactive_user_forbidden() {
        let ctx = TestContext::new();
        let mut user = ctx.create_user("dormant", UserRole::User).await;
        user.is_active = false;
        ctx.users.delete(user.id).await.unwrap();
        ctx.users.insert(&user).await.unwrap();
        let token = token_for(&ctx, &user, Duration::minutes(5));

        let err = assert_err!(use_case(&ctx).execute(&token).await);
        assert!(matches!(err, AppError::Authorization { .. }));
    }

    #[tokio::test]
    async fn test_admin_role_required() {
        let ctx = TestContext::new();
        let alice = ctx.create_user("alice", UserRole::User).await;
        let root = ctx.create_user("root", UserRole::Admin).await;
        let use_case = use_case(&ctx);

        let user_token = token_for(&ctx, &alice, Duration::minutes(5));
        let admin_token = token_for(&ctx, &root, Duration::minutes(5));

        let err = assert_err!(use_case.execute_with_role(&user_token, UserRole::Admin).await);
        assert!(matches!(err, AppError::Authorization { .. }));
        assert_ok!(use_case.execute_with_role(&admin_token, UserRole::Admin).await);
        assert_ok!(use_case.execute_with_role(&admin_token, UserRole::User).await);
    }
}
