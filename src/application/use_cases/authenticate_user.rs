use std::sync::Arc;

use crate::{
    application::dto::TokenResponse,
    domain::{entities::User, repositories::UserRepository},
    infrastructure::auth::{password::verify_dummy, verify_password, JwtService},
    presentation::middleware::error::AppError,
};

const BAD_CREDENTIALS: &str = "Incorrect username or password";

/// Use case for exchanging a username and password for an access token
pub struct AuthenticateUserUseCase<U>
where
    U: UserRepository + ?Sized,
{
    users: Arc<U>,
    jwt: Arc<JwtService>,
}

impl<U> AuthenticateUserUseCase<U>
where
    U: UserRepository + ?Sized,
{
    pub fn new(users: Arc<U>, jwt: Arc<JwtService>) -> Self {
        Self { users, jwt }
    }

    /// Check credentials without revealing whether the username exists
    pub async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<User, AppError> {
        let Some(user) = self.users.find_by_username(username).await? else {
            verify_dummy(password);
            return Err(AppError::Authentication { message: BAD_CREDENTIALS.to_string() });
        };

        if !verify_password(password, &user.password_hash)? {
            return Err(AppError::Authentication { message: BAD_CREDENTIALS.to_string() });
        }

        Ok(user)
    }

    pub async fn execute(&self, username: &str, password: &str) -> Result<TokenResponse, AppError> {
        let user = self.verify_credentials(username, password).await?;

        let access_token =
            self.jwt.issue_token(&user.username, user.id, self.jwt.default_ttl())?;

        tracing::info!(user_id = %user.id, "Issued access token");

        Ok(TokenResponse {
            access_token,
            token_type: "bearer".to_string(),
            user_id: user.id,
            username: user.username,
            role: user.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::UserRole;
    use crate::test_utils::{TestContext, TEST_PASSWORD};
    use claims::{assert_err, assert_ok};

    #[tokio::test]
    async fn test_login_issues_token_for_username() {
        let ctx = TestContext::new();
        let alice = ctx.create_user("alice", UserRole::User).await;
        let use_case = AuthenticateUserUseCase::new(ctx.users.clone(), ctx.jwt.clone());

        let response = assert_ok!(use_case.execute("alice", TEST_PASSWORD).await);

        assert_eq!(response.token_type, "bearer");
        assert_eq!(response.user_id, alice.id);
        assert_eq!(response.role, UserRole::User);
        let claims = ctx.jwt.validate_token(&response.access_token).unwrap();
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.uid, alice.id);
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_user_look_the_same() {
        let ctx = TestContext::new();
        ctx.create_user("alice", UserRole::User).await;
        let use_case = AuthenticateUserUseCase::new(ctx.users.clone(), ctx.jwt.clone());

        let wrong_password = assert_err!(use_case.execute("alice", "wrong-password").await);
        let unknown_user = assert_err!(use_case.execute("mallory", TEST_PASSWORD).await);

        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
        assert!(matches!(wrong_password, AppError::Authentication { .. }));
    }
}
