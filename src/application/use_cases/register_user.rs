use std::sync::Arc;

use crate::{
    application::{
        dto::RegisterUserRequest,
        validation::normalize_email,
    },
    domain::{entities::User, repositories::UserRepository},
    infrastructure::auth::hash_password,
    presentation::middleware::error::AppError,
};

/// Use case for creating a new account
pub struct RegisterUserUseCase<U>
where
    U: UserRepository + ?Sized,
{
    users: Arc<U>,
}

impl<U> RegisterUserUseCase<U>
where
    U: UserRepository + ?Sized,
{
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }

    /// Validate, check uniqueness, hash the password and persist
    ///
    /// The lookups give friendly errors; the repository's own uniqueness
    /// check still decides races between concurrent registrations.
    pub async fn execute(&self, request: RegisterUserRequest) -> Result<User, AppError> {
        let request = RegisterUserRequest {
            email: normalize_email(&request.email),
            username: request.username.trim().to_string(),
            password: request.password,
        };
        request.validate()?;

        if self.users.find_by_username(&request.username).await?.is_some() {
            return Err(AppError::Conflict { message: "Username already registered".to_string() });
        }
        if self.users.find_by_email(&request.email).await?.is_some() {
            return Err(AppError::Conflict { message: "Email already registered".to_string() });
        }

        let password_hash = hash_password(&request.password)?;
        let user = User::new(request.email, request.username, password_hash);
        self.users.insert(&user).await?;

        tracing::info!(user_id = %user.id, username = %user.username, "Registered new user");
        Ok(user)
    }
}
