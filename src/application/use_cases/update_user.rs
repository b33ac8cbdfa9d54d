use std::sync::Arc;

use crate::{
    application::{dto::UpdateUserRequest, validation::normalize_email},
    domain::{
        entities::{User, UserId},
        repositories::UserRepository,
    },
    infrastructure::auth::hash_password,
    presentation::middleware::error::AppError,
};

/// Use case for a user editing their own profile
pub struct UpdateUserUseCase<U>
where
    U: UserRepository + ?Sized,
{
    users: Arc<U>,
}

impl<U> UpdateUserUseCase<U>
where
    U: UserRepository + ?Sized,
{
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }

    pub async fn execute(
        &self,
        user_id: UserId,
        request: UpdateUserRequest,
    ) -> Result<User, AppError> {
        let request = UpdateUserRequest {
            email: request.email.as_deref().map(normalize_email),
            username: request.username.map(|u| u.trim().to_string()),
            password: request.password,
        };
        request.validate()?;

        let mut user =
            self.users.find_by_id(user_id).await?.ok_or_else(|| AppError::not_found("User"))?;

        if request.is_empty() {
            return Ok(user);
        }

        if let Some(username) = request.username {
            if username != user.username {
                if self.users.find_by_username(&username).await?.is_some() {
                    return Err(AppError::Conflict {
                        message: "Username already registered".to_string(),
                    });
                }
                user.username = username;
            }
        }
        if let Some(email) = request.email {
            if email != user.email {
                if self.users.find_by_email(&email).await?.is_some() {
                    return Err(AppError::Conflict {
                        message: "Email already registered".to_string(),
                    });
                }
                user.email = email;
            }
        }
        if let Some(password) = request.password {
            user.password_hash = hash_password(&password)?;
        }

        if !self.users.update(&user).await? {
            return Err(AppError::not_found("User"));
        }

        tracing::info!(user_id = %user.id, "Updated user profile");
        Ok(user)
    }
}
