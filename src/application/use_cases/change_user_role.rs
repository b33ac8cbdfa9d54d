use std::sync::Arc;

use crate::{
    domain::{
        entities::{User, UserId},
        repositories::UserRepository,
        value_objects::UserRole,
    },
    presentation::middleware::error::AppError,
};

/// Use case for an admin promoting or demoting a user
pub struct ChangeUserRoleUseCase<U>
where
    U: UserRepository + ?Sized,
{
    users: Arc<U>,
}

impl<U> ChangeUserRoleUseCase<U>
where
    U: UserRepository + ?Sized,
{
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }

    /// Admins cannot change their own role, whichever role is requested
    pub async fn execute(
        &self,
        admin: &User,
        target: UserId,
        role: UserRole,
    ) -> Result<User, AppError> {
        if target == admin.id {
            return Err(AppError::bad_request("Cannot change your own role"));
        }

        let user = self
            .users
            .update_role(target, role)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;

        tracing::info!(admin_id = %admin.id, user_id = %target, role = %role, "Changed user role");
        Ok(user)
    }
}
