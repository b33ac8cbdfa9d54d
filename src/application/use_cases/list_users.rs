use std::sync::Arc;

use crate::{
    domain::{entities::User, repositories::UserRepository},
    presentation::middleware::error::AppError,
};

/// Use case for the admin user listing
pub struct ListUsersUseCase<U>
where
    U: UserRepository + ?Sized,
{
    users: Arc<U>,
}

impl<U> ListUsersUseCase<U>
where
    U: UserRepository + ?Sized,
{
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }

    pub async fn execute(&self) -> Result<Vec<User>, AppError> {
        Ok(self.users.list().await?)
    }
}
