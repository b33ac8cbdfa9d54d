pub mod connection;
pub mod media_repository;
pub mod memory;
pub mod user_repository;

pub use connection::Database;
pub use media_repository::PostgreSqlMediaRepository;
pub use memory::{InMemoryMediaRepository, InMemoryUserRepository};
pub use user_repository::PostgreSqlUserRepository;

use crate::domain::repositories::RepositoryError;

/// Translate a failed write, turning unique-index violations into conflicts
pub(crate) fn map_write_error(err: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            let field = match db_err.constraint() {
                Some("users_email_key") => "Email",
                Some("users_username_key") => "Username",
                _ => "Record",
            };
            return RepositoryError::Conflict { field: field.to_string() };
        }
    }
    RepositoryError::from(err)
}

/// Decode a stored enum column, reporting unknown values as database errors
pub(crate) fn parse_column<T>(value: &str, column: &str) -> Result<T, RepositoryError>
where
    T: std::str::FromStr,
{
    value.parse().map_err(|_| RepositoryError::Database {
        message: format!("Invalid {column} value in database: {value}"),
    })
}
