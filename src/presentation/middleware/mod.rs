//! Request extractors and the error type shared by all handlers

pub mod auth;
pub mod error;

pub use auth::{AdminUser, CurrentUser};
pub use error::{AppError, ErrorResponse};
