pub mod jwt;
pub mod password;

pub use jwt::{Claims, JwtService, TokenError};
pub use password::{hash_password, verify_password, PasswordError};
