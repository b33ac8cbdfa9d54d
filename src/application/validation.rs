use std::collections::HashMap;

use crate::application::dto::{RegisterUserRequest, UpdateUserRequest};
use crate::presentation::middleware::error::AppError;

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MIN_USERNAME_LENGTH: usize = 3;
pub const MAX_USERNAME_LENGTH: usize = 50;

/// Minimal syntactic email check: one `@`, non-empty local part, dotted domain
pub fn validate_email(email: &str) -> Result<(), String> {
    let Some((local, domain)) = email.split_once('@') else {
        return Err("Invalid email format".to_string());
    };
    let domain_ok = !domain.contains('@')
        && domain.split('.').count() >= 2
        && domain.split('.').all(|label| !label.is_empty());

    if local.is_empty() || !domain_ok || email.chars().any(char::is_whitespace) {
        return Err("Invalid email format".to_string());
    }
    Ok(())
}

/// Usernames end up in storage keys, so the alphabet is restricted
pub fn validate_username(username: &str) -> Result<(), String> {
    let length = username.chars().count();
    if !(MIN_USERNAME_LENGTH..=MAX_USERNAME_LENGTH).contains(&length) {
        return Err(format!(
            "Username must be between {MIN_USERNAME_LENGTH} and {MAX_USERNAME_LENGTH} characters"
        ));
    }
    if !username.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')) {
        return Err("Username may only contain letters, digits, '_', '.' and '-'".to_string());
    }
    if username.starts_with('.') {
        return Err("Username must not start with '.'".to_string());
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), String> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(format!("Password must be at least {MIN_PASSWORD_LENGTH} characters"));
    }
    Ok(())
}

fn collect(checks: Vec<(&str, Result<(), String>)>) -> Result<(), AppError> {
    let errors: HashMap<String, String> = checks
        .into_iter()
        .filter_map(|(field, result)| result.err().map(|message| (field.to_string(), message)))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation { errors })
    }
}

impl RegisterUserRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        collect(vec![
            ("email", validate_email(&self.email)),
            ("username", validate_username(&self.username)),
            ("password", validate_password(&self.password)),
        ])
    }
}

impl UpdateUserRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        let mut checks = Vec::new();
        if let Some(email) = &self.email {
            checks.push(("email", validate_email(email)));
        }
        if let Some(username) = &self.username {
            checks.push(("username", validate_username(username)));
        }
        if let Some(password) = &self.password {
            checks.push(("password", validate_password(password)));
        }
        collect(checks)
    }
}

/// Emails compare case-insensitively
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
