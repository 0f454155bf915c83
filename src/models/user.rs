use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

pub const MIN_PASSWORD_LEN: usize = 8;

/// A registered account
///
/// `password_hash` is absent for accounts created through OAuth and is
/// never serialized into responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: Option<String>,
    #[serde(skip_serializing, default)]
    pub google_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create an account
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub google_id: Option<String>,
}

/// Trims and validates a display name
pub fn validate_name(raw: &str) -> AppResult<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppError::InvalidInput("Name is required".to_string()));
    }
    Ok(name.to_string())
}

/// Light-weight shape check; real deliverability is the mail server's
/// problem.
pub fn validate_email(raw: &str) -> AppResult<String> {
    let email = raw.trim().to_lowercase();
    let valid = email
        .split_once('@')
        .map(|(local, domain)| !local.is_empty() && domain.contains('.') && !domain.starts_with('.'))
        .unwrap_or(false);
    if !valid {
        return Err(AppError::InvalidInput(
            "Please provide a valid email address".to_string(),
        ));
    }
    Ok(email)
}

pub fn validate_password(raw: &str) -> AppResult<&str> {
    if raw.len() < MIN_PASSWORD_LEN {
        return Err(AppError::InvalidInput(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(raw)
}
