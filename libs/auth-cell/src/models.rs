use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_models::error::AppError;

/// A stored account row. The password hash never leaves the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Email already in use")]
    EmailTaken,

    #[error("User not found")]
    NotFound,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Failed to issue token: {0}")]
    TokenCreation(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials | AuthError::EmailTaken => AppError::Auth(err.to_string()),
            AuthError::NotFound => AppError::NotFound(err.to_string()),
            AuthError::Validation(msg) => AppError::Validation(msg),
            AuthError::TokenCreation(msg) => AppError::Internal(msg),
            AuthError::DatabaseError(msg) => AppError::Database(msg),
        }
    }
}
