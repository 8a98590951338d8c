use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_models::error::AppError;

/// Durations a service definition may carry, in minutes.
pub const ALLOWED_DURATIONS: [i32; 3] = [15, 30, 60];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceDefinition {
    pub id: Uuid,
    pub name: String,
    pub duration: i32,
    pub required_staff_type: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateServiceRequest {
    pub name: String,
    pub duration: i32,
    pub required_staff_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateServiceRequest {
    pub name: Option<String>,
    pub duration: Option<i32>,
    pub required_staff_type: Option<String>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum CatalogError {
    #[error("Service not found")]
    NotFound,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound => AppError::NotFound(err.to_string()),
            CatalogError::Validation(msg) => AppError::Validation(msg),
            CatalogError::DatabaseError(msg) => AppError::Database(msg),
        }
    }
}
