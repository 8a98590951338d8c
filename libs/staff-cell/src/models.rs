use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use shared_models::error::AppError;

/// A bookable staff member. `daily_capacity` bounds how many Scheduled
/// appointments the member may hold on a single calendar date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Staff {
    pub id: Uuid,
    pub name: String,
    pub service_type: String,
    pub daily_capacity: i32,
    pub availability_status: AvailabilityStatus,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum AvailabilityStatus {
    Available,
    #[serde(rename = "On Leave")]
    OnLeave,
}

impl fmt::Display for AvailabilityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AvailabilityStatus::Available => write!(f, "Available"),
            AvailabilityStatus::OnLeave => write!(f, "On Leave"),
        }
    }
}

pub const DEFAULT_DAILY_CAPACITY: i32 = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStaffRequest {
    pub name: String,
    pub service_type: String,
    pub daily_capacity: Option<i32>,
    pub availability_status: Option<AvailabilityStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStaffRequest {
    pub name: Option<String>,
    pub service_type: Option<String>,
    pub daily_capacity: Option<i32>,
    pub availability_status: Option<AvailabilityStatus>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum StaffError {
    #[error("Staff member not found")]
    NotFound,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<StaffError> for AppError {
    fn from(err: StaffError) -> Self {
        match err {
            StaffError::NotFound => AppError::NotFound(err.to_string()),
            StaffError::Validation(msg) => AppError::Validation(msg),
            StaffError::DatabaseError(msg) => AppError::Database(msg),
        }
    }
}
