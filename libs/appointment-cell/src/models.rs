use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_models::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
    #[serde(rename = "No-Show")]
    NoShow,
    Waiting,
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AppointmentStatus::Scheduled => "Scheduled",
            AppointmentStatus::Completed => "Completed",
            AppointmentStatus::Cancelled => "Cancelled",
            AppointmentStatus::NoShow => "No-Show",
            AppointmentStatus::Waiting => "Waiting",
        };
        write!(f, "{}", s)
    }
}

/// A booking for a customer, either scheduled against a staff member or
/// parked in the waiting queue with a position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub customer_name: String,
    pub service_id: Uuid,
    pub staff_id: Option<Uuid>,
    pub appointment_date: NaiveDate,
    /// Opaque slot token, e.g. "10:00". Compared for exact equality only.
    pub appointment_time: String,
    pub status: AppointmentStatus,
    pub queue_position: Option<i32>,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointmentRequest {
    pub customer_name: String,
    pub service_id: Uuid,
    pub staff_id: Option<Uuid>,
    pub appointment_date: NaiveDate,
    pub appointment_time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAppointmentRequest {
    pub customer_name: Option<String>,
    pub service_id: Option<Uuid>,
    pub staff_id: Option<Uuid>,
    pub appointment_date: Option<NaiveDate>,
    pub appointment_time: Option<String>,
    pub status: Option<AppointmentStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: AppointmentStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppointmentSearchQuery {
    pub date: Option<NaiveDate>,
    pub staff_id: Option<Uuid>,
    pub status: Option<AppointmentStatus>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("{0}")]
    MissingDependency(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Time conflict with existing appointment")]
    TimeConflict,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::NotFound => AppError::NotFound(err.to_string()),
            AppointmentError::MissingDependency(msg) => AppError::NotFound(msg),
            AppointmentError::Validation(msg) => AppError::Validation(msg),
            AppointmentError::TimeConflict => AppError::Conflict(err.to_string()),
            AppointmentError::DatabaseError(msg) => AppError::Database(msg),
        }
    }
}
