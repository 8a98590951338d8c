use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_models::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityAction {
    QueueToStaff,
    ManualAssign,
    StatusChange,
}

impl std::fmt::Display for ActivityAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ActivityAction::QueueToStaff => "QueueToStaff",
            ActivityAction::ManualAssign => "ManualAssign",
            ActivityAction::StatusChange => "StatusChange",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityLog {
    pub id: Uuid,
    pub action: ActivityAction,
    pub description: String,
    pub appointment_id: Uuid,
    pub staff_id: Option<Uuid>,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ActivityLogError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<ActivityLogError> for AppError {
    fn from(err: ActivityLogError) -> Self {
        match err {
            ActivityLogError::DatabaseError(msg) => AppError::Database(msg),
        }
    }
}
