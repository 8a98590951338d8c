use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_models::error::AppError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayStats {
    pub total_appointments: usize,
    pub completed: usize,
    pub pending: usize,
    pub waiting_queue_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffLoad {
    pub staff_id: Uuid,
    pub name: String,
    pub current: usize,
    pub max: i32,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub today_stats: TodayStats,
    pub staff_load: Vec<StaffLoad>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum DashboardError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<DashboardError> for AppError {
    fn from(err: DashboardError) -> Self {
        match err {
            DashboardError::DatabaseError(msg) => AppError::Database(msg),
        }
    }
}
