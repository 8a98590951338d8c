use std::sync::Arc;

use chrono::Utc;
use reqwest::Method;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::{return_representation, SupabaseClient};

use crate::models::{ActivityAction, ActivityLog, ActivityLogError};

const RECENT_LOG_LIMIT: usize = 10;

pub struct ActivityLogService {
    supabase: Arc<SupabaseClient>,
}

impl ActivityLogService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: Arc::new(SupabaseClient::new(config)),
        }
    }

    pub fn with_client(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    pub async fn create_log(
        &self,
        action: ActivityAction,
        description: &str,
        appointment_id: Uuid,
        staff_id: Option<Uuid>,
        user_id: &str,
        auth_token: &str,
    ) -> Result<ActivityLog, ActivityLogError> {
        let body = json!({
            "action": action.to_string(),
            "description": description,
            "appointment_id": appointment_id,
            "staff_id": staff_id,
            "user_id": user_id,
            "created_at": Utc::now().to_rfc3339()
        });

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/activity_logs",
                Some(auth_token),
                Some(body),
                Some(return_representation()),
            )
            .await
            .map_err(|e| ActivityLogError::DatabaseError(e.to_string()))?;

        result
            .into_iter()
            .next()
            .ok_or_else(|| {
                ActivityLogError::DatabaseError("Failed to create activity log".to_string())
            })
            .and_then(|row| {
                serde_json::from_value(row).map_err(|e| {
                    ActivityLogError::DatabaseError(format!("Failed to parse activity log: {}", e))
                })
            })
    }

    /// Most recent entries first, capped at ten.
    pub async fn get_recent_logs(
        &self,
        user_id: &str,
        auth_token: &str,
    ) -> Result<Vec<ActivityLog>, ActivityLogError> {
        let path = format!(
            "/rest/v1/activity_logs?user_id=eq.{}&order=created_at.desc&limit={}",
            user_id, RECENT_LOG_LIMIT
        );

        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| ActivityLogError::DatabaseError(e.to_string()))?;

        result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<ActivityLog>, _>>()
            .map_err(|e| {
                ActivityLogError::DatabaseError(format!("Failed to parse activity logs: {}", e))
            })
    }
}
