use std::sync::Arc;

use chrono::Utc;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::{return_representation, SupabaseClient};

use crate::models::{
    CreateStaffRequest, Staff, StaffError, UpdateStaffRequest, DEFAULT_DAILY_CAPACITY,
};

pub struct StaffService {
    supabase: Arc<SupabaseClient>,
}

impl StaffService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: Arc::new(SupabaseClient::new(config)),
        }
    }

    pub fn with_client(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    pub async fn create(
        &self,
        request: CreateStaffRequest,
        user_id: &str,
        auth_token: &str,
    ) -> Result<Staff, StaffError> {
        if request.name.trim().is_empty() {
            return Err(StaffError::Validation("Staff name is required".to_string()));
        }
        if request.service_type.trim().is_empty() {
            return Err(StaffError::Validation("Service type is required".to_string()));
        }
        let daily_capacity = request.daily_capacity.unwrap_or(DEFAULT_DAILY_CAPACITY);
        if daily_capacity <= 0 {
            return Err(StaffError::Validation(
                "Daily capacity must be a positive integer".to_string(),
            ));
        }

        let now = Utc::now();
        let body = json!({
            "name": request.name,
            "service_type": request.service_type,
            "daily_capacity": daily_capacity,
            "availability_status": request.availability_status
                .map(|s| s.to_string())
                .unwrap_or_else(|| "Available".to_string()),
            "user_id": user_id,
            "created_at": now.to_rfc3339(),
            "updated_at": now.to_rfc3339()
        });

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/staff",
                Some(auth_token),
                Some(body),
                Some(return_representation()),
            )
            .await
            .map_err(|e| StaffError::DatabaseError(e.to_string()))?;

        parse_first(result)?.ok_or_else(|| {
            StaffError::DatabaseError("Failed to create staff member".to_string())
        })
    }

    pub async fn find_all(&self, user_id: &str, auth_token: &str) -> Result<Vec<Staff>, StaffError> {
        let path = format!("/rest/v1/staff?user_id=eq.{}&order=name.asc", user_id);

        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| StaffError::DatabaseError(e.to_string()))?;

        result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Staff>, _>>()
            .map_err(|e| StaffError::DatabaseError(format!("Failed to parse staff: {}", e)))
    }

    /// Capacity lookup used by the appointment scheduler.
    pub async fn find_one(
        &self,
        staff_id: Uuid,
        user_id: &str,
        auth_token: &str,
    ) -> Result<Staff, StaffError> {
        debug!("Fetching staff member: {}", staff_id);

        let path = format!("/rest/v1/staff?id=eq.{}&user_id=eq.{}", staff_id, user_id);

        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| StaffError::DatabaseError(e.to_string()))?;

        parse_first(result)?.ok_or(StaffError::NotFound)
    }

    pub async fn update(
        &self,
        staff_id: Uuid,
        request: UpdateStaffRequest,
        user_id: &str,
        auth_token: &str,
    ) -> Result<Staff, StaffError> {
        let mut update_data = serde_json::Map::new();

        if let Some(name) = request.name {
            if name.trim().is_empty() {
                return Err(StaffError::Validation("Staff name is required".to_string()));
            }
            update_data.insert("name".to_string(), json!(name));
        }
        if let Some(service_type) = request.service_type {
            update_data.insert("service_type".to_string(), json!(service_type));
        }
        if let Some(daily_capacity) = request.daily_capacity {
            if daily_capacity <= 0 {
                return Err(StaffError::Validation(
                    "Daily capacity must be a positive integer".to_string(),
                ));
            }
            update_data.insert("daily_capacity".to_string(), json!(daily_capacity));
        }
        if let Some(status) = request.availability_status {
            update_data.insert("availability_status".to_string(), json!(status.to_string()));
        }
        update_data.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));

        let path = format!("/rest/v1/staff?id=eq.{}&user_id=eq.{}", staff_id, user_id);

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(auth_token),
                Some(Value::Object(update_data)),
                Some(return_representation()),
            )
            .await
            .map_err(|e| StaffError::DatabaseError(e.to_string()))?;

        parse_first(result)?.ok_or(StaffError::NotFound)
    }

    pub async fn remove(
        &self,
        staff_id: Uuid,
        user_id: &str,
        auth_token: &str,
    ) -> Result<Staff, StaffError> {
        let path = format!("/rest/v1/staff?id=eq.{}&user_id=eq.{}", staff_id, user_id);

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::DELETE,
                &path,
                Some(auth_token),
                None,
                Some(return_representation()),
            )
            .await
            .map_err(|e| StaffError::DatabaseError(e.to_string()))?;

        parse_first(result)?.ok_or(StaffError::NotFound)
    }
}

fn parse_first(rows: Vec<Value>) -> Result<Option<Staff>, StaffError> {
    match rows.into_iter().next() {
        None => Ok(None),
        Some(row) => serde_json::from_value(row)
            .map(Some)
            .map_err(|e| StaffError::DatabaseError(format!("Failed to parse staff: {}", e))),
    }
}
