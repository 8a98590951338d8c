use std::sync::Arc;

use chrono::Utc;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::{return_representation, SupabaseClient};

use crate::models::{
    CatalogError, CreateServiceRequest, ServiceDefinition, UpdateServiceRequest, ALLOWED_DURATIONS,
};

pub struct CatalogService {
    supabase: Arc<SupabaseClient>,
}

impl CatalogService {
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
        request: CreateServiceRequest,
        user_id: &str,
        auth_token: &str,
    ) -> Result<ServiceDefinition, CatalogError> {
        if request.name.trim().is_empty() {
            return Err(CatalogError::Validation(
                "Service name is required".to_string(),
            ));
        }
        if request.required_staff_type.trim().is_empty() {
            return Err(CatalogError::Validation(
                "Required staff type is required".to_string(),
            ));
        }
        validate_duration(request.duration)?;

        let now = Utc::now();
        let body = json!({
            "name": request.name,
            "duration": request.duration,
            "required_staff_type": request.required_staff_type,
            "user_id": user_id,
            "created_at": now.to_rfc3339(),
            "updated_at": now.to_rfc3339()
        });

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/services",
                Some(auth_token),
                Some(body),
                Some(return_representation()),
            )
            .await
            .map_err(|e| CatalogError::DatabaseError(e.to_string()))?;

        parse_first(result)?.ok_or_else(|| {
            CatalogError::DatabaseError("Failed to create service".to_string())
        })
    }

    pub async fn find_all(
        &self,
        user_id: &str,
        auth_token: &str,
    ) -> Result<Vec<ServiceDefinition>, CatalogError> {
        let path = format!("/rest/v1/services?user_id=eq.{}&order=name.asc", user_id);

        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| CatalogError::DatabaseError(e.to_string()))?;

        result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<ServiceDefinition>, _>>()
            .map_err(|e| CatalogError::DatabaseError(format!("Failed to parse services: {}", e)))
    }

    /// Existence check used by the appointment scheduler before booking.
    pub async fn find_one(
        &self,
        service_id: Uuid,
        user_id: &str,
        auth_token: &str,
    ) -> Result<ServiceDefinition, CatalogError> {
        debug!("Fetching service definition: {}", service_id);

        let path = format!("/rest/v1/services?id=eq.{}&user_id=eq.{}", service_id, user_id);

        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| CatalogError::DatabaseError(e.to_string()))?;

        parse_first(result)?.ok_or(CatalogError::NotFound)
    }

    pub async fn update(
        &self,
        service_id: Uuid,
        request: UpdateServiceRequest,
        user_id: &str,
        auth_token: &str,
    ) -> Result<ServiceDefinition, CatalogError> {
        let mut update_data = serde_json::Map::new();

        if let Some(name) = request.name {
            if name.trim().is_empty() {
                return Err(CatalogError::Validation(
                    "Service name is required".to_string(),
                ));
            }
            update_data.insert("name".to_string(), json!(name));
        }
        if let Some(duration) = request.duration {
            validate_duration(duration)?;
            update_data.insert("duration".to_string(), json!(duration));
        }
        if let Some(staff_type) = request.required_staff_type {
            update_data.insert("required_staff_type".to_string(), json!(staff_type));
        }
        update_data.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));

        let path = format!("/rest/v1/services?id=eq.{}&user_id=eq.{}", service_id, user_id);

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
            .map_err(|e| CatalogError::DatabaseError(e.to_string()))?;

        parse_first(result)?.ok_or(CatalogError::NotFound)
    }

    pub async fn remove(
        &self,
        service_id: Uuid,
        user_id: &str,
        auth_token: &str,
    ) -> Result<ServiceDefinition, CatalogError> {
        let path = format!("/rest/v1/services?id=eq.{}&user_id=eq.{}", service_id, user_id);

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
            .map_err(|e| CatalogError::DatabaseError(e.to_string()))?;

        parse_first(result)?.ok_or(CatalogError::NotFound)
    }
}

fn validate_duration(duration: i32) -> Result<(), CatalogError> {
    if ALLOWED_DURATIONS.contains(&duration) {
        Ok(())
    } else {
        Err(CatalogError::Validation(format!(
            "Duration must be one of {:?} minutes",
            ALLOWED_DURATIONS
        )))
    }
}

fn parse_first(rows: Vec<Value>) -> Result<Option<ServiceDefinition>, CatalogError> {
    match rows.into_iter().next() {
        None => Ok(None),
        Some(row) => serde_json::from_value(row)
            .map(Some)
            .map_err(|e| CatalogError::DatabaseError(format!("Failed to parse service: {}", e))),
    }
}
