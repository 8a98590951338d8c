use std::sync::Arc;

use chrono::Utc;
use reqwest::Method;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::{return_representation, SupabaseClient};
use shared_utils::password::hash_password;

use crate::models::{AuthError, UserAccount};

/// Account rows. Lookups run with the anon key since they happen before a
/// session exists.
pub struct UsersService {
    supabase: Arc<SupabaseClient>,
}

impl UsersService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: Arc::new(SupabaseClient::new(config)),
        }
    }

    pub fn with_client(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, AuthError> {
        let path = format!("/rest/v1/users?email=eq.{}", urlencoding::encode(email));

        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None, None)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        parse_first(rows)
    }

    pub async fn find_by_id(&self, user_id: &str) -> Result<Option<UserAccount>, AuthError> {
        let path = format!("/rest/v1/users?id=eq.{}", user_id);

        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None, None)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        parse_first(rows)
    }

    pub async fn create_user(
        &self,
        email: &str,
        password: &str,
        name: &str,
        role: &str,
    ) -> Result<UserAccount, AuthError> {
        let hashed = hash_password(password)
            .map_err(|e| AuthError::DatabaseError(format!("Failed to hash password: {}", e)))?;

        let now = Utc::now();
        let body = json!({
            "id": Uuid::new_v4(),
            "email": email,
            "password": hashed,
            "name": name,
            "role": role,
            "created_at": now.to_rfc3339(),
            "updated_at": now.to_rfc3339()
        });

        let rows: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/users",
                None,
                Some(body),
                Some(return_representation()),
            )
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        parse_first(rows)?
            .ok_or_else(|| AuthError::DatabaseError("Failed to create user".to_string()))
    }
}

fn parse_first(rows: Vec<Value>) -> Result<Option<UserAccount>, AuthError> {
    match rows.into_iter().next() {
        None => Ok(None),
        Some(row) => serde_json::from_value(row)
            .map(Some)
            .map_err(|e| AuthError::DatabaseError(format!("Failed to parse user: {}", e))),
    }
}
