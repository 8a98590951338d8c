use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::User;

use crate::jwt::create_token;

pub struct TestConfig {
    pub jwt_secret: String,
    pub supabase_url: String,
    pub supabase_anon_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "test-anon-key".to_string(),
        }
    }
}

impl TestConfig {
    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_anon_key: self.supabase_anon_key.clone(),
            supabase_jwt_secret: self.jwt_secret.clone(),
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct TestUser {
    pub id: String,
    pub email: String,
    pub role: String,
}

impl Default for TestUser {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: "test@example.com".to_string(),
            role: "user".to_string(),
        }
    }
}

impl TestUser {
    pub fn new(email: &str, role: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            role: role.to_string(),
        }
    }

    pub fn admin(email: &str) -> Self {
        Self::new(email, "admin")
    }

    pub fn to_user(&self) -> User {
        User {
            id: self.id.clone(),
            email: Some(self.email.clone()),
            role: Some(self.role.clone()),
            created_at: Some(chrono::Utc::now()),
        }
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(user: &TestUser, secret: &str, exp_hours: Option<i64>) -> String {
        create_token(&user.id, &user.email, &user.role, secret, exp_hours.unwrap_or(24))
            .expect("test token creation failed")
    }

    pub fn create_expired_token(user: &TestUser, secret: &str) -> String {
        Self::create_test_token(user, secret, Some(-1))
    }

    pub fn create_invalid_signature_token(user: &TestUser) -> String {
        Self::create_test_token(user, "wrong-secret", Some(24))
    }
}

/// Canned PostgREST rows for wiremock-backed tests.
pub struct MockTableResponses;

impl MockTableResponses {
    pub fn staff_row(staff_id: &str, user_id: &str, name: &str, daily_capacity: i32) -> serde_json::Value {
        json!({
            "id": staff_id,
            "name": name,
            "service_type": "General",
            "daily_capacity": daily_capacity,
            "availability_status": "Available",
            "user_id": user_id,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn service_row(service_id: &str, user_id: &str, name: &str) -> serde_json::Value {
        json!({
            "id": service_id,
            "name": name,
            "duration": 30,
            "required_staff_type": "General",
            "user_id": user_id,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn appointment_row(
        appointment_id: &str,
        user_id: &str,
        service_id: &str,
        staff_id: Option<&str>,
        date: &str,
        time: &str,
        status: &str,
        queue_position: Option<i32>,
    ) -> serde_json::Value {
        json!({
            "id": appointment_id,
            "customer_name": "Test Customer",
            "service_id": service_id,
            "staff_id": staff_id,
            "appointment_date": date,
            "appointment_time": time,
            "status": status,
            "queue_position": queue_position,
            "user_id": user_id,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn activity_log_row(appointment_id: &str, staff_id: &str, user_id: &str) -> serde_json::Value {
        json!({
            "id": Uuid::new_v4(),
            "action": "QueueToStaff",
            "description": "Appointment auto-assigned to staff.",
            "appointment_id": appointment_id,
            "staff_id": staff_id,
            "user_id": user_id,
            "created_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn user_row(user_id: &str, email: &str, password_hash: &str) -> serde_json::Value {
        json!({
            "id": user_id,
            "email": email,
            "password": password_hash,
            "name": "Test User",
            "role": "user",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }
}
