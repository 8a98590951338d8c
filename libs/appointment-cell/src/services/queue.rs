use std::sync::Arc;

use chrono::Utc;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;

use shared_database::supabase::{return_representation, SupabaseClient};

use crate::models::{Appointment, AppointmentError};

/// Waiting-queue bookkeeping: ordering, position assignment and renumbering.
pub struct QueueService {
    supabase: Arc<SupabaseClient>,
}

impl QueueService {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    /// All Waiting appointments for the account, soonest first. Ties on the
    /// date break on the lexicographic order of the slot token.
    pub async fn get_queue(
        &self,
        user_id: &str,
        auth_token: &str,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let path = format!(
            "/rest/v1/appointments?user_id=eq.{}&status=eq.Waiting&order=appointment_date.asc,appointment_time.asc",
            user_id
        );

        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        rows.into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Appointment>, _>>()
            .map_err(|e| {
                AppointmentError::DatabaseError(format!("Failed to parse queue: {}", e))
            })
    }

    /// Next position at the back of the queue: one past the highest Waiting
    /// position, or 1 for an empty queue. Positions are per account.
    pub async fn next_position(
        &self,
        user_id: &str,
        auth_token: &str,
    ) -> Result<i32, AppointmentError> {
        let path = format!(
            "/rest/v1/appointments?user_id=eq.{}&status=eq.Waiting&order=queue_position.desc&limit=1",
            user_id
        );

        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        let max_position = rows
            .first()
            .and_then(|row| row.get("queue_position"))
            .and_then(Value::as_i64)
            .unwrap_or(0);

        Ok(max_position as i32 + 1)
    }

    /// Rewrites every Waiting position to 1..n in queue order, closing the
    /// gap left by a promotion.
    pub async fn renumber(&self, user_id: &str, auth_token: &str) -> Result<(), AppointmentError> {
        let queue = self.get_queue(user_id, auth_token).await?;

        debug!("Renumbering {} waiting appointments", queue.len());

        for (index, appointment) in queue.iter().enumerate() {
            let position = index as i32 + 1;
            let path = format!(
                "/rest/v1/appointments?id=eq.{}&user_id=eq.{}",
                appointment.id, user_id
            );
            let body = json!({
                "queue_position": position,
                "updated_at": Utc::now().to_rfc3339()
            });

            let _: Vec<Value> = self
                .supabase
                .request_with_headers(
                    Method::PATCH,
                    &path,
                    Some(auth_token),
                    Some(body),
                    Some(return_representation()),
                )
                .await
                .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;
        }

        Ok(())
    }
}
