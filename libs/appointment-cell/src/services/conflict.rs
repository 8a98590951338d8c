use std::sync::Arc;

use chrono::NaiveDate;
use reqwest::Method;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use shared_database::supabase::SupabaseClient;

use crate::models::{Appointment, AppointmentError};

/// Slot and capacity checks against a staff member's day.
pub struct ConflictService {
    supabase: Arc<SupabaseClient>,
}

impl ConflictService {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    /// Returns the appointment already holding the requested slot, if any.
    ///
    /// Only appointments that occupy staff time count: Scheduled and
    /// Completed. Cancelled, No-Show and Waiting entries never block a slot.
    /// Slot tokens are compared for exact equality, so "09:00" and "9:00"
    /// are distinct slots.
    pub async fn find_conflict(
        &self,
        staff_id: Uuid,
        date: NaiveDate,
        time: &str,
        exclude_appointment_id: Option<Uuid>,
        auth_token: &str,
    ) -> Result<Option<Appointment>, AppointmentError> {
        debug!("Checking slot {} on {} for staff {}", time, date, staff_id);

        let path = format!(
            "/rest/v1/appointments?staff_id=eq.{}&appointment_date=eq.{}&status=in.(Scheduled,Completed)",
            staff_id, date
        );

        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        let appointments = rows
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Appointment>, _>>()
            .map_err(|e| {
                AppointmentError::DatabaseError(format!("Failed to parse appointments: {}", e))
            })?;

        Ok(appointments.into_iter().find(|appt| {
            appt.appointment_time == time && Some(appt.id) != exclude_appointment_id
        }))
    }

    /// Whether the staff member can take one more Scheduled appointment on
    /// the given date. Only Scheduled entries count toward capacity, so
    /// completed or cancelled work frees the slot back up.
    pub async fn has_capacity(
        &self,
        staff_id: Uuid,
        daily_capacity: i32,
        date: NaiveDate,
        auth_token: &str,
    ) -> Result<bool, AppointmentError> {
        let path = format!(
            "/rest/v1/appointments?staff_id=eq.{}&appointment_date=eq.{}&status=eq.Scheduled&select=id",
            staff_id, date
        );

        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        Ok((rows.len() as i32) < daily_capacity)
    }
}
