use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use reqwest::Method;
use serde_json::Value;
use uuid::Uuid;

use appointment_cell::models::{Appointment, AppointmentStatus};
use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use staff_cell::models::{AvailabilityStatus, Staff};

use crate::models::{DashboardError, StaffLoad, TodayStats};

/// Aggregates for the landing page: today's appointment counts and the
/// load on each staff member.
pub struct DashboardService {
    supabase: Arc<SupabaseClient>,
}

impl DashboardService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: Arc::new(SupabaseClient::new(config)),
        }
    }

    pub fn with_client(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    pub async fn today_stats(
        &self,
        user_id: &str,
        auth_token: &str,
    ) -> Result<TodayStats, DashboardError> {
        let today = Utc::now().date_naive();
        let path = format!(
            "/rest/v1/appointments?user_id=eq.{}&appointment_date=eq.{}",
            user_id, today
        );

        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| DashboardError::DatabaseError(e.to_string()))?;

        let appointments = rows
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Appointment>, _>>()
            .map_err(|e| {
                DashboardError::DatabaseError(format!("Failed to parse appointments: {}", e))
            })?;

        Ok(summarize_today(&appointments))
    }

    pub async fn staff_load(
        &self,
        user_id: &str,
        auth_token: &str,
    ) -> Result<Vec<StaffLoad>, DashboardError> {
        let today = Utc::now().date_naive();

        let path = format!("/rest/v1/staff?user_id=eq.{}&order=name.asc", user_id);
        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| DashboardError::DatabaseError(e.to_string()))?;

        let staff_list = rows
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Staff>, _>>()
            .map_err(|e| DashboardError::DatabaseError(format!("Failed to parse staff: {}", e)))?;

        let mut loads = Vec::with_capacity(staff_list.len());
        for staff in staff_list {
            let current = self
                .scheduled_count_today(staff.id, today, auth_token)
                .await?;
            loads.push(StaffLoad {
                staff_id: staff.id,
                name: staff.name.clone(),
                current,
                max: staff.daily_capacity,
                status: derive_load_status(&staff, current).to_string(),
            });
        }

        Ok(loads)
    }

    async fn scheduled_count_today(
        &self,
        staff_id: Uuid,
        today: NaiveDate,
        auth_token: &str,
    ) -> Result<usize, DashboardError> {
        let path = format!(
            "/rest/v1/appointments?staff_id=eq.{}&appointment_date=eq.{}&status=eq.Scheduled&select=id",
            staff_id, today
        );

        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| DashboardError::DatabaseError(e.to_string()))?;

        Ok(rows.len())
    }
}

fn summarize_today(appointments: &[Appointment]) -> TodayStats {
    TodayStats {
        total_appointments: appointments.len(),
        completed: appointments
            .iter()
            .filter(|a| a.status == AppointmentStatus::Completed)
            .count(),
        pending: appointments
            .iter()
            .filter(|a| a.status == AppointmentStatus::Scheduled)
            .count(),
        waiting_queue_count: appointments
            .iter()
            .filter(|a| a.status == AppointmentStatus::Waiting)
            .count(),
    }
}

/// Leave wins over load. A staff member within one appointment of the cap
/// reads as Near Capacity, at or past it as Booked.
fn derive_load_status(staff: &Staff, scheduled_today: usize) -> &'static str {
    if staff.availability_status == AvailabilityStatus::OnLeave {
        "On Leave"
    } else if scheduled_today as i32 >= staff.daily_capacity {
        "Booked"
    } else if scheduled_today as i32 >= staff.daily_capacity - 1 {
        "Near Capacity"
    } else {
        "Available"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn staff(capacity: i32, availability: AvailabilityStatus) -> Staff {
        Staff {
            id: Uuid::new_v4(),
            name: "Alex".to_string(),
            service_type: "General".to_string(),
            daily_capacity: capacity,
            availability_status: availability,
            user_id: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn load_status_thresholds() {
        let s = staff(5, AvailabilityStatus::Available);
        assert_eq!(derive_load_status(&s, 0), "Available");
        assert_eq!(derive_load_status(&s, 3), "Available");
        assert_eq!(derive_load_status(&s, 4), "Near Capacity");
        assert_eq!(derive_load_status(&s, 5), "Booked");
        assert_eq!(derive_load_status(&s, 6), "Booked");
    }

    #[test]
    fn leave_overrides_load() {
        let s = staff(5, AvailabilityStatus::OnLeave);
        assert_eq!(derive_load_status(&s, 0), "On Leave");
        assert_eq!(derive_load_status(&s, 5), "On Leave");
    }

    #[test]
    fn capacity_one_staff_is_near_capacity_when_idle() {
        let s = staff(1, AvailabilityStatus::Available);
        assert_eq!(derive_load_status(&s, 0), "Near Capacity");
        assert_eq!(derive_load_status(&s, 1), "Booked");
    }
}
