use std::sync::Arc;

use chrono::Utc;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, warn};
use uuid::Uuid;

use activity_log_cell::models::ActivityAction;
use activity_log_cell::services::ActivityLogService;
use service_catalog_cell::models::CatalogError;
use service_catalog_cell::services::CatalogService;
use shared_config::AppConfig;
use shared_database::supabase::{return_representation, SupabaseClient};
use staff_cell::models::{Staff, StaffError};
use staff_cell::services::StaffService;

use crate::models::{
    Appointment, AppointmentError, AppointmentSearchQuery, AppointmentStatus,
    CreateAppointmentRequest, UpdateAppointmentRequest,
};
use crate::services::{ConflictService, QueueService};

/// Booking orchestration: slot checks, capacity checks and queue fallback.
pub struct AppointmentService {
    supabase: Arc<SupabaseClient>,
    conflict: ConflictService,
    queue: QueueService,
    staff: StaffService,
    catalog: CatalogService,
    activity: ActivityLogService,
}

impl AppointmentService {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_client(Arc::new(SupabaseClient::new(config)))
    }

    pub fn with_client(supabase: Arc<SupabaseClient>) -> Self {
        Self {
            conflict: ConflictService::new(supabase.clone()),
            queue: QueueService::new(supabase.clone()),
            staff: StaffService::with_client(supabase.clone()),
            catalog: CatalogService::with_client(supabase.clone()),
            activity: ActivityLogService::with_client(supabase.clone()),
            supabase,
        }
    }

    /// Books an appointment, falling back to the waiting queue when the
    /// requested staff member is at capacity or no staff member was given.
    /// A slot conflict with the requested staff member is a hard error and
    /// never falls back to the queue.
    pub async fn create(
        &self,
        request: CreateAppointmentRequest,
        user_id: &str,
        auth_token: &str,
    ) -> Result<Appointment, AppointmentError> {
        if request.customer_name.trim().is_empty() {
            return Err(AppointmentError::Validation(
                "Customer name is required".to_string(),
            ));
        }
        if request.appointment_time.trim().is_empty() {
            return Err(AppointmentError::Validation(
                "Appointment time is required".to_string(),
            ));
        }

        self.catalog
            .find_one(request.service_id, user_id, auth_token)
            .await
            .map_err(|e| match e {
                CatalogError::NotFound => {
                    AppointmentError::Validation("Service not found".to_string())
                }
                other => AppointmentError::DatabaseError(other.to_string()),
            })?;

        let mut assigned_staff = request.staff_id;
        let mut status = AppointmentStatus::Scheduled;
        let mut queue_position: Option<i32> = None;

        match request.staff_id {
            Some(staff_id) => {
                let conflict = self
                    .conflict
                    .find_conflict(
                        staff_id,
                        request.appointment_date,
                        &request.appointment_time,
                        None,
                        auth_token,
                    )
                    .await?;
                if conflict.is_some() {
                    return Err(AppointmentError::TimeConflict);
                }

                let staff = self.fetch_staff(staff_id, user_id, auth_token).await?;
                let capacity_ok = self
                    .conflict
                    .has_capacity(
                        staff_id,
                        staff.daily_capacity,
                        request.appointment_date,
                        auth_token,
                    )
                    .await?;
                if !capacity_ok {
                    debug!("Staff {} is at capacity, queueing appointment", staff_id);
                    status = AppointmentStatus::Waiting;
                    queue_position = Some(self.queue.next_position(user_id, auth_token).await?);
                    assigned_staff = None;
                }
            }
            None => {
                status = AppointmentStatus::Waiting;
                queue_position = Some(self.queue.next_position(user_id, auth_token).await?);
            }
        }

        let now = Utc::now();
        let body = json!({
            "customer_name": request.customer_name,
            "service_id": request.service_id,
            "staff_id": assigned_staff,
            "appointment_date": request.appointment_date,
            "appointment_time": request.appointment_time,
            "status": status.to_string(),
            "queue_position": queue_position,
            "user_id": user_id,
            "created_at": now.to_rfc3339(),
            "updated_at": now.to_rfc3339()
        });

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/appointments",
                Some(auth_token),
                Some(body),
                Some(return_representation()),
            )
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        parse_first(result)?.ok_or_else(|| {
            AppointmentError::DatabaseError("Failed to create appointment".to_string())
        })
    }

    pub async fn find_all(
        &self,
        filters: &AppointmentSearchQuery,
        user_id: &str,
        auth_token: &str,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let mut path = format!("/rest/v1/appointments?user_id=eq.{}", user_id);
        if let Some(date) = filters.date {
            path.push_str(&format!("&appointment_date=eq.{}", date));
        }
        if let Some(staff_id) = filters.staff_id {
            path.push_str(&format!("&staff_id=eq.{}", staff_id));
        }
        if let Some(status) = filters.status {
            path.push_str(&format!("&status=eq.{}", status));
        }
        path.push_str("&order=appointment_date.asc,appointment_time.asc");

        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        rows.into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Appointment>, _>>()
            .map_err(|e| {
                AppointmentError::DatabaseError(format!("Failed to parse appointments: {}", e))
            })
    }

    pub async fn find_one(
        &self,
        appointment_id: Uuid,
        user_id: &str,
        auth_token: &str,
    ) -> Result<Appointment, AppointmentError> {
        let path = format!(
            "/rest/v1/appointments?id=eq.{}&user_id=eq.{}",
            appointment_id, user_id
        );

        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        parse_first(rows)?.ok_or(AppointmentError::NotFound)
    }

    /// Patches an appointment. The slot conflict check reruns only when the
    /// date, time or staff assignment is touched, excluding the appointment
    /// itself. Updates have no queue side effects.
    pub async fn update(
        &self,
        appointment_id: Uuid,
        request: UpdateAppointmentRequest,
        user_id: &str,
        auth_token: &str,
    ) -> Result<Appointment, AppointmentError> {
        let existing = self.find_one(appointment_id, user_id, auth_token).await?;

        let touches_slot = request.appointment_date.is_some()
            || request.appointment_time.is_some()
            || request.staff_id.is_some();

        if touches_slot {
            let date = request.appointment_date.unwrap_or(existing.appointment_date);
            let time = request
                .appointment_time
                .clone()
                .unwrap_or_else(|| existing.appointment_time.clone());
            let staff_id = request.staff_id.or(existing.staff_id);

            if let Some(staff_id) = staff_id {
                let conflict = self
                    .conflict
                    .find_conflict(staff_id, date, &time, Some(appointment_id), auth_token)
                    .await?;
                if conflict.is_some() {
                    return Err(AppointmentError::TimeConflict);
                }
            }
        }

        let mut update_data = serde_json::Map::new();
        if let Some(customer_name) = request.customer_name {
            if customer_name.trim().is_empty() {
                return Err(AppointmentError::Validation(
                    "Customer name is required".to_string(),
                ));
            }
            update_data.insert("customer_name".to_string(), json!(customer_name));
        }
        if let Some(service_id) = request.service_id {
            update_data.insert("service_id".to_string(), json!(service_id));
        }
        if let Some(staff_id) = request.staff_id {
            update_data.insert("staff_id".to_string(), json!(staff_id));
        }
        if let Some(date) = request.appointment_date {
            update_data.insert("appointment_date".to_string(), json!(date));
        }
        if let Some(time) = request.appointment_time {
            if time.trim().is_empty() {
                return Err(AppointmentError::Validation(
                    "Appointment time is required".to_string(),
                ));
            }
            update_data.insert("appointment_time".to_string(), json!(time));
        }
        if let Some(status) = request.status {
            update_data.insert("status".to_string(), json!(status.to_string()));
        }
        update_data.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));

        let path = format!(
            "/rest/v1/appointments?id=eq.{}&user_id=eq.{}",
            appointment_id, user_id
        );

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
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        parse_first(result)?.ok_or(AppointmentError::NotFound)
    }

    /// Direct status overwrite with no capacity or conflict checks.
    pub async fn update_status(
        &self,
        appointment_id: Uuid,
        status: AppointmentStatus,
        user_id: &str,
        auth_token: &str,
    ) -> Result<Appointment, AppointmentError> {
        let path = format!(
            "/rest/v1/appointments?id=eq.{}&user_id=eq.{}",
            appointment_id, user_id
        );
        let body = json!({
            "status": status.to_string(),
            "updated_at": Utc::now().to_rfc3339()
        });

        let result: Vec<Value> = self
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

        parse_first(result)?.ok_or(AppointmentError::NotFound)
    }

    /// Hard delete. Remaining Waiting rows keep their positions; any gap
    /// closes on the next promotion.
    pub async fn remove(
        &self,
        appointment_id: Uuid,
        user_id: &str,
        auth_token: &str,
    ) -> Result<Appointment, AppointmentError> {
        let path = format!(
            "/rest/v1/appointments?id=eq.{}&user_id=eq.{}",
            appointment_id, user_id
        );

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
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        parse_first(result)?.ok_or(AppointmentError::NotFound)
    }

    pub async fn get_queue(
        &self,
        user_id: &str,
        auth_token: &str,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        self.queue.get_queue(user_id, auth_token).await
    }

    /// Promotes the head of the waiting queue to the given staff member.
    ///
    /// Returns Ok(None) when the queue is empty or the head cannot be placed
    /// with this staff member today, leaving the candidate untouched. On
    /// success the remaining queue is renumbered to 1..n.
    pub async fn assign_from_queue(
        &self,
        staff_id: Uuid,
        user_id: &str,
        auth_token: &str,
    ) -> Result<Option<Appointment>, AppointmentError> {
        let queue = self.queue.get_queue(user_id, auth_token).await?;
        let Some(candidate) = queue.into_iter().next() else {
            return Ok(None);
        };

        let staff = self.fetch_staff(staff_id, user_id, auth_token).await?;

        let capacity_ok = self
            .conflict
            .has_capacity(
                staff_id,
                staff.daily_capacity,
                candidate.appointment_date,
                auth_token,
            )
            .await?;
        if !capacity_ok {
            debug!("Staff {} has no capacity for queue head", staff_id);
            return Ok(None);
        }

        let conflict = self
            .conflict
            .find_conflict(
                staff_id,
                candidate.appointment_date,
                &candidate.appointment_time,
                None,
                auth_token,
            )
            .await?;
        if conflict.is_some() {
            debug!("Queue head slot conflicts with staff {}", staff_id);
            return Ok(None);
        }

        let path = format!(
            "/rest/v1/appointments?id=eq.{}&user_id=eq.{}",
            candidate.id, user_id
        );
        let body = json!({
            "staff_id": staff_id,
            "status": AppointmentStatus::Scheduled.to_string(),
            "queue_position": Value::Null,
            "updated_at": Utc::now().to_rfc3339()
        });

        let result: Vec<Value> = self
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

        let promoted = parse_first(result)?.ok_or(AppointmentError::NotFound)?;

        // The promotion already happened, so a logging failure must not
        // roll it back.
        let description = format!(
            "Appointment for \"{}\" auto-assigned to staff.",
            promoted.customer_name
        );
        if let Err(e) = self
            .activity
            .create_log(
                ActivityAction::QueueToStaff,
                &description,
                promoted.id,
                Some(staff_id),
                user_id,
                auth_token,
            )
            .await
        {
            warn!("Failed to record queue assignment: {}", e);
        }

        self.queue.renumber(user_id, auth_token).await?;

        Ok(Some(promoted))
    }

    async fn fetch_staff(
        &self,
        staff_id: Uuid,
        user_id: &str,
        auth_token: &str,
    ) -> Result<Staff, AppointmentError> {
        self.staff
            .find_one(staff_id, user_id, auth_token)
            .await
            .map_err(|e| match e {
                StaffError::NotFound => {
                    AppointmentError::MissingDependency("Staff member not found".to_string())
                }
                other => AppointmentError::DatabaseError(other.to_string()),
            })
    }
}

fn parse_first(rows: Vec<Value>) -> Result<Option<Appointment>, AppointmentError> {
    match rows.into_iter().next() {
        None => Ok(None),
        Some(row) => serde_json::from_value(row).map(Some).map_err(|e| {
            AppointmentError::DatabaseError(format!("Failed to parse appointment: {}", e))
        }),
    }
}
