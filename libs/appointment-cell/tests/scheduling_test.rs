use assert_matches::assert_matches;
use chrono::NaiveDate;
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use appointment_cell::models::{
    AppointmentError, AppointmentSearchQuery, AppointmentStatus, CreateAppointmentRequest,
    UpdateAppointmentRequest,
};
use appointment_cell::services::AppointmentService;
use shared_config::AppConfig;
use shared_utils::test_utils::{MockTableResponses, TestConfig};

fn mock_config(mock_server: &MockServer) -> AppConfig {
    let mut config = TestConfig::default().to_app_config();
    config.supabase_url = mock_server.uri();
    config
}

fn booking_request(service_id: Uuid, staff_id: Option<Uuid>) -> CreateAppointmentRequest {
    CreateAppointmentRequest {
        customer_name: "Test Customer".to_string(),
        service_id,
        staff_id,
        appointment_date: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
        appointment_time: "10:00".to_string(),
    }
}

async fn mock_service_lookup(mock_server: &MockServer, service_id: &str, user_id: &str) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/services"))
        .and(query_param("id", format!("eq.{}", service_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockTableResponses::service_row(service_id, user_id, "Consultation")
        ])))
        .mount(mock_server)
        .await;
}

async fn mock_staff_lookup(mock_server: &MockServer, staff_id: &str, user_id: &str, capacity: i32) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/staff"))
        .and(query_param("id", format!("eq.{}", staff_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockTableResponses::staff_row(staff_id, user_id, "Alex", capacity)
        ])))
        .mount(mock_server)
        .await;
}

/// Conflict lookup: Scheduled and Completed rows for the staff member's day.
async fn mock_conflict_query(mock_server: &MockServer, rows: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("status", "in.(Scheduled,Completed)"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rows))
        .mount(mock_server)
        .await;
}

/// Capacity lookup: Scheduled rows for the staff member's day.
async fn mock_capacity_query(mock_server: &MockServer, scheduled_count: usize) {
    let rows: Vec<serde_json::Value> = (0..scheduled_count)
        .map(|_| json!({"id": Uuid::new_v4()}))
        .collect();
    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("status", "eq.Scheduled"))
        .and(query_param("select", "id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(rows)))
        .mount(mock_server)
        .await;
}

/// Back-of-queue lookup: highest Waiting position, if any.
async fn mock_next_position_query(mock_server: &MockServer, rows: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("order", "queue_position.desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rows))
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn create_with_free_staff_schedules_directly() {
    let mock_server = MockServer::start().await;
    let user_id = Uuid::new_v4().to_string();
    let service_id = Uuid::new_v4();
    let staff_id = Uuid::new_v4();
    let appointment_id = Uuid::new_v4().to_string();

    mock_service_lookup(&mock_server, &service_id.to_string(), &user_id).await;
    mock_conflict_query(&mock_server, json!([])).await;
    mock_staff_lookup(&mock_server, &staff_id.to_string(), &user_id, 5).await;
    mock_capacity_query(&mock_server, 2).await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .and(body_partial_json(json!({
            "status": "Scheduled",
            "staff_id": staff_id,
            "queue_position": null
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockTableResponses::appointment_row(
                &appointment_id,
                &user_id,
                &service_id.to_string(),
                Some(&staff_id.to_string()),
                "2024-06-10",
                "10:00",
                "Scheduled",
                None,
            )
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = AppointmentService::new(&mock_config(&mock_server));
    let created = service
        .create(booking_request(service_id, Some(staff_id)), &user_id, "token")
        .await
        .unwrap();

    assert_eq!(created.status, AppointmentStatus::Scheduled);
    assert_eq!(created.staff_id, Some(staff_id));
    assert_eq!(created.queue_position, None);
}

#[tokio::test]
async fn create_rejects_exact_slot_conflict() {
    let mock_server = MockServer::start().await;
    let user_id = Uuid::new_v4().to_string();
    let service_id = Uuid::new_v4();
    let staff_id = Uuid::new_v4();

    mock_service_lookup(&mock_server, &service_id.to_string(), &user_id).await;
    mock_conflict_query(
        &mock_server,
        json!([MockTableResponses::appointment_row(
            &Uuid::new_v4().to_string(),
            &user_id,
            &service_id.to_string(),
            Some(&staff_id.to_string()),
            "2024-06-10",
            "10:00",
            "Scheduled",
            None,
        )]),
    )
    .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let service = AppointmentService::new(&mock_config(&mock_server));
    let result = service
        .create(booking_request(service_id, Some(staff_id)), &user_id, "token")
        .await;

    assert_matches!(result, Err(AppointmentError::TimeConflict));
}

#[tokio::test]
async fn conflict_requires_exact_time_token() {
    let mock_server = MockServer::start().await;
    let user_id = Uuid::new_v4().to_string();
    let service_id = Uuid::new_v4();
    let staff_id = Uuid::new_v4();

    mock_service_lookup(&mock_server, &service_id.to_string(), &user_id).await;
    // "9:00" occupies a different slot than "09:00".
    mock_conflict_query(
        &mock_server,
        json!([MockTableResponses::appointment_row(
            &Uuid::new_v4().to_string(),
            &user_id,
            &service_id.to_string(),
            Some(&staff_id.to_string()),
            "2024-06-10",
            "9:00",
            "Scheduled",
            None,
        )]),
    )
    .await;
    mock_staff_lookup(&mock_server, &staff_id.to_string(), &user_id, 5).await;
    mock_capacity_query(&mock_server, 1).await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockTableResponses::appointment_row(
                &Uuid::new_v4().to_string(),
                &user_id,
                &service_id.to_string(),
                Some(&staff_id.to_string()),
                "2024-06-10",
                "09:00",
                "Scheduled",
                None,
            )
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut request = booking_request(service_id, Some(staff_id));
    request.appointment_time = "09:00".to_string();

    let service = AppointmentService::new(&mock_config(&mock_server));
    let created = service.create(request, &user_id, "token").await.unwrap();

    assert_eq!(created.status, AppointmentStatus::Scheduled);
}

#[tokio::test]
async fn create_at_capacity_falls_back_to_queue() {
    let mock_server = MockServer::start().await;
    let user_id = Uuid::new_v4().to_string();
    let service_id = Uuid::new_v4();
    let staff_id = Uuid::new_v4();
    let appointment_id = Uuid::new_v4().to_string();

    mock_service_lookup(&mock_server, &service_id.to_string(), &user_id).await;
    mock_conflict_query(&mock_server, json!([])).await;
    mock_staff_lookup(&mock_server, &staff_id.to_string(), &user_id, 3).await;
    mock_capacity_query(&mock_server, 3).await;
    mock_next_position_query(
        &mock_server,
        json!([MockTableResponses::appointment_row(
            &Uuid::new_v4().to_string(),
            &user_id,
            &service_id.to_string(),
            None,
            "2024-06-09",
            "09:00",
            "Waiting",
            Some(3),
        )]),
    )
    .await;

    // The requested staff member is dropped on the queued row.
    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .and(body_partial_json(json!({
            "status": "Waiting",
            "staff_id": null,
            "queue_position": 4
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockTableResponses::appointment_row(
                &appointment_id,
                &user_id,
                &service_id.to_string(),
                None,
                "2024-06-10",
                "10:00",
                "Waiting",
                Some(4),
            )
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = AppointmentService::new(&mock_config(&mock_server));
    let created = service
        .create(booking_request(service_id, Some(staff_id)), &user_id, "token")
        .await
        .unwrap();

    assert_eq!(created.status, AppointmentStatus::Waiting);
    assert_eq!(created.staff_id, None);
    assert_eq!(created.queue_position, Some(4));
}

#[tokio::test]
async fn create_without_staff_joins_queue_at_position_one() {
    let mock_server = MockServer::start().await;
    let user_id = Uuid::new_v4().to_string();
    let service_id = Uuid::new_v4();
    let appointment_id = Uuid::new_v4().to_string();

    mock_service_lookup(&mock_server, &service_id.to_string(), &user_id).await;
    mock_next_position_query(&mock_server, json!([])).await;

    // No staff requested, so neither the staff table nor the conflict
    // lookup should be touched.
    Mock::given(method("GET"))
        .and(path("/rest/v1/staff"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .and(body_partial_json(json!({
            "status": "Waiting",
            "queue_position": 1
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockTableResponses::appointment_row(
                &appointment_id,
                &user_id,
                &service_id.to_string(),
                None,
                "2024-06-10",
                "10:00",
                "Waiting",
                Some(1),
            )
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = AppointmentService::new(&mock_config(&mock_server));
    let created = service
        .create(booking_request(service_id, None), &user_id, "token")
        .await
        .unwrap();

    assert_eq!(created.status, AppointmentStatus::Waiting);
    assert_eq!(created.queue_position, Some(1));
}

#[tokio::test]
async fn create_rejects_unknown_service() {
    let mock_server = MockServer::start().await;
    let user_id = Uuid::new_v4().to_string();
    let service_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/services"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let service = AppointmentService::new(&mock_config(&mock_server));
    let result = service
        .create(booking_request(service_id, None), &user_id, "token")
        .await;

    assert_matches!(result, Err(AppointmentError::Validation(msg)) if msg == "Service not found");
}

#[tokio::test]
async fn create_rejects_blank_customer_name() {
    let mock_server = MockServer::start().await;
    let service = AppointmentService::new(&mock_config(&mock_server));

    let mut request = booking_request(Uuid::new_v4(), None);
    request.customer_name = "   ".to_string();

    let result = service.create(request, &Uuid::new_v4().to_string(), "token").await;

    assert_matches!(result, Err(AppointmentError::Validation(_)));
}

#[tokio::test]
async fn assign_from_queue_promotes_head_and_renumbers() {
    let mock_server = MockServer::start().await;
    let user_id = Uuid::new_v4().to_string();
    let service_id = Uuid::new_v4().to_string();
    let staff_id = Uuid::new_v4();
    let head_id = Uuid::new_v4().to_string();
    let second_id = Uuid::new_v4().to_string();

    let head = MockTableResponses::appointment_row(
        &head_id, &user_id, &service_id, None, "2024-06-10", "09:00", "Waiting", Some(1),
    );
    let second = MockTableResponses::appointment_row(
        &second_id, &user_id, &service_id, None, "2024-06-10", "11:00", "Waiting", Some(2),
    );

    // First queue read sees both entries; the post-promotion read for
    // renumbering sees only the remaining one.
    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("order", "appointment_date.asc,appointment_time.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([head, second.clone()])))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("order", "appointment_date.asc,appointment_time.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([second])))
        .mount(&mock_server)
        .await;

    mock_staff_lookup(&mock_server, &staff_id.to_string(), &user_id, 5).await;
    mock_capacity_query(&mock_server, 0).await;
    mock_conflict_query(&mock_server, json!([])).await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", format!("eq.{}", head_id)))
        .and(body_partial_json(json!({
            "staff_id": staff_id,
            "status": "Scheduled",
            "queue_position": null
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockTableResponses::appointment_row(
                &head_id,
                &user_id,
                &service_id,
                Some(&staff_id.to_string()),
                "2024-06-10",
                "09:00",
                "Scheduled",
                None,
            )
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/activity_logs"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockTableResponses::activity_log_row(&head_id, &staff_id.to_string(), &user_id)
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    // The survivor moves up to position 1.
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", format!("eq.{}", second_id)))
        .and(body_partial_json(json!({"queue_position": 1})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockTableResponses::appointment_row(
                &second_id, &user_id, &service_id, None, "2024-06-10", "11:00", "Waiting", Some(1),
            )
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = AppointmentService::new(&mock_config(&mock_server));
    let promoted = service
        .assign_from_queue(staff_id, &user_id, "token")
        .await
        .unwrap()
        .expect("head should be promoted");

    assert_eq!(promoted.status, AppointmentStatus::Scheduled);
    assert_eq!(promoted.staff_id, Some(staff_id));
    assert_eq!(promoted.queue_position, None);
}

#[tokio::test]
async fn assign_from_queue_returns_none_on_empty_queue() {
    let mock_server = MockServer::start().await;
    let user_id = Uuid::new_v4().to_string();
    let staff_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("order", "appointment_date.asc,appointment_time.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/staff"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let service = AppointmentService::new(&mock_config(&mock_server));
    let result = service.assign_from_queue(staff_id, &user_id, "token").await;

    assert_matches!(result, Ok(None));
}

#[tokio::test]
async fn assign_from_queue_leaves_candidate_when_staff_full() {
    let mock_server = MockServer::start().await;
    let user_id = Uuid::new_v4().to_string();
    let service_id = Uuid::new_v4().to_string();
    let staff_id = Uuid::new_v4();
    let head_id = Uuid::new_v4().to_string();

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("order", "appointment_date.asc,appointment_time.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockTableResponses::appointment_row(
                &head_id, &user_id, &service_id, None, "2024-06-10", "09:00", "Waiting", Some(1),
            )
        ])))
        .mount(&mock_server)
        .await;

    mock_staff_lookup(&mock_server, &staff_id.to_string(), &user_id, 2).await;
    mock_capacity_query(&mock_server, 2).await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let service = AppointmentService::new(&mock_config(&mock_server));
    let result = service.assign_from_queue(staff_id, &user_id, "token").await;

    assert_matches!(result, Ok(None));
}

#[tokio::test]
async fn assign_from_queue_leaves_candidate_on_slot_conflict() {
    let mock_server = MockServer::start().await;
    let user_id = Uuid::new_v4().to_string();
    let service_id = Uuid::new_v4().to_string();
    let staff_id = Uuid::new_v4();
    let head_id = Uuid::new_v4().to_string();

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("order", "appointment_date.asc,appointment_time.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockTableResponses::appointment_row(
                &head_id, &user_id, &service_id, None, "2024-06-10", "09:00", "Waiting", Some(1),
            )
        ])))
        .mount(&mock_server)
        .await;

    mock_staff_lookup(&mock_server, &staff_id.to_string(), &user_id, 5).await;
    mock_capacity_query(&mock_server, 1).await;
    mock_conflict_query(
        &mock_server,
        json!([MockTableResponses::appointment_row(
            &Uuid::new_v4().to_string(),
            &user_id,
            &service_id,
            Some(&staff_id.to_string()),
            "2024-06-10",
            "09:00",
            "Completed",
            None,
        )]),
    )
    .await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let service = AppointmentService::new(&mock_config(&mock_server));
    let result = service.assign_from_queue(staff_id, &user_id, "token").await;

    assert_matches!(result, Ok(None));
}

#[tokio::test]
async fn update_conflict_check_excludes_self() {
    let mock_server = MockServer::start().await;
    let user_id = Uuid::new_v4().to_string();
    let service_id = Uuid::new_v4().to_string();
    let staff_id = Uuid::new_v4();
    let appointment_id = Uuid::new_v4();

    let existing = MockTableResponses::appointment_row(
        &appointment_id.to_string(),
        &user_id,
        &service_id,
        Some(&staff_id.to_string()),
        "2024-06-10",
        "10:00",
        "Scheduled",
        None,
    );

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", format!("eq.{}", appointment_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([existing.clone()])))
        .mount(&mock_server)
        .await;

    // The only row holding the slot is the appointment being updated.
    mock_conflict_query(&mock_server, json!([existing])).await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", format!("eq.{}", appointment_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockTableResponses::appointment_row(
                &appointment_id.to_string(),
                &user_id,
                &service_id,
                Some(&staff_id.to_string()),
                "2024-06-10",
                "10:00",
                "Scheduled",
                None,
            )
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = UpdateAppointmentRequest {
        customer_name: None,
        service_id: None,
        staff_id: None,
        appointment_date: None,
        appointment_time: Some("10:00".to_string()),
        status: None,
    };

    let service = AppointmentService::new(&mock_config(&mock_server));
    let updated = service
        .update(appointment_id, request, &user_id, "token")
        .await
        .unwrap();

    assert_eq!(updated.appointment_time, "10:00");
}

#[tokio::test]
async fn update_without_slot_fields_skips_conflict_check() {
    let mock_server = MockServer::start().await;
    let user_id = Uuid::new_v4().to_string();
    let service_id = Uuid::new_v4().to_string();
    let appointment_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", format!("eq.{}", appointment_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockTableResponses::appointment_row(
                &appointment_id.to_string(),
                &user_id,
                &service_id,
                None,
                "2024-06-10",
                "10:00",
                "Waiting",
                Some(2),
            )
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("status", "in.(Scheduled,Completed)"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .and(body_partial_json(json!({"customer_name": "Renamed"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockTableResponses::appointment_row(
                &appointment_id.to_string(),
                &user_id,
                &service_id,
                None,
                "2024-06-10",
                "10:00",
                "Waiting",
                Some(2),
            )
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = UpdateAppointmentRequest {
        customer_name: Some("Renamed".to_string()),
        service_id: None,
        staff_id: None,
        appointment_date: None,
        appointment_time: None,
        status: None,
    };

    let service = AppointmentService::new(&mock_config(&mock_server));
    let updated = service
        .update(appointment_id, request, &user_id, "token")
        .await
        .unwrap();

    // Queue bookkeeping is untouched by plain updates.
    assert_eq!(updated.queue_position, Some(2));
}

#[tokio::test]
async fn remove_deletes_without_renumbering() {
    let mock_server = MockServer::start().await;
    let user_id = Uuid::new_v4().to_string();
    let service_id = Uuid::new_v4().to_string();
    let appointment_id = Uuid::new_v4();

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", format!("eq.{}", appointment_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockTableResponses::appointment_row(
                &appointment_id.to_string(),
                &user_id,
                &service_id,
                None,
                "2024-06-10",
                "10:00",
                "Waiting",
                Some(2),
            )
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let service = AppointmentService::new(&mock_config(&mock_server));
    let removed = service
        .remove(appointment_id, &user_id, "token")
        .await
        .unwrap();

    assert_eq!(removed.id, appointment_id);
}

#[tokio::test]
async fn remove_missing_appointment_is_not_found() {
    let mock_server = MockServer::start().await;
    let user_id = Uuid::new_v4().to_string();

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let service = AppointmentService::new(&mock_config(&mock_server));
    let result = service.remove(Uuid::new_v4(), &user_id, "token").await;

    assert_matches!(result, Err(AppointmentError::NotFound));
}

#[tokio::test]
async fn update_status_overwrites_without_checks() {
    let mock_server = MockServer::start().await;
    let user_id = Uuid::new_v4().to_string();
    let service_id = Uuid::new_v4().to_string();
    let staff_id = Uuid::new_v4().to_string();
    let appointment_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", format!("eq.{}", appointment_id)))
        .and(body_partial_json(json!({"status": "No-Show"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockTableResponses::appointment_row(
                &appointment_id.to_string(),
                &user_id,
                &service_id,
                Some(&staff_id),
                "2024-06-10",
                "10:00",
                "No-Show",
                None,
            )
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = AppointmentService::new(&mock_config(&mock_server));
    let updated = service
        .update_status(appointment_id, AppointmentStatus::NoShow, &user_id, "token")
        .await
        .unwrap();

    assert_eq!(updated.status, AppointmentStatus::NoShow);
}

#[tokio::test]
async fn find_all_applies_filters() {
    let mock_server = MockServer::start().await;
    let user_id = Uuid::new_v4().to_string();
    let service_id = Uuid::new_v4().to_string();
    let staff_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("user_id", format!("eq.{}", user_id)))
        .and(query_param("appointment_date", "eq.2024-06-10"))
        .and(query_param("staff_id", format!("eq.{}", staff_id)))
        .and(query_param("status", "eq.Scheduled"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockTableResponses::appointment_row(
                &Uuid::new_v4().to_string(),
                &user_id,
                &service_id,
                Some(&staff_id.to_string()),
                "2024-06-10",
                "10:00",
                "Scheduled",
                None,
            )
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let filters = AppointmentSearchQuery {
        date: NaiveDate::from_ymd_opt(2024, 6, 10),
        staff_id: Some(staff_id),
        status: Some(AppointmentStatus::Scheduled),
    };

    let service = AppointmentService::new(&mock_config(&mock_server));
    let appointments = service.find_all(&filters, &user_id, "token").await.unwrap();

    assert_eq!(appointments.len(), 1);
}
