use std::sync::Arc;

use axum::{routing::get, Router};

use activity_log_cell::router::activity_log_routes;
use appointment_cell::router::appointment_routes;
use auth_cell::router::auth_routes;
use dashboard_cell::router::dashboard_routes;
use service_catalog_cell::router::service_catalog_routes;
use shared_config::AppConfig;
use staff_cell::router::staff_routes;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Queuewise API is running!" }))
        .nest("/auth", auth_routes(state.clone()))
        .nest("/staff", staff_routes(state.clone()))
        .nest("/services", service_catalog_routes(state.clone()))
        .nest("/appointments", appointment_routes(state.clone()))
        .nest("/activity-logs", activity_log_routes(state.clone()))
        .nest("/dashboard", dashboard_routes(state))
}
