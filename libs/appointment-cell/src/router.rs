use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers::*;

pub fn appointment_routes(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", post(create_appointment).get(list_appointments))
        .route("/queue", get(get_queue))
        .route("/queue/assign/{staff_id}", post(assign_from_queue))
        .route(
            "/{id}",
            get(get_appointment)
                .patch(update_appointment)
                .delete(delete_appointment),
        )
        .route("/{id}/status", patch(update_appointment_status))
        .layer(middleware::from_fn_with_state(config.clone(), auth_middleware))
        .with_state(config)
}
