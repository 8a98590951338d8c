use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers::*;

pub fn staff_routes(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", post(create_staff).get(list_staff))
        .route("/{id}", get(get_staff).patch(update_staff).delete(delete_staff))
        .layer(middleware::from_fn_with_state(config.clone(), auth_middleware))
        .with_state(config)
}
