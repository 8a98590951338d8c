use std::sync::Arc;

use axum::{middleware, routing::get, Router};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers::get_recent_logs;

pub fn activity_log_routes(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(get_recent_logs))
        .layer(middleware::from_fn_with_state(config.clone(), auth_middleware))
        .with_state(config)
}
