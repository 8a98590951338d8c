use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers::*;

pub fn service_catalog_routes(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", post(create_service).get(list_services))
        .route(
            "/{id}",
            get(get_service).patch(update_service).delete(delete_service),
        )
        .layer(middleware::from_fn_with_state(config.clone(), auth_middleware))
        .with_state(config)
}
