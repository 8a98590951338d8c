use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{LoginRequest, RegisterRequest};
use crate::services::AuthService;

#[axum::debug_handler]
pub async fn register(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<Value>, AppError> {
    let service = AuthService::new(&config);

    let token = service
        .register(&request.email, &request.password, &request.name)
        .await?;

    Ok(Json(json!(token)))
}

#[axum::debug_handler]
pub async fn login(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<Value>, AppError> {
    let service = AuthService::new(&config);

    let token = service.login(&request.email, &request.password).await?;

    Ok(Json(json!(token)))
}

#[axum::debug_handler]
pub async fn get_profile(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let service = AuthService::new(&config);

    let profile = service.get_profile(&user.id).await?;

    Ok(Json(json!({ "user": profile })))
}
