use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{CreateStaffRequest, UpdateStaffRequest};
use crate::services::StaffService;

#[axum::debug_handler]
pub async fn create_staff(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<CreateStaffRequest>,
) -> Result<Json<Value>, AppError> {
    let service = StaffService::new(&config);

    let staff = service.create(request, &user.id, auth.token()).await?;

    Ok(Json(json!(staff)))
}

#[axum::debug_handler]
pub async fn list_staff(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let service = StaffService::new(&config);

    let staff = service.find_all(&user.id, auth.token()).await?;

    Ok(Json(json!(staff)))
}

#[axum::debug_handler]
pub async fn get_staff(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(staff_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = StaffService::new(&config);

    let staff = service.find_one(staff_id, &user.id, auth.token()).await?;

    Ok(Json(json!(staff)))
}

#[axum::debug_handler]
pub async fn update_staff(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(staff_id): Path<Uuid>,
    Json(request): Json<UpdateStaffRequest>,
) -> Result<Json<Value>, AppError> {
    let service = StaffService::new(&config);

    let staff = service
        .update(staff_id, request, &user.id, auth.token())
        .await?;

    Ok(Json(json!(staff)))
}

#[axum::debug_handler]
pub async fn delete_staff(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(staff_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = StaffService::new(&config);

    let staff = service.remove(staff_id, &user.id, auth.token()).await?;

    Ok(Json(json!(staff)))
}
