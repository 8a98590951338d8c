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

use crate::models::{CreateServiceRequest, UpdateServiceRequest};
use crate::services::CatalogService;

#[axum::debug_handler]
pub async fn create_service(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<CreateServiceRequest>,
) -> Result<Json<Value>, AppError> {
    let service = CatalogService::new(&config);

    let definition = service.create(request, &user.id, auth.token()).await?;

    Ok(Json(json!(definition)))
}

#[axum::debug_handler]
pub async fn list_services(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let service = CatalogService::new(&config);

    let definitions = service.find_all(&user.id, auth.token()).await?;

    Ok(Json(json!(definitions)))
}

#[axum::debug_handler]
pub async fn get_service(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(service_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = CatalogService::new(&config);

    let definition = service.find_one(service_id, &user.id, auth.token()).await?;

    Ok(Json(json!(definition)))
}

#[axum::debug_handler]
pub async fn update_service(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(service_id): Path<Uuid>,
    Json(request): Json<UpdateServiceRequest>,
) -> Result<Json<Value>, AppError> {
    let service = CatalogService::new(&config);

    let definition = service
        .update(service_id, request, &user.id, auth.token())
        .await?;

    Ok(Json(json!(definition)))
}

#[axum::debug_handler]
pub async fn delete_service(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(service_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = CatalogService::new(&config);

    let definition = service.remove(service_id, &user.id, auth.token()).await?;

    Ok(Json(json!(definition)))
}
