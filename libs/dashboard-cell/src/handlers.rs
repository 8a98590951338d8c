use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::DashboardStats;
use crate::services::DashboardService;

#[axum::debug_handler]
pub async fn get_stats(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let service = DashboardService::new(&config);

    let today_stats = service.today_stats(&user.id, auth.token()).await?;
    let staff_load = service.staff_load(&user.id, auth.token()).await?;

    let stats = DashboardStats {
        today_stats,
        staff_load,
    };

    Ok(Json(json!(stats)))
}
