use axum::extract::State;
use axum::{Extension, Json};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use super::ApiResponse;
use crate::api::auth::require_admin;
use crate::billing::grant;
use crate::db::user_repo;
use crate::errors::AppError;
use crate::models::{PlanCode, Subscription, User};
use crate::AppState;

#[derive(Deserialize)]
pub struct GrantRequest {
    pub user_id: Uuid,
    pub plan_code: String,
}

/// POST /api/admin/subscriptions/grant — grant a plan to any user
pub async fn grant_subscription(
    State(state): State<AppState>,
    Extension(admin): Extension<User>,
    Json(body): Json<GrantRequest>,
) -> Result<Json<ApiResponse<Subscription>>, AppError> {
    require_admin(&admin)?;

    let plan = PlanCode::from_str(&body.plan_code)
        .ok_or_else(|| AppError::BadRequest(format!("invalid plan_code: {}", body.plan_code)))?;

    user_repo::get_user(&state.db, body.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".into()))?;

    let sub = grant::grant_plan(&state.db, body.user_id, plan, Utc::now()).await?;
    Ok(Json(ApiResponse::ok(sub)))
}

/// GET /api/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    Extension(admin): Extension<User>,
) -> Result<Json<ApiResponse<Vec<User>>>, AppError> {
    require_admin(&admin)?;

    let users = user_repo::list_users(&state.db).await?;
    Ok(Json(ApiResponse::ok(users)))
}
