use axum::extract::State;
use axum::{Extension, Json};
use rust_decimal::Decimal;
use serde::Deserialize;

use super::ApiResponse;
use crate::errors::AppError;
use crate::models::User;
use crate::services::balance as balance_service;
use crate::services::balance::{BalanceView, CurrentBalanceView};
use crate::AppState;

#[derive(Deserialize)]
pub struct SetBalanceRequest {
    pub amount: Decimal,
}

#[derive(Deserialize, Default)]
pub struct CreateBalanceRequest {
    pub initial_amount: Option<Decimal>,
}

#[derive(serde::Serialize)]
pub struct BalanceExists {
    pub exists: bool,
}

/// GET /api/balance — base balance only (zero/absent when never set)
pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<ApiResponse<BalanceView>>, AppError> {
    let view = balance_service::get_balance(&state.db, &user).await?;
    Ok(Json(ApiResponse::ok(view)))
}

/// GET /api/balance/current — base balance plus realized P&L
pub async fn current(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<ApiResponse<CurrentBalanceView>>, AppError> {
    let view = balance_service::get_balance_with_trades(&state.db, &user).await?;
    Ok(Json(ApiResponse::ok(view)))
}

/// GET /api/balance/exists — record-existence check, for routing the
/// client between the create and update flows
pub async fn exists(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<ApiResponse<BalanceExists>>, AppError> {
    let exists = balance_service::has_balance_record(&state.db, &user).await?;
    Ok(Json(ApiResponse::ok(BalanceExists { exists })))
}

/// POST /api/balance — create a balance record (conflict when one exists)
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(body): Json<CreateBalanceRequest>,
) -> Result<Json<ApiResponse<BalanceView>>, AppError> {
    let initial = body.initial_amount.unwrap_or(Decimal::ZERO);
    let view = balance_service::create_balance(&state.db, &user, initial).await?;
    Ok(Json(ApiResponse::ok(view)))
}

/// POST /api/balance/init — idempotent get-or-create
pub async fn init(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    body: Option<Json<CreateBalanceRequest>>,
) -> Result<Json<ApiResponse<BalanceView>>, AppError> {
    let initial = body
        .and_then(|Json(b)| b.initial_amount)
        .unwrap_or(state.config.default_initial_balance);
    let view = balance_service::get_or_create_balance(&state.db, &user, initial).await?;
    Ok(Json(ApiResponse::ok(view)))
}

/// PUT /api/balance — update-only write; 404 routes the client to the
/// create flow
pub async fn set(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(body): Json<SetBalanceRequest>,
) -> Result<Json<ApiResponse<BalanceView>>, AppError> {
    let view = balance_service::set_balance(&state.db, &user, body.amount).await?;
    Ok(Json(ApiResponse::ok(view)))
}

/// DELETE /api/balance
pub async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    balance_service::delete_balance(&state.db, &user).await?;
    Ok(Json(ApiResponse::ok(())))
}
