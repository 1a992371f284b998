use axum::extract::State;
use axum::{Extension, Json};
use chrono::Utc;
use serde::Serialize;

use super::ApiResponse;
use crate::billing::{grant, tier, Tier};
use crate::db::subscription_repo;
use crate::errors::AppError;
use crate::models::{Subscription, User};
use crate::AppState;

#[derive(Serialize)]
pub struct SubscriptionDetail {
    pub subscription: Option<Subscription>,
    pub tier: Tier,
    pub has_premium: bool,
}

/// GET /api/subscription — stored record plus resolved entitlement
pub async fn detail(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<ApiResponse<SubscriptionDetail>>, AppError> {
    let sub = subscription_repo::get_subscription(&state.db, user.id).await?;
    let entitlement = tier::resolve(sub.as_ref(), Utc::now());

    Ok(Json(ApiResponse::ok(SubscriptionDetail {
        subscription: sub,
        tier: entitlement.tier,
        has_premium: entitlement.has_premium,
    })))
}

/// POST /api/subscription/cancel — cancel own subscription; access
/// persists until the stored expiry
pub async fn cancel(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<ApiResponse<Subscription>>, AppError> {
    let sub = grant::cancel(&state.db, user.id).await?;
    Ok(Json(ApiResponse::ok(sub)))
}
