use chrono::{DateTime, Utc};
use metrics::counter;
use sqlx::PgPool;
use uuid::Uuid;

use crate::billing::{plan, tier, Entitlement};
use crate::db::subscription_repo;
use crate::errors::AppError;
use crate::models::{PlanCode, Subscription, SubscriptionStatus};

/// Grant (or re-grant) a plan to a user. Upserts by user_id, so a user
/// never holds more than one logical subscription; expiry is derived
/// from the plan at grant time.
pub async fn grant_plan(
    pool: &PgPool,
    user_id: Uuid,
    plan_code: PlanCode,
    now: DateTime<Utc>,
) -> Result<Subscription, AppError> {
    let ends_at = plan::expiry_for_plan(plan_code, now);

    let sub = subscription_repo::upsert_subscription(
        pool,
        user_id,
        plan_code.as_str(),
        SubscriptionStatus::Active.as_str(),
        ends_at,
    )
    .await?;

    counter!("subscription_grants_total").increment(1);
    tracing::info!(
        user_id = %user_id,
        plan = %plan_code,
        ends_at = ?ends_at,
        "Subscription granted"
    );

    Ok(sub)
}

/// Cancel a user's subscription. The record stays in place with its
/// `ends_at` unchanged, so access persists until expiry.
pub async fn cancel(pool: &PgPool, user_id: Uuid) -> Result<Subscription, AppError> {
    let sub = subscription_repo::cancel_subscription(pool, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("no subscription to cancel".into()))?;

    tracing::info!(user_id = %user_id, "Subscription canceled");
    Ok(sub)
}

/// Resolve a user's current entitlement from the stored subscription.
pub async fn entitlement_for(
    pool: &PgPool,
    user_id: Uuid,
    now: DateTime<Utc>,
) -> Result<Entitlement, AppError> {
    let sub = subscription_repo::get_subscription(pool, user_id).await?;
    Ok(tier::resolve(sub.as_ref(), now))
}

/// Premium gate used by feature handlers. Same resolver as everywhere
/// else; rejects with Forbidden when the user resolves to the free tier.
pub async fn ensure_premium(pool: &PgPool, user_id: Uuid) -> Result<(), AppError> {
    let entitlement = entitlement_for(pool, user_id, Utc::now()).await?;
    if !entitlement.has_premium {
        return Err(AppError::Forbidden("premium subscription required".into()));
    }
    Ok(())
}
