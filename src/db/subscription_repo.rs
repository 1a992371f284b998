use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Subscription;

/// Fetch a user's subscription, if any.
pub async fn get_subscription(
    pool: &PgPool,
    user_id: Uuid,
) -> anyhow::Result<Option<Subscription>> {
    let sub = sqlx::query_as::<_, Subscription>(
        "SELECT * FROM subscriptions WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(sub)
}

/// Upsert a subscription by user_id. Keeps at most one logical
/// subscription per user; a re-grant replaces plan, status and expiry.
pub async fn upsert_subscription(
    pool: &PgPool,
    user_id: Uuid,
    plan_code: &str,
    status: &str,
    ends_at: Option<DateTime<Utc>>,
) -> anyhow::Result<Subscription> {
    let sub = sqlx::query_as::<_, Subscription>(
        r#"
        INSERT INTO subscriptions (user_id, plan_code, status, ends_at)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (user_id) DO UPDATE
            SET plan_code = $2, status = $3, ends_at = $4, updated_at = NOW()
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(plan_code)
    .bind(status)
    .bind(ends_at)
    .fetch_one(pool)
    .await?;

    Ok(sub)
}

/// Mark a subscription canceled. `ends_at` is deliberately untouched so
/// access persists until expiry. Returns None when no subscription exists.
pub async fn cancel_subscription(
    pool: &PgPool,
    user_id: Uuid,
) -> anyhow::Result<Option<Subscription>> {
    let sub = sqlx::query_as::<_, Subscription>(
        r#"
        UPDATE subscriptions
        SET status = 'canceled', updated_at = NOW()
        WHERE user_id = $1
        RETURNING *
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(sub)
}
