use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Trade, TradeStatus};

/// Insert a new open journal entry.
#[allow(clippy::too_many_arguments)]
pub async fn insert_trade(
    pool: &PgPool,
    user_id: Uuid,
    pair: &str,
    side: &str,
    size: Decimal,
    entry_price: Decimal,
    mood: Option<&str>,
    notes: &str,
    opened_at: DateTime<Utc>,
) -> anyhow::Result<Trade> {
    let trade = sqlx::query_as::<_, Trade>(
        r#"
        INSERT INTO trades (user_id, pair, side, size, entry_price, mood, notes, opened_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(pair)
    .bind(side)
    .bind(size)
    .bind(entry_price)
    .bind(mood)
    .bind(notes)
    .bind(opened_at)
    .fetch_one(pool)
    .await?;

    Ok(trade)
}

/// Get a single trade owned by the user.
pub async fn get_trade(
    pool: &PgPool,
    user_id: Uuid,
    trade_id: Uuid,
) -> anyhow::Result<Option<Trade>> {
    let trade = sqlx::query_as::<_, Trade>(
        "SELECT * FROM trades WHERE id = $1 AND user_id = $2",
    )
    .bind(trade_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(trade)
}

/// List a user's trades, newest first, optionally filtered by status
/// and/or pair.
pub async fn list_trades(
    pool: &PgPool,
    user_id: Uuid,
    status: Option<TradeStatus>,
    pair: Option<&str>,
) -> anyhow::Result<Vec<Trade>> {
    let trades = sqlx::query_as::<_, Trade>(
        r#"
        SELECT * FROM trades
        WHERE user_id = $1
          AND ($2::text IS NULL OR status = $2)
          AND ($3::text IS NULL OR pair = $3)
        ORDER BY opened_at DESC
        "#,
    )
    .bind(user_id)
    .bind(status.map(|s| s.as_str()))
    .bind(pair)
    .fetch_all(pool)
    .await?;

    Ok(trades)
}

/// Close an open trade, recording exit price and realized P&L.
/// Returns None when the trade does not exist, belongs to someone else,
/// or is already closed.
pub async fn close_trade(
    pool: &PgPool,
    user_id: Uuid,
    trade_id: Uuid,
    exit_price: Decimal,
    profit_loss: Decimal,
    closed_at: DateTime<Utc>,
) -> anyhow::Result<Option<Trade>> {
    let trade = sqlx::query_as::<_, Trade>(
        r#"
        UPDATE trades
        SET exit_price = $3, profit_loss = $4, status = 'closed',
            closed_at = $5, updated_at = NOW()
        WHERE id = $1 AND user_id = $2 AND status = 'open'
        RETURNING *
        "#,
    )
    .bind(trade_id)
    .bind(user_id)
    .bind(exit_price)
    .bind(profit_loss)
    .bind(closed_at)
    .fetch_optional(pool)
    .await?;

    Ok(trade)
}

/// Delete a trade owned by the user. Returns the number of rows removed.
pub async fn delete_trade(pool: &PgPool, user_id: Uuid, trade_id: Uuid) -> anyhow::Result<u64> {
    let result = sqlx::query("DELETE FROM trades WHERE id = $1 AND user_id = $2")
        .bind(trade_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Sum of realized P&L across the user's closed trades.
///
/// The status guard is what keeps open trades out of the sum — an open
/// trade with a non-null profit_loss must still contribute nothing.
/// Takes any executor so it can share a transaction with the balance read.
pub async fn closed_trade_pnl<'e, E>(executor: E, user_id: Uuid) -> anyhow::Result<Decimal>
where
    E: sqlx::PgExecutor<'e>,
{
    let row: (Option<Decimal>,) = sqlx::query_as(
        r#"
        SELECT COALESCE(SUM(profit_loss), 0)
        FROM trades
        WHERE user_id = $1 AND status = 'closed' AND profit_loss IS NOT NULL
        "#,
    )
    .bind(user_id)
    .fetch_one(executor)
    .await?;

    Ok(row.0.unwrap_or(Decimal::ZERO))
}
