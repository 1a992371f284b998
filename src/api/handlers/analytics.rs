use axum::extract::State;
use axum::{Extension, Json};
use rust_decimal::Decimal;
use serde::Serialize;

use super::ApiResponse;
use crate::billing::grant;
use crate::errors::AppError;
use crate::models::User;
use crate::AppState;

#[derive(Serialize)]
pub struct PnlDataPoint {
    pub date: String,
    pub daily_pnl: String,
    pub cumulative_pnl: String,
}

#[derive(Serialize)]
pub struct PerformanceMetrics {
    pub total_trades: i64,
    pub win_count: i64,
    pub loss_count: i64,
    pub win_rate: String,
    pub total_profit: String,
    pub avg_profit_per_trade: String,
    pub best_trade: String,
    pub worst_trade: String,
}

/// GET /api/analytics/pnl-history — daily and cumulative realized P&L
/// over the caller's closed trades. Premium feature.
pub async fn pnl_history(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<ApiResponse<Vec<PnlDataPoint>>>, AppError> {
    grant::ensure_premium(&state.db, user.id).await?;

    let rows: Vec<(chrono::NaiveDate, Option<Decimal>)> = sqlx::query_as(
        r#"
        SELECT closed_at::date AS day, SUM(profit_loss) AS daily_pnl
        FROM trades
        WHERE user_id = $1 AND status = 'closed'
          AND profit_loss IS NOT NULL AND closed_at IS NOT NULL
        GROUP BY closed_at::date
        ORDER BY day
        "#,
    )
    .bind(user.id)
    .fetch_all(&state.db)
    .await?;

    let mut cumulative = Decimal::ZERO;
    let points: Vec<PnlDataPoint> = rows
        .into_iter()
        .map(|(day, daily)| {
            let daily_pnl = daily.unwrap_or(Decimal::ZERO);
            cumulative += daily_pnl;
            PnlDataPoint {
                date: day.to_string(),
                daily_pnl: daily_pnl.to_string(),
                cumulative_pnl: cumulative.to_string(),
            }
        })
        .collect();

    Ok(Json(ApiResponse::ok(points)))
}

#[derive(sqlx::FromRow)]
struct PerformanceRow {
    total_trades: i64,
    win_count: i64,
    loss_count: i64,
    total_profit: Option<Decimal>,
    best_trade: Option<Decimal>,
    worst_trade: Option<Decimal>,
}

/// GET /api/analytics/performance — win rate and P&L aggregates over the
/// caller's closed trades. Premium feature.
pub async fn performance(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<ApiResponse<PerformanceMetrics>>, AppError> {
    grant::ensure_premium(&state.db, user.id).await?;

    let row: PerformanceRow = sqlx::query_as(
        r#"
        SELECT COUNT(*) AS total_trades,
               COUNT(*) FILTER (WHERE profit_loss > 0) AS win_count,
               COUNT(*) FILTER (WHERE profit_loss <= 0) AS loss_count,
               SUM(profit_loss) AS total_profit,
               MAX(profit_loss) AS best_trade,
               MIN(profit_loss) AS worst_trade
        FROM trades
        WHERE user_id = $1 AND status = 'closed' AND profit_loss IS NOT NULL
        "#,
    )
    .bind(user.id)
    .fetch_one(&state.db)
    .await?;

    let total_profit = row.total_profit.unwrap_or(Decimal::ZERO);
    let win_rate = if row.total_trades > 0 {
        Decimal::from(row.win_count) / Decimal::from(row.total_trades)
    } else {
        Decimal::ZERO
    };
    let avg_profit = if row.total_trades > 0 {
        total_profit / Decimal::from(row.total_trades)
    } else {
        Decimal::ZERO
    };

    Ok(Json(ApiResponse::ok(PerformanceMetrics {
        total_trades: row.total_trades,
        win_count: row.win_count,
        loss_count: row.loss_count,
        win_rate: win_rate.to_string(),
        total_profit: total_profit.to_string(),
        avg_profit_per_trade: avg_profit.to_string(),
        best_trade: row.best_trade.unwrap_or(Decimal::ZERO).to_string(),
        worst_trade: row.worst_trade.unwrap_or(Decimal::ZERO).to_string(),
    })))
}
