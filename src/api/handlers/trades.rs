use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use chrono::{DateTime, Utc};
use metrics::counter;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use super::ApiResponse;
use crate::db::trade_repo;
use crate::errors::AppError;
use crate::models::{Side, Trade, TradeStatus, User};
use crate::AppState;

#[derive(Deserialize)]
pub struct ListTradesQuery {
    pub status: Option<String>,
    pub pair: Option<String>,
}

#[derive(Deserialize)]
pub struct LogTradeRequest {
    pub pair: String,
    pub side: String,
    pub size: Decimal,
    pub entry_price: Decimal,
    pub mood: Option<String>,
    pub notes: Option<String>,
    pub opened_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
pub struct CloseTradeRequest {
    pub exit_price: Decimal,
    /// Realized P&L as the user books it. Derived from entry/exit and
    /// side when omitted.
    pub profit_loss: Option<Decimal>,
}

/// GET /api/trades — the caller's journal, filterable by status/pair
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Query(query): Query<ListTradesQuery>,
) -> Result<Json<ApiResponse<Vec<Trade>>>, AppError> {
    let status = match query.status.as_deref() {
        None => None,
        Some(s) => Some(
            TradeStatus::from_str(s)
                .ok_or_else(|| AppError::BadRequest(format!("invalid status: {s}")))?,
        ),
    };

    let trades = trade_repo::list_trades(&state.db, user.id, status, query.pair.as_deref()).await?;
    Ok(Json(ApiResponse::ok(trades)))
}

/// POST /api/trades — log a new open trade
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(body): Json<LogTradeRequest>,
) -> Result<Json<ApiResponse<Trade>>, AppError> {
    let side = Side::from_str(&body.side)
        .ok_or_else(|| AppError::BadRequest(format!("invalid side: {}", body.side)))?;
    if body.pair.trim().is_empty() {
        return Err(AppError::BadRequest("pair must not be empty".into()));
    }
    if body.size <= Decimal::ZERO {
        return Err(AppError::BadRequest("size must be > 0".into()));
    }
    if body.entry_price <= Decimal::ZERO {
        return Err(AppError::BadRequest("entry_price must be > 0".into()));
    }

    let trade = trade_repo::insert_trade(
        &state.db,
        user.id,
        body.pair.trim(),
        side.as_str(),
        body.size,
        body.entry_price,
        body.mood.as_deref(),
        body.notes.as_deref().unwrap_or(""),
        body.opened_at.unwrap_or_else(Utc::now),
    )
    .await?;

    counter!("trades_logged_total").increment(1);
    Ok(Json(ApiResponse::ok(trade)))
}

/// POST /api/trades/{id}/close — record exit and realized P&L
pub async fn close(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<Uuid>,
    Json(body): Json<CloseTradeRequest>,
) -> Result<Json<ApiResponse<Trade>>, AppError> {
    if body.exit_price <= Decimal::ZERO {
        return Err(AppError::BadRequest("exit_price must be > 0".into()));
    }

    let trade = trade_repo::get_trade(&state.db, user.id, id)
        .await?
        .ok_or_else(|| AppError::NotFound("trade not found".into()))?;

    let profit_loss = match body.profit_loss {
        Some(pnl) => pnl,
        None => {
            let delta = match Side::from_str(&trade.side) {
                Some(Side::Short) => trade.entry_price - body.exit_price,
                _ => body.exit_price - trade.entry_price,
            };
            delta * trade.size
        }
    };

    let closed = trade_repo::close_trade(&state.db, user.id, id, body.exit_price, profit_loss, Utc::now())
        .await?
        .ok_or_else(|| AppError::Conflict("trade is already closed".into()))?;

    counter!("trades_closed_total").increment(1);
    tracing::info!(
        user_id = %user.id,
        trade_id = %id,
        profit_loss = %profit_loss,
        "Trade closed"
    );

    Ok(Json(ApiResponse::ok(closed)))
}

/// DELETE /api/trades/{id}
pub async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let removed = trade_repo::delete_trade(&state.db, user.id, id).await?;
    if removed == 0 {
        return Err(AppError::NotFound("trade not found".into()));
    }
    Ok(Json(ApiResponse::ok(())))
}
