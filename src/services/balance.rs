//! Balance engine: base balance CRUD plus the derived current balance
//! (base + realized P&L over closed trades).
//!
//! Every operation acts on the session-resolved user passed in by the
//! auth middleware. Mutations take no separate user-id parameter, so the
//! service cannot be pointed at another user's row.

use chrono::{DateTime, Utc};
use metrics::counter;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::db::{balance_repo, trade_repo};
use crate::errors::AppError;
use crate::models::User;

/// Base balance as stored, or zero/absent when the user never set one.
/// Absence is a valid state distinct from a zero balance.
#[derive(Debug, Clone, serde::Serialize)]
pub struct BalanceView {
    pub balance: Decimal,
    pub has_balance: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Current balance: base plus realized P&L. Derived on every read,
/// never persisted.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CurrentBalanceView {
    pub balance: Decimal,
    pub base_balance: Decimal,
    pub trade_pnl: Decimal,
    pub has_balance: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

fn view_of(row: Option<crate::models::AccountBalance>) -> BalanceView {
    match row {
        Some(b) => BalanceView {
            balance: b.base_balance,
            has_balance: true,
            created_at: Some(b.created_at),
            updated_at: Some(b.updated_at),
        },
        None => BalanceView {
            balance: Decimal::ZERO,
            has_balance: false,
            created_at: None,
            updated_at: None,
        },
    }
}

fn validate_amount(amount: Decimal) -> Result<(), AppError> {
    // Decimal has no NaN/infinity, so only the sign needs checking.
    if amount < Decimal::ZERO {
        return Err(AppError::BadRequest("balance amount must be >= 0".into()));
    }
    Ok(())
}

/// Base balance read. Side-effect free; zero/false when no row exists.
pub async fn get_balance(pool: &PgPool, user: &User) -> Result<BalanceView, AppError> {
    let row = balance_repo::get_balance(pool, user.id).await?;
    counter!("balance_reads_total").increment(1);
    Ok(view_of(row))
}

/// Current balance: base balance plus the sum of profit_loss over closed
/// trades. Both reads run in one REPEATABLE READ transaction so a trade
/// closing mid-read cannot skew the derived value.
pub async fn get_balance_with_trades(
    pool: &PgPool,
    user: &User,
) -> Result<CurrentBalanceView, AppError> {
    let mut tx = pool.begin().await?;
    sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ")
        .execute(&mut *tx)
        .await?;

    let row = balance_repo::get_balance(&mut *tx, user.id).await?;
    let trade_pnl = trade_repo::closed_trade_pnl(&mut *tx, user.id).await?;
    tx.commit().await?;

    counter!("balance_reads_total").increment(1);

    let base = view_of(row);
    Ok(CurrentBalanceView {
        balance: base.balance + trade_pnl,
        base_balance: base.balance,
        trade_pnl,
        has_balance: base.has_balance,
        created_at: base.created_at,
        updated_at: base.updated_at,
    })
}

/// Update-only write. Fails with `BalanceNotFound` when the user has no
/// balance row; never falls back to an insert, so the caller can route
/// to the create flow instead.
pub async fn set_balance(
    pool: &PgPool,
    user: &User,
    amount: Decimal,
) -> Result<BalanceView, AppError> {
    validate_amount(amount)?;

    let row = balance_repo::update_balance(pool, user.id, amount)
        .await?
        .ok_or(AppError::BalanceNotFound)?;

    counter!("balance_writes_total").increment(1);
    tracing::info!(user_id = %user.id, amount = %amount, "Base balance updated");

    Ok(view_of(Some(row)))
}

/// Insert a new balance row. Conflicts when one already exists.
pub async fn create_balance(
    pool: &PgPool,
    user: &User,
    initial: Decimal,
) -> Result<BalanceView, AppError> {
    validate_amount(initial)?;

    let row = balance_repo::insert_balance(pool, user.id, initial)
        .await
        .map_err(AppError::from)?;

    counter!("balance_writes_total").increment(1);
    tracing::info!(user_id = %user.id, initial = %initial, "Balance record created");

    Ok(view_of(Some(row)))
}

/// Idempotent create-or-read. A second call with any amount is a plain
/// read of the existing row.
pub async fn get_or_create_balance(
    pool: &PgPool,
    user: &User,
    initial: Decimal,
) -> Result<BalanceView, AppError> {
    validate_amount(initial)?;

    let row = balance_repo::ensure_balance(pool, user.id, initial).await?;
    Ok(view_of(Some(row)))
}

pub async fn has_balance_record(pool: &PgPool, user: &User) -> Result<bool, AppError> {
    Ok(balance_repo::balance_exists(pool, user.id).await?)
}

/// Remove the user's balance row. Removing an absent row is not an error.
pub async fn delete_balance(pool: &PgPool, user: &User) -> Result<(), AppError> {
    let removed = balance_repo::delete_balance(pool, user.id).await?;
    if removed > 0 {
        counter!("balance_writes_total").increment(1);
        tracing::info!(user_id = %user.id, "Balance record deleted");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_of_absent_row() {
        let view = view_of(None);
        assert_eq!(view.balance, Decimal::ZERO);
        assert!(!view.has_balance);
        assert!(view.created_at.is_none());
        assert!(view.updated_at.is_none());
    }

    #[test]
    fn test_validate_amount_rejects_negative() {
        assert!(validate_amount(Decimal::from(-1)).is_err());
        assert!(validate_amount(Decimal::ZERO).is_ok());
        assert!(validate_amount(Decimal::new(10050, 2)).is_ok());
    }
}
